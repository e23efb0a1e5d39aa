//! Propagation of a Cartesian state through time.
//!
//! [`propagate_state`] dispatches on a [`PropagationMethod`]; the analytic
//! two-body solution is [`propagate_state_keplerian`], and
//! [`batch_propagate_states`] runs it over many (state, time) pairs in
//! parallel.

use core::{fmt, str::FromStr};

use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    conversion::{coe_to_rv, mean_to_true_anomaly, rv_to_coe, true_to_mean_anomaly},
    elements::{ConicKind, StateVectors},
    OrbitError, Result,
};

/// The algorithm used to propagate an orbit.
///
/// Only the analytic two-body methods are implemented; the J2 family is
/// named so that callers can select it, and fails with
/// [`OrbitError::NotImplemented`].
///
/// # Example
/// ```
/// use twobody::PropagationMethod;
///
/// let method: PropagationMethod = "keplerian".parse().unwrap();
/// assert_eq!(method, PropagationMethod::Keplerian);
/// assert!(method.is_implemented());
///
/// let j2: PropagationMethod = "j2".parse().unwrap();
/// assert!(!j2.is_implemented());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PropagationMethod {
    /// Analytic two-body propagation by solving Kepler's equation.
    #[default]
    Keplerian,
    /// Lagrange f and g coefficients. Gives the same result as
    /// [`Keplerian`][Self::Keplerian] and shares its implementation.
    Lagrange,
    /// J2-perturbed numerical integration with a fixed-step RK4.
    J2Rk4,
    /// J2-perturbed numerical integration with Dormand-Prince 5(4).
    J2Dopri5,
    /// J2-perturbed numerical integration with Dormand-Prince 8(5,3).
    J2Dop853,
}

impl PropagationMethod {
    /// Every method, implemented or not.
    pub const ALL: [PropagationMethod; 5] = [
        PropagationMethod::Keplerian,
        PropagationMethod::Lagrange,
        PropagationMethod::J2Rk4,
        PropagationMethod::J2Dopri5,
        PropagationMethod::J2Dop853,
    ];

    /// The name this method is parsed from and displayed as.
    pub fn name(self) -> &'static str {
        match self {
            PropagationMethod::Keplerian => "keplerian",
            PropagationMethod::Lagrange => "lagrange",
            PropagationMethod::J2Rk4 => "j2",
            PropagationMethod::J2Dopri5 => "j2_dopri5",
            PropagationMethod::J2Dop853 => "j2_dop853",
        }
    }

    /// Whether this method can actually be run.
    pub fn is_implemented(self) -> bool {
        matches!(
            self,
            PropagationMethod::Keplerian | PropagationMethod::Lagrange
        )
    }

    /// Fails with [`OrbitError::NotImplemented`] for the unimplemented
    /// methods.
    pub(crate) fn ensure_implemented(self) -> Result<()> {
        if self.is_implemented() {
            Ok(())
        } else {
            warn!(method = self.name(), "requested an unimplemented propagation method");
            Err(OrbitError::NotImplemented(self))
        }
    }
}

impl fmt::Display for PropagationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropagationMethod {
    type Err = OrbitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keplerian" => Ok(PropagationMethod::Keplerian),
            "lagrange" => Ok(PropagationMethod::Lagrange),
            "j2" | "j2_rk4" => Ok(PropagationMethod::J2Rk4),
            "j2_dopri5" => Ok(PropagationMethod::J2Dopri5),
            "j2_dop853" => Ok(PropagationMethod::J2Dop853),
            _ => Err(OrbitError::Validation(format!(
                "unknown propagation method '{s}'; expected one of \
                'keplerian', 'lagrange', 'j2', 'j2_rk4', 'j2_dopri5', 'j2_dop853'"
            ))),
        }
    }
}

/// Propagates a state by `dt` seconds (negative to go backwards) with the
/// chosen method.
///
/// # Errors
/// [`OrbitError::NotImplemented`] for the J2 family, and whatever
/// [`propagate_state_keplerian`] reports for the analytic methods.
pub fn propagate_state(
    state: &StateVectors,
    dt: f64,
    mu: f64,
    method: PropagationMethod,
) -> Result<StateVectors> {
    method.ensure_implemented()?;
    debug!(%method, dt, "propagating state");

    propagate_state_keplerian(state, dt, mu)
}

/// Propagates a state by `dt` seconds along its two-body conic.
///
/// The state is converted into elements, the mean anomaly is advanced by
/// `n·dt`, Kepler's equation is solved for the new true anomaly, and the
/// elements are converted back. Closed orbits use the elliptic equation,
/// hyperbolic ones the hyperbolic equation, and parabolic ones Barker's
/// equation.
///
/// # Errors
/// - [`OrbitError::Validation`] if `dt` is not finite.
/// - [`OrbitError::Domain`] for degenerate states (see
///   [`rv_to_coe`][crate::conversion::rv_to_coe]).
/// - [`OrbitError::Convergence`] if Kepler's equation could not be solved.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use twobody::{constants::GM_EARTH, propagation::propagate_state_keplerian, StateVectors};
///
/// let r = 7000e3;
/// let v = (GM_EARTH / r).sqrt();
/// let state = StateVectors::new(DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, v, 0.0));
///
/// // A quarter of a circular orbit
/// let quarter = std::f64::consts::FRAC_PI_2 * r / v;
/// let later = propagate_state_keplerian(&state, quarter, GM_EARTH).unwrap();
///
/// assert!((later.position - DVec3::new(0.0, r, 0.0)).length() < 1e-3);
/// ```
pub fn propagate_state_keplerian(state: &StateVectors, dt: f64, mu: f64) -> Result<StateVectors> {
    if !dt.is_finite() {
        return Err(OrbitError::Validation(format!(
            "time offset must be finite, got {dt}"
        )));
    }

    let elements = rv_to_coe(state.position, state.velocity, mu)?;
    if dt == 0.0 {
        return Ok(*state);
    }

    let eccentricity = elements.get_eccentricity();

    let mean_motion = match elements.get_conic_kind() {
        ConicKind::Circular | ConicKind::Elliptic | ConicKind::Hyperbolic => {
            let a = elements.get_semi_major_axis().abs();
            (mu / (a * a * a)).sqrt()
        }
        ConicKind::Parabolic => {
            let p = elements.get_semi_latus_rectum();
            2.0 * (mu / (p * p * p)).sqrt()
        }
    };

    let mean_anomaly =
        true_to_mean_anomaly(elements.get_true_anomaly(), eccentricity) + mean_motion * dt;
    let true_anomaly = mean_to_true_anomaly(mean_anomaly, eccentricity)?;

    coe_to_rv(&elements.with_true_anomaly(true_anomaly), mu)
}

/// Propagates `states[k]` by `times[k]` seconds for every `k`, in parallel.
///
/// The output is index-aligned with the inputs.
///
/// # Errors
/// [`OrbitError::Validation`] if the slices differ in length; otherwise the
/// first error any pair produced.
pub fn batch_propagate_states(
    states: &[StateVectors],
    times: &[f64],
    mu: f64,
) -> Result<Vec<StateVectors>> {
    if states.len() != times.len() {
        return Err(OrbitError::Validation(format!(
            "got {} states but {} time offsets",
            states.len(),
            times.len()
        )));
    }

    debug!(count = states.len(), "batch propagating states");

    states
        .par_iter()
        .zip(times.par_iter())
        .map(|(state, &dt)| propagate_state_keplerian(state, dt, mu))
        .collect()
}

/// Propagates one state to each of the given time offsets.
///
/// The state is replicated once per offset and handed to
/// [`batch_propagate_states`]; the result is split into positions and
/// velocities, both index-aligned with `times`.
///
/// # Errors
/// [`OrbitError::NotImplemented`] for the J2 family; otherwise whatever the
/// batch propagation reports.
pub fn sample_state(
    state: &StateVectors,
    times: &[f64],
    mu: f64,
    method: PropagationMethod,
) -> Result<(Vec<DVec3>, Vec<DVec3>)> {
    method.ensure_implemented()?;

    let states = vec![*state; times.len()];
    let propagated = batch_propagate_states(&states, times, mu)?;

    Ok(propagated
        .into_iter()
        .map(|state| (state.position, state.velocity))
        .unzip())
}
