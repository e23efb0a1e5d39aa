use core::fmt;
use std::sync::OnceLock;

use glam::DVec3;
use tracing::{debug, trace};

use crate::{
    conversion::{coe_to_rv, rv_to_coe},
    frames::{EarthRotation, Frame, FrameState, FrameTransform},
    propagation::{propagate_state, sample_state},
    tle::parse_tle,
    units::{
        normalize_angle, normalize_dimensionless, normalize_length, normalize_position,
        normalize_time, normalize_velocity, Scalar, TimeSpan, Vector,
    },
    Body, ConicKind, Duration, Epoch, OrbitError, OrbitalElements, PropagationMethod, Result,
    StateVectors,
};

/// An immutable two-body orbit: a Cartesian state around an attractor at an
/// epoch.
///
/// The classical orbital elements are derived from the state the first time
/// anything needs them, and cached in the instance from then on. Since an
/// `Orbit` never changes, the cache can never go stale; operations that
/// produce a different state ([`propagate`][Self::propagate],
/// [`apply_maneuver`][Self::apply_maneuver]) return a new `Orbit` with an
/// empty cache.
///
/// The attractor is borrowed, so one [`Body`] can anchor any number of
/// orbits.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use twobody::{body_presets, Orbit, PropagationMethod, Quantity, Unit};
///
/// # fn main() -> twobody::Result<()> {
/// let earth = body_presets::earth();
///
/// let orbit = Orbit::from_vectors(
///     &earth,
///     (DVec3::new(7000.0, 0.0, 0.0), Unit::Kilometer),
///     (DVec3::new(0.0, 7.5, 1.0), Unit::KilometerPerSecond),
///     None,
/// )?;
///
/// let an_hour_later = orbit.propagate(Quantity::new(1.0, Unit::Hour), PropagationMethod::Keplerian)?;
///
/// assert!((an_hour_later.get_specific_energy() - orbit.get_specific_energy()).abs() < 1e-3);
/// assert_eq!(an_hour_later.get_epoch() - orbit.get_epoch(), twobody::Duration::from_hours(1.0)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Orbit<'a> {
    state: StateVectors,
    epoch: Epoch,
    attractor: &'a Body,
    elements: OnceLock<OrbitalElements>,
}

// Constructors
impl<'a> Orbit<'a> {
    fn from_state(state: StateVectors, epoch: Epoch, attractor: &'a Body) -> Self {
        Self {
            state,
            epoch,
            attractor,
            elements: OnceLock::new(),
        }
    }

    /// Creates an orbit from a position and a velocity.
    ///
    /// Both vectors may be bare SI (`DVec3` or `[f64; 3]`) or tagged with a
    /// unit of the right dimension. The epoch defaults to J2000.
    ///
    /// # Errors
    /// [`OrbitError::Unit`] for a tag of the wrong dimension, and
    /// [`OrbitError::Validation`] for non-finite components.
    pub fn from_vectors(
        attractor: &'a Body,
        position: impl Into<Vector>,
        velocity: impl Into<Vector>,
        epoch: Option<Epoch>,
    ) -> Result<Self> {
        let position = normalize_position(position, "position")?;
        let velocity = normalize_velocity(velocity, "velocity")?;

        let state = StateVectors::new(position, velocity);
        if !state.is_finite() {
            return Err(OrbitError::Validation(
                "state vectors must have finite components".to_string(),
            ));
        }

        Ok(Self::from_state(state, epoch.unwrap_or_default(), attractor))
    }

    /// Creates an orbit from the classical orbital elements.
    ///
    /// Each scalar may be bare SI (meters and radians) or tagged with a unit
    /// of the right dimension. The epoch defaults to J2000.
    ///
    /// For parabolic trajectories, which have no finite semi-major axis, use
    /// [`OrbitalElements::parabolic`] and [`from_elements`][Self::from_elements].
    ///
    /// # Errors
    /// - [`OrbitError::Unit`] for a tag of the wrong dimension.
    /// - [`OrbitError::Validation`] for inconsistent elements.
    /// - [`OrbitError::Domain`] for a true anomaly past the asymptotes of a
    ///   hyperbola.
    #[allow(clippy::too_many_arguments)]
    pub fn from_classical(
        attractor: &'a Body,
        semi_major_axis: impl Into<Scalar>,
        eccentricity: impl Into<Scalar>,
        inclination: impl Into<Scalar>,
        long_asc_node: impl Into<Scalar>,
        arg_pe: impl Into<Scalar>,
        true_anomaly: impl Into<Scalar>,
        epoch: Option<Epoch>,
    ) -> Result<Self> {
        let elements = OrbitalElements::new(
            normalize_length(semi_major_axis, "semi-major axis")?,
            normalize_dimensionless(eccentricity, "eccentricity")?,
            normalize_angle(inclination, "inclination")?,
            normalize_angle(long_asc_node, "longitude of the ascending node")?,
            normalize_angle(arg_pe, "argument of periapsis")?,
            normalize_angle(true_anomaly, "true anomaly")?,
        )?;

        Self::from_elements(attractor, &elements, epoch)
    }

    /// Creates an orbit from a validated set of elements.
    pub fn from_elements(
        attractor: &'a Body,
        elements: &OrbitalElements,
        epoch: Option<Epoch>,
    ) -> Result<Self> {
        let state = coe_to_rv(elements, attractor.mu)?;

        Ok(Self::from_state(state, epoch.unwrap_or_default(), attractor))
    }

    /// Creates an orbit from a two-line element set.
    ///
    /// Without an `epoch`, the orbit is placed at the TLE's own epoch.
    /// Otherwise SGP4 is run for the offset between the TLE epoch and
    /// `epoch`, and the orbit is placed there.
    ///
    /// The state comes out of SGP4 in the TEME frame, which this crate
    /// treats as inertial.
    pub fn from_tle(text: &str, attractor: &'a Body, epoch: Option<Epoch>) -> Result<Self> {
        let tle = parse_tle(text)?;

        let tle_state = match epoch {
            Some(epoch) => tle.state_at(epoch)?,
            None => tle.propagate(0.0)?,
        };

        Ok(Self::from_state(tle_state.state, tle_state.epoch, attractor))
    }

    /// Creates an orbit from a state in a named celestial frame, using the
    /// Earth-rotation frame model.
    pub fn from_frame(state: &FrameState, attractor: &'a Body) -> Result<Self> {
        Self::from_frame_with(state, attractor, &EarthRotation)
    }

    /// Creates an orbit from a state in a named celestial frame.
    pub fn from_frame_with(
        state: &FrameState,
        attractor: &'a Body,
        transform: &impl FrameTransform,
    ) -> Result<Self> {
        let inertial = transform.frame_to_inertial(state)?;

        Ok(Self::from_state(inertial, state.epoch, attractor))
    }
}

// Accessors
impl<'a> Orbit<'a> {
    /// The position, in meters.
    pub fn get_position(&self) -> DVec3 {
        self.state.position
    }

    /// The velocity, in meters per second.
    pub fn get_velocity(&self) -> DVec3 {
        self.state.velocity
    }

    /// The position and velocity.
    pub fn get_state(&self) -> StateVectors {
        self.state
    }

    /// The instant this state refers to.
    pub fn get_epoch(&self) -> Epoch {
        self.epoch
    }

    /// The body being orbited.
    pub fn get_attractor(&self) -> &'a Body {
        self.attractor
    }

    /// The classical orbital elements of this state.
    ///
    /// Computed on the first call and cached; later calls return the same
    /// value without recomputing it.
    ///
    /// # Errors
    /// Whatever [`rv_to_coe`] reports for a degenerate state.
    pub fn get_elements(&self) -> Result<&OrbitalElements> {
        if let Some(elements) = self.elements.get() {
            return Ok(elements);
        }

        let elements = rv_to_coe(self.state.position, self.state.velocity, self.attractor.mu)?;
        trace!(epoch = %self.epoch, "populated orbital element cache");

        Ok(self.elements.get_or_init(|| elements))
    }

    #[cfg(test)]
    pub(crate) fn has_cached_elements(&self) -> bool {
        self.elements.get().is_some()
    }

    /// The semi-major axis, in meters. Negative for hyperbolic orbits and
    /// infinite for parabolic ones.
    pub fn get_semi_major_axis(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_semi_major_axis())
    }

    /// The eccentricity.
    pub fn get_eccentricity(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_eccentricity())
    }

    /// The inclination, in radians.
    pub fn get_inclination(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_inclination())
    }

    /// The longitude of the ascending node, in radians.
    pub fn get_long_asc_node(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_long_asc_node())
    }

    /// The argument of periapsis, in radians.
    pub fn get_arg_pe(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_arg_pe())
    }

    /// The true anomaly, in radians.
    pub fn get_true_anomaly(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_true_anomaly())
    }

    /// The kind of conic this orbit traces.
    pub fn get_conic_kind(&self) -> Result<ConicKind> {
        Ok(self.get_elements()?.get_conic_kind())
    }

    /// The orbital period, in seconds.
    ///
    /// # Errors
    /// [`OrbitError::UndefinedQuantity`] for parabolic and hyperbolic orbits.
    pub fn get_orbital_period(&self) -> Result<f64> {
        self.get_elements()?.get_orbital_period(self.attractor.mu)
    }

    /// The mean motion, in radians per second.
    ///
    /// # Errors
    /// [`OrbitError::UndefinedQuantity`] for parabolic and hyperbolic orbits.
    pub fn get_mean_motion(&self) -> Result<f64> {
        self.get_elements()?.get_mean_motion(self.attractor.mu)
    }

    /// The specific orbital energy `v²/2 − μ/r`, in J/kg, straight from the
    /// state vectors.
    pub fn get_specific_energy(&self) -> f64 {
        self.state.specific_energy(self.attractor.mu)
    }

    /// The specific angular momentum vector, in m²/s.
    pub fn get_angular_momentum(&self) -> DVec3 {
        self.state.angular_momentum()
    }

    /// The semi-latus rectum, in meters.
    pub fn get_semi_latus_rectum(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_semi_latus_rectum())
    }

    /// The periapsis distance, in meters.
    pub fn get_periapsis(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_periapsis())
    }

    /// The apoapsis distance, in meters.
    ///
    /// Infinite for parabolic trajectories and negative for hyperbolic
    /// ones.
    pub fn get_apoapsis(&self) -> Result<f64> {
        Ok(self.get_elements()?.get_apoapsis())
    }
}

// State transitions
impl<'a> Orbit<'a> {
    /// Propagates this orbit by a time span.
    ///
    /// `dt` may be a [`Duration`], bare seconds, or a time-tagged quantity;
    /// negative spans propagate backwards. The attractor is carried over
    /// and the new orbit's epoch is `epoch + dt`.
    ///
    /// # Errors
    /// [`OrbitError::NotImplemented`] for the J2 family, plus whatever the
    /// propagation or the epoch arithmetic reports.
    pub fn propagate(&self, dt: impl Into<TimeSpan>, method: PropagationMethod) -> Result<Self> {
        let dt = normalize_time(dt, "time of flight")?;
        let epoch = self.epoch.checked_add(Duration::from_seconds(dt)?)?;

        let state = propagate_state(&self.state, dt, self.attractor.mu, method)?;

        Ok(Self::from_state(state, epoch, self.attractor))
    }

    /// Propagates this orbit to an absolute epoch.
    pub fn propagate_to(&self, epoch: Epoch, method: PropagationMethod) -> Result<Self> {
        self.propagate(epoch - self.epoch, method)
    }

    /// Propagates this orbit to each of the given offsets, in seconds.
    ///
    /// Returns positions and velocities, both index-aligned with `times`.
    /// This is the batched equivalent of calling
    /// [`propagate`][Self::propagate] once per offset.
    ///
    /// # Errors
    /// [`OrbitError::NotImplemented`] for the J2 family, plus whatever the
    /// propagation reports for any of the offsets.
    pub fn sample(
        &self,
        times: &[f64],
        method: PropagationMethod,
    ) -> Result<(Vec<DVec3>, Vec<DVec3>)> {
        debug!(count = times.len(), %method, "sampling orbit");
        sample_state(&self.state, times, self.attractor.mu, method)
    }

    /// Like [`sample`][Self::sample], with the offsets given as durations.
    pub fn sample_durations(
        &self,
        times: &[Duration],
        method: PropagationMethod,
    ) -> Result<(Vec<DVec3>, Vec<DVec3>)> {
        let seconds: Vec<f64> = times.iter().map(|time| time.to_seconds()).collect();
        self.sample(&seconds, method)
    }

    /// Applies an impulsive maneuver: the velocity changes by `delta_v`
    /// (m/s) while the position and epoch stay put.
    ///
    /// # Errors
    /// [`OrbitError::Validation`] unless `delta_v` has exactly three finite
    /// components.
    pub fn apply_maneuver(&self, delta_v: &[f64]) -> Result<Self> {
        let delta_v: [f64; 3] = delta_v.try_into().map_err(|_| {
            OrbitError::Validation(format!(
                "delta-v must have exactly 3 components, got {}",
                delta_v.len()
            ))
        })?;
        let delta_v = DVec3::from_array(delta_v);
        if !delta_v.is_finite() {
            return Err(OrbitError::Validation(
                "delta-v must have finite components".to_string(),
            ));
        }

        let state = StateVectors::new(self.state.position, self.state.velocity + delta_v);

        Ok(Self::from_state(state, self.epoch, self.attractor))
    }
}

// Frames
impl<'a> Orbit<'a> {
    /// Expresses this orbit's state in a named frame (`"icrs"`, `"gcrs"` or
    /// `"itrs"`, any case), using the Earth-rotation frame model.
    ///
    /// # Errors
    /// [`OrbitError::UnsupportedFrame`] for any other name.
    pub fn to_frame(&self, name: &str) -> Result<FrameState> {
        self.to_frame_with(name.parse()?, &EarthRotation)
    }

    /// Expresses this orbit's state in a frame, using a given transform.
    pub fn to_frame_with(&self, frame: Frame, transform: &impl FrameTransform) -> Result<FrameState> {
        transform.inertial_to_frame(&self.state, self.epoch, frame)
    }
}

impl fmt::Display for Orbit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.state.position / 1e3;
        let v = self.state.velocity / 1e3;

        match self.get_elements() {
            Ok(elements) => write!(
                f,
                "Orbit around {} at {}\n  \
                r = [{:.3}, {:.3}, {:.3}] km\n  \
                v = [{:.6}, {:.6}, {:.6}] km/s\n  \
                a = {:.3} km, e = {:.6}, i = {:.4}°\n  \
                Ω = {:.4}°, ω = {:.4}°, ν = {:.4}°",
                self.attractor.name,
                self.epoch,
                r.x,
                r.y,
                r.z,
                v.x,
                v.y,
                v.z,
                elements.get_semi_major_axis() / 1e3,
                elements.get_eccentricity(),
                elements.get_inclination().to_degrees(),
                elements.get_long_asc_node().to_degrees(),
                elements.get_arg_pe().to_degrees(),
                elements.get_true_anomaly().to_degrees(),
            ),
            Err(_) => write!(
                f,
                "Orbit around {} at {}\n  \
                r = [{:.3}, {:.3}, {:.3}] km\n  \
                v = [{:.6}, {:.6}, {:.6}] km/s",
                self.attractor.name, self.epoch, r.x, r.y, r.z, v.x, v.y, v.z,
            ),
        }
    }
}
