use core::{
    f64::consts::{PI, TAU},
    fmt,
};

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{OrbitError, Result, SINGULARITY_TOLERANCE};

/// A struct representing a position and velocity at a point in the orbit.
///
/// The position and velocity vectors are three-dimensional, expressed in an
/// inertial frame centered on the attractor.
///
/// The position vector is in meters, while the velocity vector is in
/// meters per second.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The 3D position at a point in the orbit, in meters.
    pub position: DVec3,
    /// The 3D velocity at a point in the orbit, in meters per second.
    pub velocity: DVec3,
}

impl StateVectors {
    /// Creates a state from a position and a velocity.
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    /// The specific orbital energy `v²/2 − μ/r`, in J/kg.
    ///
    /// Negative for bound orbits, zero for parabolic trajectories and
    /// positive for hyperbolic ones.
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.velocity.length_squared() - mu / self.position.length()
    }

    /// The specific angular momentum vector `r × v`, in m²/s.
    pub fn angular_momentum(&self) -> DVec3 {
        self.position.cross(self.velocity)
    }

    /// Whether all six components are finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// The kind of conic section an orbit traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConicKind {
    /// `e ≈ 0`.
    Circular,
    /// `0 < e < 1`.
    Elliptic,
    /// `e ≈ 1`.
    Parabolic,
    /// `e > 1`.
    Hyperbolic,
}

impl ConicKind {
    /// Classifies an eccentricity, treating values within `tolerance` of 0
    /// or 1 as circular or parabolic respectively.
    pub fn classify(eccentricity: f64, tolerance: f64) -> Self {
        if eccentricity < tolerance {
            ConicKind::Circular
        } else if (eccentricity - 1.0).abs() < tolerance {
            ConicKind::Parabolic
        } else if eccentricity < 1.0 {
            ConicKind::Elliptic
        } else {
            ConicKind::Hyperbolic
        }
    }

    /// Whether the orbit is closed, i.e. circular or elliptic.
    pub fn is_closed(self) -> bool {
        matches!(self, ConicKind::Circular | ConicKind::Elliptic)
    }
}

impl fmt::Display for ConicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConicKind::Circular => "circular",
            ConicKind::Elliptic => "elliptic",
            ConicKind::Parabolic => "parabolic",
            ConicKind::Hyperbolic => "hyperbolic",
        };
        f.write_str(name)
    }
}

/// The six classical orbital elements.
///
/// The semi-major axis is signed: positive for closed orbits, negative for
/// hyperbolic ones, and infinite for parabolic trajectories, which are
/// described by their semi-latus rectum instead. Both are always stored so
/// that every conic converts back to a state the same way.
///
/// Instances are validated on construction, so an `OrbitalElements` value
/// always satisfies:
/// - `e ≥ 0`
/// - `a > 0` when `e < 1`, `a < 0` when `e > 1`
/// - `i ∈ [0, π]`
/// - `Ω, ω ∈ [0, 2π)`, and `ν ∈ [0, 2π)` for closed orbits
/// - every element is finite, except `a` for parabolic trajectories
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    semi_latus_rectum: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    long_asc_node: f64,
    arg_pe: f64,
    true_anomaly: f64,
    conic: ConicKind,
}

impl OrbitalElements {
    /// Creates a set of elements for a non-parabolic orbit.
    ///
    /// The longitude of the ascending node and the argument of periapsis are
    /// wrapped into `[0, 2π)`.
    ///
    /// # Errors
    /// [`OrbitError::Validation`] if the elements are inconsistent: a
    /// negative eccentricity, a semi-major axis with the wrong sign for the
    /// eccentricity, an inclination outside `[0, π]`, or an eccentricity of
    /// 1 (use [`OrbitalElements::parabolic`] for those).
    ///
    /// # Example
    /// ```
    /// use twobody::OrbitalElements;
    ///
    /// let elements = OrbitalElements::new(7000e3, 0.1, 0.5, 0.0, 0.0, 0.0).unwrap();
    /// assert!((elements.get_periapsis() - 6300e3).abs() < 1e-6);
    ///
    /// // Hyperbolic orbits need a negative semi-major axis.
    /// assert!(OrbitalElements::new(7000e3, 1.5, 0.0, 0.0, 0.0, 0.0).is_err());
    /// ```
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        long_asc_node: f64,
        arg_pe: f64,
        true_anomaly: f64,
    ) -> Result<Self> {
        check_shape(eccentricity, inclination)?;
        check_angles(long_asc_node, arg_pe, true_anomaly)?;

        if !semi_major_axis.is_finite() {
            return Err(OrbitError::Validation(format!(
                "semi-major axis must be finite, got {semi_major_axis}"
            )));
        }
        if (eccentricity - 1.0).abs() < SINGULARITY_TOLERANCE {
            return Err(OrbitError::Validation(
                "a parabolic orbit has no finite semi-major axis; \
                use OrbitalElements::parabolic with the semi-latus rectum"
                    .to_string(),
            ));
        }
        if eccentricity < 1.0 && semi_major_axis <= 0.0 {
            return Err(OrbitError::Validation(format!(
                "a closed orbit (e = {eccentricity}) needs a positive \
                semi-major axis, got {semi_major_axis}"
            )));
        }
        if eccentricity > 1.0 && semi_major_axis >= 0.0 {
            return Err(OrbitError::Validation(format!(
                "a hyperbolic orbit (e = {eccentricity}) needs a negative \
                semi-major axis, got {semi_major_axis}"
            )));
        }

        let conic = ConicKind::classify(eccentricity, SINGULARITY_TOLERANCE);
        let true_anomaly = if conic.is_closed() {
            true_anomaly.rem_euclid(TAU)
        } else {
            true_anomaly
        };

        Ok(Self {
            semi_latus_rectum: semi_major_axis * (1.0 - eccentricity * eccentricity),
            semi_major_axis,
            eccentricity,
            inclination,
            long_asc_node: long_asc_node.rem_euclid(TAU),
            arg_pe: arg_pe.rem_euclid(TAU),
            true_anomaly,
            conic,
        })
    }

    /// Creates a set of elements for a parabolic trajectory (`e = 1`),
    /// described by its semi-latus rectum `p` instead of a semi-major axis.
    pub fn parabolic(
        semi_latus_rectum: f64,
        inclination: f64,
        long_asc_node: f64,
        arg_pe: f64,
        true_anomaly: f64,
    ) -> Result<Self> {
        check_shape(1.0, inclination)?;
        check_angles(long_asc_node, arg_pe, true_anomaly)?;

        if semi_latus_rectum <= 0.0 || !semi_latus_rectum.is_finite() {
            return Err(OrbitError::Validation(format!(
                "semi-latus rectum must be positive and finite, got {semi_latus_rectum}"
            )));
        }

        Ok(Self {
            semi_latus_rectum,
            semi_major_axis: f64::INFINITY,
            eccentricity: 1.0,
            inclination,
            long_asc_node: long_asc_node.rem_euclid(TAU),
            arg_pe: arg_pe.rem_euclid(TAU),
            true_anomaly,
            conic: ConicKind::Parabolic,
        })
    }

    /// Assembles elements the conversion engine has already validated and
    /// classified.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts_unchecked(
        semi_latus_rectum: f64,
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        long_asc_node: f64,
        arg_pe: f64,
        true_anomaly: f64,
        conic: ConicKind,
    ) -> Self {
        Self {
            semi_latus_rectum,
            semi_major_axis,
            eccentricity,
            inclination,
            long_asc_node,
            arg_pe,
            true_anomaly,
            conic,
        }
    }

    /// Returns a copy of these elements at a different true anomaly.
    #[must_use]
    pub fn with_true_anomaly(&self, true_anomaly: f64) -> Self {
        Self {
            true_anomaly,
            ..*self
        }
    }

    /// The semi-major axis `a`, in meters.
    ///
    /// Negative for hyperbolic orbits and infinite for parabolic ones.
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// The semi-latus rectum `p = a(1 − e²)`, in meters.
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.semi_latus_rectum
    }

    /// The eccentricity `e`.
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// The inclination `i`, in radians, in `[0, π]`.
    pub fn get_inclination(&self) -> f64 {
        self.inclination
    }

    /// The longitude of the ascending node `Ω`, in radians, in `[0, 2π)`.
    pub fn get_long_asc_node(&self) -> f64 {
        self.long_asc_node
    }

    /// The argument of periapsis `ω`, in radians, in `[0, 2π)`.
    pub fn get_arg_pe(&self) -> f64 {
        self.arg_pe
    }

    /// The true anomaly `ν`, in radians.
    pub fn get_true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    /// The conic kind these elements were classified as when they were
    /// created.
    ///
    /// Elements built by hand use [`SINGULARITY_TOLERANCE`]; elements from
    /// [`rv_to_coe_with_tolerance`][crate::conversion::rv_to_coe_with_tolerance]
    /// use the tolerance given there.
    pub fn get_conic_kind(&self) -> ConicKind {
        self.conic
    }

    /// The periapsis distance `r_p = a(1 − e)`, in meters.
    pub fn get_periapsis(&self) -> f64 {
        self.semi_latus_rectum / (1.0 + self.eccentricity)
    }

    /// The apoapsis distance `r_a = a(1 + e)`, in meters.
    ///
    /// Infinite for parabolic trajectories and negative for hyperbolic ones;
    /// check [`get_conic_kind`][Self::get_conic_kind] before trusting it.
    pub fn get_apoapsis(&self) -> f64 {
        if self.get_conic_kind() == ConicKind::Parabolic {
            f64::INFINITY
        } else {
            self.semi_major_axis * (1.0 + self.eccentricity)
        }
    }

    /// The orbital period `2π√(a³/μ)`, in seconds.
    ///
    /// # Errors
    /// [`OrbitError::UndefinedQuantity`] unless the orbit is closed.
    pub fn get_orbital_period(&self, mu: f64) -> Result<f64> {
        let conic = self.get_conic_kind();
        if !conic.is_closed() {
            return Err(OrbitError::UndefinedQuantity {
                quantity: "orbital period",
                conic,
            });
        }

        let a = self.semi_major_axis;
        Ok(TAU * (a * a * a / mu).sqrt())
    }

    /// The mean motion `2π / period`, in radians per second.
    ///
    /// # Errors
    /// [`OrbitError::UndefinedQuantity`] unless the orbit is closed.
    pub fn get_mean_motion(&self, mu: f64) -> Result<f64> {
        Ok(TAU / self.get_orbital_period(mu)?)
    }
}

fn check_shape(eccentricity: f64, inclination: f64) -> Result<()> {
    if eccentricity < 0.0 || !eccentricity.is_finite() {
        return Err(OrbitError::Validation(format!(
            "eccentricity must be finite and non-negative, got {eccentricity}"
        )));
    }
    if !(0.0..=PI).contains(&inclination) {
        return Err(OrbitError::Validation(format!(
            "inclination must lie in [0, π], got {inclination}"
        )));
    }

    Ok(())
}

fn check_angles(long_asc_node: f64, arg_pe: f64, true_anomaly: f64) -> Result<()> {
    for (name, angle) in [
        ("longitude of the ascending node", long_asc_node),
        ("argument of periapsis", arg_pe),
        ("true anomaly", true_anomaly),
    ] {
        if !angle.is_finite() {
            return Err(OrbitError::Validation(format!(
                "{name} must be finite, got {angle}"
            )));
        }
    }

    Ok(())
}
