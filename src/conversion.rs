//! Conversions between Cartesian state vectors and classical orbital
//! elements, and between the different anomalies.
//!
//! Every function in this module is pure. Angles are in radians, lengths in
//! meters and the gravitational parameter in m³/s².

use core::f64::consts::{PI, TAU};

use glam::{DVec2, DVec3};
use tracing::trace;

use crate::{
    elements::{ConicKind, OrbitalElements, StateVectors},
    solve_monotone_cubic, solvers, Matrix3x2, OrbitError, Result, SINGULARITY_TOLERANCE,
};

/// Converts a Cartesian state into classical orbital elements, using the
/// default [`SINGULARITY_TOLERANCE`].
///
/// See [`rv_to_coe_with_tolerance`] for the conventions used on circular
/// and equatorial orbits.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use twobody::{conversion::rv_to_coe, constants::GM_EARTH};
///
/// let r = 7000e3;
/// let v = (GM_EARTH / r).sqrt();
///
/// let elements = rv_to_coe(DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, v, 0.0), GM_EARTH).unwrap();
///
/// assert!(elements.get_eccentricity() < 1e-10);
/// assert!((elements.get_semi_major_axis() - r).abs() < 1e-3);
/// ```
pub fn rv_to_coe(position: DVec3, velocity: DVec3, mu: f64) -> Result<OrbitalElements> {
    rv_to_coe_with_tolerance(position, velocity, mu, SINGULARITY_TOLERANCE)
}

/// Converts a Cartesian state into classical orbital elements.
///
/// `tolerance` decides when the orbit counts as circular (`e < tolerance`),
/// parabolic (`|e − 1| < tolerance`) or equatorial (`sin i < tolerance`).
/// Those cases have angles that are undefined, and they get these
/// conventions instead:
///
/// - Equatorial: `Ω = 0`, and `ω` is measured from the x-axis to the
///   eccentricity vector.
/// - Circular: `ω = 0`, and `ν` is the argument of latitude (measured from
///   the ascending node to the position).
/// - Circular and equatorial: `Ω = ω = 0`, and `ν` is the true longitude
///   (measured from the x-axis to the position).
///
/// All angles are measured in the direction of motion and wrapped into
/// `[0, 2π)`. The semi-major axis of a parabolic trajectory is infinite.
///
/// The returned elements are snapped to the classification: a circular
/// orbit has `e = 0` and `p = a`, a parabolic one has `e = 1`, and an
/// equatorial one has `i` of exactly `0` or `π`. They report the same
/// [`ConicKind`] through [`OrbitalElements::get_conic_kind`], so
/// [`coe_to_rv`] reads them back with the same conventions.
///
/// # Errors
/// [`OrbitError::Domain`] if `mu` is not positive, `tolerance` is outside
/// `[0, 1)`, the position is the zero vector, or the angular momentum
/// vanishes (rectilinear motion).
pub fn rv_to_coe_with_tolerance(
    position: DVec3,
    velocity: DVec3,
    mu: f64,
    tolerance: f64,
) -> Result<OrbitalElements> {
    if mu <= 0.0 || !mu.is_finite() {
        return Err(OrbitError::Domain("gravitational parameter must be positive"));
    }
    if !(0.0..1.0).contains(&tolerance) {
        return Err(OrbitError::Domain("tolerance must lie in [0, 1)"));
    }
    if !position.is_finite() || !velocity.is_finite() {
        return Err(OrbitError::Domain("state vectors must be finite"));
    }

    let radius = position.length();
    if radius == 0.0 {
        return Err(OrbitError::Domain("position is the zero vector"));
    }

    let speed_sq = velocity.length_squared();
    let ang_momentum = position.cross(velocity);
    let ang_momentum_mag = ang_momentum.length();

    if ang_momentum_mag <= tolerance * radius * speed_sq.sqrt() || ang_momentum_mag == 0.0 {
        return Err(OrbitError::Domain(
            "angular momentum vanishes; rectilinear motion has no orbital plane",
        ));
    }

    let h_hat = ang_momentum / ang_momentum_mag;
    let inclination = (ang_momentum.z / ang_momentum_mag).clamp(-1.0, 1.0).acos();

    // n = z × h
    let node = DVec3::new(-ang_momentum.y, ang_momentum.x, 0.0);
    let node_mag = node.length();

    let radial_speed = position.dot(velocity);
    let ecc_vec = ((speed_sq - mu / radius) * position - radial_speed * velocity) / mu;
    let eccentricity = ecc_vec.length();

    let conic = ConicKind::classify(eccentricity, tolerance);
    let circular = conic == ConicKind::Circular;
    let equatorial = node_mag <= tolerance * ang_momentum_mag;

    // Vis-viva
    let semi_major_axis = 1.0 / (2.0 / radius - speed_sq / mu);
    let (semi_latus_rectum, semi_major_axis, eccentricity) = match conic {
        ConicKind::Circular => (semi_major_axis, semi_major_axis, 0.0),
        ConicKind::Parabolic => (ang_momentum_mag * ang_momentum_mag / mu, f64::INFINITY, 1.0),
        _ => (ang_momentum_mag * ang_momentum_mag / mu, semi_major_axis, eccentricity),
    };
    let inclination = match (equatorial, inclination < PI / 2.0) {
        (true, true) => 0.0,
        (true, false) => PI,
        (false, _) => inclination,
    };

    let (long_asc_node, arg_pe, true_anomaly) = match (equatorial, circular) {
        (true, true) => (0.0, 0.0, signed_angle(DVec3::X, position, h_hat)),
        (true, false) => (
            0.0,
            signed_angle(DVec3::X, ecc_vec, h_hat),
            signed_angle(ecc_vec, position, h_hat),
        ),
        (false, true) => (
            node.y.atan2(node.x),
            0.0,
            signed_angle(node, position, h_hat),
        ),
        (false, false) => (
            node.y.atan2(node.x),
            signed_angle(node, ecc_vec, h_hat),
            signed_angle(ecc_vec, position, h_hat),
        ),
    };

    trace!(
        eccentricity,
        inclination,
        equatorial,
        circular,
        "converted state vectors to elements"
    );

    Ok(OrbitalElements::from_parts_unchecked(
        semi_latus_rectum,
        semi_major_axis,
        eccentricity,
        inclination,
        long_asc_node.rem_euclid(TAU),
        arg_pe.rem_euclid(TAU),
        true_anomaly.rem_euclid(TAU),
        conic,
    ))
}

/// The angle that rotates `from` onto `to` about `axis`, in `(−π, π]`.
///
/// Both vectors are assumed to lie in the plane normal to `axis`.
#[inline]
fn signed_angle(from: DVec3, to: DVec3, axis: DVec3) -> f64 {
    from.cross(to).dot(axis).atan2(from.dot(to))
}

/// Converts classical orbital elements into a Cartesian state.
///
/// The state is first built in the perifocal frame from the semi-latus
/// rectum and the true anomaly, then rotated into the inertial frame by
/// `ω`, `i` and `Ω`.
///
/// # Errors
/// [`OrbitError::Domain`] if `mu` is not positive, or if the true anomaly
/// lies on or beyond the asymptotes of a hyperbolic or parabolic
/// trajectory.
pub fn coe_to_rv(elements: &OrbitalElements, mu: f64) -> Result<StateVectors> {
    if mu <= 0.0 || !mu.is_finite() {
        return Err(OrbitError::Domain("gravitational parameter must be positive"));
    }

    let p = elements.get_semi_latus_rectum();
    let eccentricity = elements.get_eccentricity();
    let (sin_nu, cos_nu) = elements.get_true_anomaly().sin_cos();

    let denominator = 1.0 + eccentricity * cos_nu;
    if denominator <= SINGULARITY_TOLERANCE {
        return Err(OrbitError::Domain(
            "true anomaly lies beyond the asymptotes of the trajectory",
        ));
    }

    let radius = p / denominator;
    let pqw_position = DVec2::new(radius * cos_nu, radius * sin_nu);
    let pqw_velocity = (mu / p).sqrt() * DVec2::new(-sin_nu, eccentricity + cos_nu);

    let matrix = Matrix3x2::from_orientation(
        elements.get_inclination(),
        elements.get_arg_pe(),
        elements.get_long_asc_node(),
    );

    Ok(StateVectors {
        position: matrix.dot_vec(pqw_position),
        velocity: matrix.dot_vec(pqw_velocity),
    })
}

/// Wraps an angle into `(−π, π]`.
#[inline]
pub(crate) fn wrap_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Converts a true anomaly into an eccentric anomaly, for `e < 1`.
///
/// The result lies in `(−π, π]`.
pub fn true_to_eccentric_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let (sin_nu, cos_nu) = true_anomaly.sin_cos();
    let sqrt_one_minus_e_sq = (1.0 - eccentricity * eccentricity).sqrt();

    (sqrt_one_minus_e_sq * sin_nu).atan2(eccentricity + cos_nu)
}

/// Converts an eccentric anomaly into a true anomaly, for `e < 1`.
///
/// Whole revolutions in the eccentric anomaly carry over into the result.
pub fn eccentric_to_true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    // https://en.wikipedia.org/wiki/True_anomaly#From_the_eccentric_anomaly
    let (s, c) = eccentric_anomaly.sin_cos();
    let beta = eccentricity / (1.0 + (1.0 - eccentricity * eccentricity).sqrt());

    eccentric_anomaly + 2.0 * (beta * s / (1.0 - beta * c)).atan()
}

/// Kepler's equation: `M = E − e sin E`.
pub fn eccentric_to_mean_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// Converts a true anomaly into a hyperbolic anomaly, for `e > 1`.
///
/// The true anomaly is first wrapped into `(−π, π]`; it must then lie
/// strictly between the asymptotes, `|ν| < acos(−1/e)`, or the result is
/// not finite.
pub fn true_to_hyperbolic_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let half_nu = wrap_pi(true_anomaly) * 0.5;

    2.0 * (((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt() * half_nu.tan()).atanh()
}

/// Converts a hyperbolic anomaly into a true anomaly, for `e > 1`.
pub fn hyperbolic_to_true_anomaly(hyperbolic_anomaly: f64, eccentricity: f64) -> f64 {
    // tan(f/2) = sqrt((e+1)/(e-1))*tanh(H/2)
    2.0 * (((eccentricity + 1.0) / (eccentricity - 1.0)).sqrt()
        * (hyperbolic_anomaly * 0.5).tanh())
    .atan()
}

/// The hyperbolic Kepler equation: `M = e sinh H − H`.
pub fn hyperbolic_to_mean_anomaly(hyperbolic_anomaly: f64, eccentricity: f64) -> f64 {
    eccentricity * hyperbolic_anomaly.sinh() - hyperbolic_anomaly
}

/// Barker's equation: the parabolic mean anomaly `M = D + D³/3`, where
/// `D = tan(ν/2)`.
///
/// This mean anomaly advances at `2√(μ/p³)` radians per second.
pub fn true_to_mean_anomaly_parabolic(true_anomaly: f64) -> f64 {
    let d = (wrap_pi(true_anomaly) * 0.5).tan();
    d + d * d * d / 3.0
}

/// Inverts Barker's equation, giving a true anomaly in `(−π, π)`.
pub fn mean_to_true_anomaly_parabolic(mean_anomaly: f64) -> f64 {
    // D³/3 + D − M = 0 is strictly increasing in D.
    let d = solve_monotone_cubic(1.0 / 3.0, 0.0, 1.0, -mean_anomaly);
    2.0 * d.atan()
}

/// Converts a true anomaly into a mean anomaly for any conic.
///
/// For closed orbits the result lies in `(−π, π]`.
pub fn true_to_mean_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    match ConicKind::classify(eccentricity, SINGULARITY_TOLERANCE) {
        ConicKind::Circular | ConicKind::Elliptic => eccentric_to_mean_anomaly(
            true_to_eccentric_anomaly(true_anomaly, eccentricity),
            eccentricity,
        ),
        ConicKind::Parabolic => true_to_mean_anomaly_parabolic(true_anomaly),
        ConicKind::Hyperbolic => hyperbolic_to_mean_anomaly(
            true_to_hyperbolic_anomaly(true_anomaly, eccentricity),
            eccentricity,
        ),
    }
}

/// Converts a mean anomaly into a true anomaly for any conic, solving
/// Kepler's equation where needed.
///
/// # Errors
/// [`OrbitError::Convergence`] if the solver runs out of iterations, and
/// [`OrbitError::Domain`] if the mean anomaly is not finite.
pub fn mean_to_true_anomaly(mean_anomaly: f64, eccentricity: f64) -> Result<f64> {
    match ConicKind::classify(eccentricity, SINGULARITY_TOLERANCE) {
        ConicKind::Circular | ConicKind::Elliptic => {
            let eccentric_anomaly = solvers::solve_elliptic(eccentricity, mean_anomaly)?;
            Ok(eccentric_to_true_anomaly(eccentric_anomaly, eccentricity))
        }
        ConicKind::Parabolic => {
            if !mean_anomaly.is_finite() {
                return Err(OrbitError::Domain("mean anomaly must be finite"));
            }
            Ok(mean_to_true_anomaly_parabolic(mean_anomaly))
        }
        ConicKind::Hyperbolic => {
            let hyperbolic_anomaly = solvers::solve_hyperbolic(eccentricity, mean_anomaly)?;
            Ok(hyperbolic_to_true_anomaly(hyperbolic_anomaly, eccentricity))
        }
    }
}
