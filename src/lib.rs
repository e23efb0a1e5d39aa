//! # Two-body orbit state and propagation
//! This library crate models the state of a body moving under the gravity of
//! a single attractor, and propagates that state through time.
//!
//! An orbit can be described two ways: by a Cartesian state (position and
//! velocity at an instant) or by the six classical orbital elements. The
//! first is what numerical code wants; the second is what people think in.
//! This crate converts between them in both directions, handling every conic
//! (circular, elliptic, parabolic, hyperbolic) as well as the equatorial and
//! circular cases where some of the angles are undefined.
//!
//! ## Getting started
//! The main types are:
//! - [`Orbit`]: an immutable orbit state around an attractor at an epoch.
//!   Its orbital elements are computed on first access and cached for the
//!   lifetime of the value. Propagating or maneuvering returns a brand-new
//!   `Orbit`.
//! - [`Body`]: the attractor, supplying the gravitational parameter μ.
//!   The [`body_presets`] module contains the Sun, the Earth, the Moon and
//!   several planets.
//! - [`Epoch`] and [`Duration`]: points in time and time intervals.
//! - [`OrbitalElements`] and [`StateVectors`]: the two representations of a
//!   state, converted by the functions in [`conversion`].
//! - [`PropagationMethod`]: which algorithm [`Orbit::propagate`] uses.
//!
//! Inputs may be bare SI values or values tagged with a unit (see
//! [`units`]). Internally, everything is SI: meters, meters per second,
//! radians and seconds.
//!
//! ## Example
//!
//! ```rust
//! use twobody::{body_presets, Orbit, PropagationMethod};
//!
//! # fn main() -> twobody::Result<()> {
//! let earth = body_presets::earth();
//!
//! // A circular, equatorial low Earth orbit
//! let orbit = Orbit::from_classical(&earth, 7000e3, 0.0, 0.0, 0.0, 0.0, 0.0, None)?;
//!
//! let period = orbit.get_orbital_period()?;
//! let later = orbit.propagate(period, PropagationMethod::Keplerian)?;
//!
//! // After one full period the satellite is back where it started.
//! assert!((later.get_position() - orbit.get_position()).length() < 1e-3);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod body;
pub mod body_presets;
pub mod constants;
pub mod conversion;
mod elements;
mod error;
pub mod frames;
mod orbit;
pub mod propagation;
mod solvers;
mod time;
pub mod tle;
pub mod units;

use core::f64::consts::PI;

use glam::{DVec2, DVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use body::Body;
pub use elements::{ConicKind, OrbitalElements, StateVectors};
pub use error::{OrbitError, Result};
pub use frames::{Frame, FrameState, FrameTransform};
pub use orbit::Orbit;
pub use propagation::PropagationMethod;
pub use time::{Duration, Epoch};
pub use units::{Quantity, Unit};

/// A constant used to get the initial seed for the eccentric anomaly.
///
/// It's very arbitrary, but according to some testing, a value just
/// below 1 works better than exactly 1.
///
/// Source:
/// "Two fast and accurate routines for solving the elliptic Kepler
/// equation for all values of the eccentricity and mean anomaly"
/// by Daniele Tommasini and David N. Olivieri,
/// section 2.1.2, 'The "rational seed"'
///
/// <https://doi.org/10.1051/0004-6361/202141423>
const B: f64 = 0.999999;

/// A constant used for the Laguerre method.
///
/// The paper "An improved algorithm due to
/// laguerre for the solution of Kepler's equation."
/// says:
///
/// > Similar experimentation has been done with values of n both greater and smaller
/// > than n = 5. The speed of convergence seems to be very insensitive to the choice of n.
const N_F64: f64 = 5.0;

const PI_SQUARED: f64 = PI * PI;

/// The maximum number of iterations for the numerical approach algorithms.
///
/// This is used to prevent infinite loops in case the method fails to converge.
/// Solvers that hit it report [`OrbitError::Convergence`].
pub const NUMERIC_MAX_ITERS: u32 = 1000;

/// The step size, in radians, below which the Kepler-equation solvers
/// consider themselves converged.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-13;

/// The default tolerance used to detect circular (`e ≈ 0`), parabolic
/// (`e ≈ 1`) and equatorial (`sin i ≈ 0`) orbits.
pub const SINGULARITY_TOLERANCE: f64 = 1e-10;

/// A struct representing a 3x2 matrix.
///
/// This struct is used to store the transformation matrix
/// for transforming a 2D vector into a 3D vector.
///
/// Namely, it is used to tilt a position or velocity in the perifocal
/// (orbital-plane) frame into the inertial frame, using the orbital
/// orientation.
///
/// Each element is named `eXY`, where `X` is the row and `Y` is the column.
///
/// # Example
/// ```
/// use glam::{DVec2, DVec3};
///
/// use twobody::Matrix3x2;
///
/// let matrix = Matrix3x2 {
///    e11: 1.0, e12: 0.0,
///    e21: 0.0, e22: 1.0,
///    e31: 0.0, e32: 0.0,
/// };
///
/// let vec = DVec2::new(1.0, 2.0);
///
/// let result = matrix.dot_vec(vec);
///
/// assert_eq!(result, DVec3::new(1.0, 2.0, 0.0));
/// ```
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix3x2 {
    // Element XY
    pub e11: f64,
    pub e12: f64,
    pub e21: f64,
    pub e22: f64,
    pub e31: f64,
    pub e32: f64,
}

impl Matrix3x2 {
    /// Builds the perifocal-to-inertial transformation for an orbit with the
    /// given inclination, argument of periapsis and longitude of the
    /// ascending node.
    ///
    /// The first column is the unit vector towards periapsis, the second is
    /// the unit vector 90° ahead of it in the direction of motion.
    pub fn from_orientation(inclination: f64, arg_pe: f64, long_asc_node: f64) -> Self {
        let (sin_inc, cos_inc) = inclination.sin_cos();
        let (sin_arg_pe, cos_arg_pe) = arg_pe.sin_cos();
        let (sin_lan, cos_lan) = long_asc_node.sin_cos();

        // https://downloads.rene-schwarz.com/download/M001-Keplerian_Orbit_Elements_to_Cartesian_State_Vectors.pdf
        Self {
            e11: cos_arg_pe * cos_lan - sin_arg_pe * cos_inc * sin_lan,
            e12: -(sin_arg_pe * cos_lan + cos_arg_pe * cos_inc * sin_lan),

            e21: cos_arg_pe * sin_lan + sin_arg_pe * cos_inc * cos_lan,
            e22: cos_arg_pe * cos_inc * cos_lan - sin_arg_pe * sin_lan,

            e31: sin_arg_pe * sin_inc,
            e32: cos_arg_pe * sin_inc,
        }
    }

    /// Computes a dot product between this matrix and a 2D vector.
    ///
    /// # Example
    /// ```
    /// use glam::{DVec2, DVec3};
    ///
    /// use twobody::Matrix3x2;
    ///
    /// let matrix = Matrix3x2 {
    ///     e11: 1.0, e12: 0.0,
    ///     e21: 0.0, e22: 1.0,
    ///     e31: 1.0, e32: 1.0,
    /// };
    ///
    /// let vec = DVec2::new(1.0, 2.0);
    ///
    /// let result = matrix.dot_vec(vec);
    ///
    /// assert_eq!(result, DVec3::new(1.0, 2.0, 3.0));
    /// ```
    pub fn dot_vec(&self, vec: DVec2) -> DVec3 {
        DVec3::new(
            vec.x * self.e11 + vec.y * self.e12,
            vec.x * self.e21 + vec.y * self.e22,
            vec.x * self.e31 + vec.y * self.e32,
        )
    }
}

#[cfg(test)]
mod tests;

#[inline]
fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - (eccentricity * eccentric_anomaly.sin()) - mean_anomaly
}
#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - (eccentricity * eccentric_anomaly.cos())
}
#[inline]
fn keplers_equation_second_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentricity * eccentric_anomaly.sin()
}

/// Get the hyperbolic sine and cosine of a number.
///
/// Usually faster than calling `x.sinh()` and `x.cosh()` separately.
///
/// Returns a tuple which contains:
/// - 0: The hyperbolic sine of the number.
/// - 1: The hyperbolic cosine of the number.
pub fn sinhcosh(x: f64) -> (f64, f64) {
    let e_x = x.exp();
    let e_neg_x = (-x).exp();

    ((e_x - e_neg_x) * 0.5, (e_x + e_neg_x) * 0.5)
}

/// Solve a cubic equation to get its real root.
///
/// The cubic equation is in the form of:
/// ax^3 + bx^2 + cx + d
///
/// The cubic equation is assumed to be monotone.
/// If it isn't monotone (i.e., the discriminant
/// is negative), it returns NaN.
fn solve_monotone_cubic(a: f64, b: f64, c: f64, d: f64) -> f64 {
    // Normalize coefficients so that a = 1
    let b = b / a;
    let c = c / a;
    let d = d / a;

    // Depress the cubic equation
    // t^3 + pt + q = 0
    // ...where, since a = 1:
    // p = (3c - b^2) / 3
    // q = (2b^3 - 9bc + 27d) / 27
    let b_sq = b * b;

    let p = (3.0 * c - b_sq) / 3.0;
    let q = (2.0 * b_sq * b - 9.0 * b * c + 27.0 * d) / 27.0;

    let q_div_two = q / 2.0;
    let p_div_three = p / 3.0;
    let p_div_three_cubed = p_div_three * p_div_three * p_div_three;
    let discriminant = q_div_two * q_div_two + p_div_three_cubed;

    if discriminant < 0.0 {
        // Function is not monotone
        return f64::NAN;
    }

    let t = {
        let sqrt_discriminant = discriminant.sqrt();
        let neg_q_div_two = -q_div_two;
        let u = (neg_q_div_two + sqrt_discriminant).cbrt();
        let v = (neg_q_div_two - sqrt_discriminant).cbrt();
        u + v
    };

    // x_i = t_i - b / 3a
    // here, a = 1
    t - b / 3.0
}
