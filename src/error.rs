use thiserror::Error;

use crate::{elements::ConicKind, propagation::PropagationMethod, units::Dimension};

/// A specialized [`Result`][core::result::Result] type for orbit operations.
pub type Result<T, E = OrbitError> = core::result::Result<T, E>;

/// The error type for everything that can go wrong while building,
/// converting or propagating an orbit.
///
/// The facade never swallows or downgrades these: whatever a conversion
/// or propagation primitive reports reaches the caller unchanged.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    /// A unit-tagged input had the wrong physical dimension.
    #[error("{label} expects a {expected} quantity, got a {found} quantity")]
    Unit {
        /// What the value was supposed to be, e.g. "semi-major axis".
        label: &'static str,
        /// The dimension the parameter requires.
        expected: Dimension,
        /// The dimension of the unit that was supplied.
        found: Dimension,
    },

    /// Degenerate geometry: zero position, zero angular momentum,
    /// a non-positive gravitational parameter, and so on.
    #[error("degenerate geometry: {0}")]
    Domain(&'static str),

    /// A quantity that does not exist for this kind of conic,
    /// e.g. the period of a hyperbola.
    #[error("{quantity} is undefined for a {conic} orbit")]
    UndefinedQuantity {
        /// The quantity that was asked for.
        quantity: &'static str,
        /// The conic the orbit actually is.
        conic: ConicKind,
    },

    /// An iterative solver hit its iteration cap without converging.
    #[error("{solver} did not converge within {iterations} iterations")]
    Convergence {
        /// Which solver gave up.
        solver: &'static str,
        /// The iteration cap that was reached.
        iterations: u32,
    },

    /// The propagation method exists by name but has no implementation yet.
    #[error("propagation method '{0}' is not implemented; available: 'keplerian', 'lagrange'")]
    NotImplemented(PropagationMethod),

    /// Malformed input shape or value.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A frame name outside of `icrs`, `gcrs` and `itrs`.
    #[error("unsupported frame '{0}'; supported frames: 'icrs', 'gcrs', 'itrs'")]
    UnsupportedFrame(String),

    /// Time arithmetic overflowed the underlying representation.
    #[error("time value out of range: {0}")]
    Range(String),

    /// A two-line element set could not be parsed or propagated.
    #[error("TLE error: {0}")]
    Tle(String),
}

impl From<sgp4::Error> for OrbitError {
    fn from(err: sgp4::Error) -> Self {
        OrbitError::Tle(err.to_string())
    }
}
