//! This module contains presets for common attractors.
//!
//! Gravitational parameters are the IAU/JPL values; radii are mean radii,
//! except for the Earth, which uses the WGS84 equatorial radius.

mod moons;
mod planets;
mod stars;

pub use moons::*;
pub use planets::*;
pub use stars::*;
