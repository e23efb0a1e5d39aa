#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{G, GM_EARTH, R_EARTH},
    OrbitError, Result,
};

/// A struct representing a celestial body that other bodies orbit.
///
/// Orbits borrow their attractor rather than owning it, so one `Body` can be
/// shared by any number of orbits, across threads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// The name of the celestial body.
    pub name: String,

    /// The gravitational parameter `μ = GM` of the body, in m³/s².
    pub mu: f64,

    /// The radius of the celestial body, in meters.
    pub radius: f64,
}

impl Body {
    /// Creates a new `Body` from its gravitational parameter.
    ///
    /// # Errors
    /// [`OrbitError::Domain`] if `mu` is not positive and finite.
    pub fn new(name: impl Into<String>, mu: f64, radius: f64) -> Result<Self> {
        if mu <= 0.0 || !mu.is_finite() {
            return Err(OrbitError::Domain("gravitational parameter must be positive"));
        }

        Ok(Self {
            name: name.into(),
            mu,
            radius,
        })
    }

    /// Creates a new `Body` from its mass in kilograms, with `μ = G·M`.
    pub fn from_mass(name: impl Into<String>, mass: f64, radius: f64) -> Result<Self> {
        Self::new(name, G * mass, radius)
    }

    /// The mass of the body in kilograms, `μ / G`.
    pub fn get_mass(&self) -> f64 {
        self.mu / G
    }
}

impl Default for Body {
    /// Creates a default `Body` instance.
    ///
    /// Currently, this function returns the Earth.  
    /// However, do not rely on this behavior, as it may change in the future.
    fn default() -> Self {
        Self {
            name: "Earth".to_string(),
            mu: GM_EARTH,
            radius: R_EARTH,
        }
    }
}
