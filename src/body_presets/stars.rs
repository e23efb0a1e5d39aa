//! This module contains presets for stars.
//!
//! "A star is a luminous spheroid of plasma held together by self-gravity."  
//!
//! \- [Wikipedia](https://en.wikipedia.org/wiki/Star)

use crate::{
    constants::{GM_SUN, R_SUN},
    Body,
};

/// Returns the Sun.
pub fn the_sun() -> Body {
    Body {
        name: "Sun".to_string(),
        mu: GM_SUN,
        radius: R_SUN,
    }
}
