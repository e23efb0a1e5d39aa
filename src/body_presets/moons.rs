//! This module contains presets for natural satellites.

use crate::{
    constants::{GM_MOON, R_MOON},
    Body,
};

/// Returns the Moon.
pub fn the_moon() -> Body {
    Body {
        name: "Moon".to_string(),
        mu: GM_MOON,
        radius: R_MOON,
    }
}
