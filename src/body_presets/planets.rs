//! This module contains presets for planets of the Solar System.

use crate::{
    constants::{
        GM_EARTH, GM_JUPITER, GM_MARS, GM_MERCURY, GM_VENUS, R_EARTH, R_JUPITER, R_MARS,
        R_MERCURY, R_VENUS,
    },
    Body,
};

/// Returns Mercury.
pub fn mercury() -> Body {
    Body {
        name: "Mercury".to_string(),
        mu: GM_MERCURY,
        radius: R_MERCURY,
    }
}

/// Returns Venus.
pub fn venus() -> Body {
    Body {
        name: "Venus".to_string(),
        mu: GM_VENUS,
        radius: R_VENUS,
    }
}

/// Returns the Earth.
pub fn earth() -> Body {
    Body {
        name: "Earth".to_string(),
        mu: GM_EARTH,
        radius: R_EARTH,
    }
}

/// Returns Mars.
pub fn mars() -> Body {
    Body {
        name: "Mars".to_string(),
        mu: GM_MARS,
        radius: R_MARS,
    }
}

/// Returns Jupiter.
pub fn jupiter() -> Body {
    Body {
        name: "Jupiter".to_string(),
        mu: GM_JUPITER,
        radius: R_JUPITER,
    }
}
