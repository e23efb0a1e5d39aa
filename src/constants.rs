//! Physical and astronomical constants, in SI.

/// Newtonian gravitational constant, in m^3 kg^-1 s^-2.
pub const G: f64 = 6.674_30e-11;

/// The astronomical unit, in meters.
pub const AU: f64 = 1.495_978_707e11;

/// Gravitational parameter of the Sun, in m^3 s^-2.
pub const GM_SUN: f64 = 1.327_124_400_42e20;

/// Gravitational parameter of Mercury, in m^3 s^-2.
pub const GM_MERCURY: f64 = 2.203_2e13;

/// Gravitational parameter of Venus, in m^3 s^-2.
pub const GM_VENUS: f64 = 3.248_59e14;

/// Gravitational parameter of the Earth, in m^3 s^-2.
pub const GM_EARTH: f64 = 3.986_004_418e14;

/// Gravitational parameter of the Moon, in m^3 s^-2.
pub const GM_MOON: f64 = 4.902_800_076e12;

/// Gravitational parameter of Mars, in m^3 s^-2.
pub const GM_MARS: f64 = 4.282_837e13;

/// Gravitational parameter of Jupiter, in m^3 s^-2.
pub const GM_JUPITER: f64 = 1.266_865_34e17;

/// Mean radius of the Sun, in meters.
pub const R_SUN: f64 = 6.957e8;

/// Mean radius of Mercury, in meters.
pub const R_MERCURY: f64 = 2.439_7e6;

/// Mean radius of Venus, in meters.
pub const R_VENUS: f64 = 6.051_8e6;

/// Equatorial radius of the Earth (WGS84), in meters.
pub const R_EARTH: f64 = 6_378_137.0;

/// Mean radius of the Moon, in meters.
pub const R_MOON: f64 = 1.737_4e6;

/// Mean radius of Mars, in meters.
pub const R_MARS: f64 = 3.389_5e6;

/// Mean radius of Jupiter, in meters.
pub const R_JUPITER: f64 = 6.991_1e7;

/// Earth's J2 zonal harmonic coefficient.
pub const J2_EARTH: f64 = 1.082_626_8e-3;

/// Earth's rotation rate, in radians per second.
pub const EARTH_ROTATION_RATE: f64 = 7.292_115_146_706_979e-5;
