//! The unit-normalization boundary.
//!
//! Everything past this module works in plain SI `f64`s: meters, meters per
//! second, radians and seconds. Callers may hand the constructors either a
//! bare number (taken to already be SI) or a [`Quantity`] tagged with a
//! [`Unit`]; the `normalize_*` functions turn both into SI and reject tags of
//! the wrong dimension.

use core::fmt;

use glam::DVec3;

use crate::{constants::AU, time::Duration, OrbitError, Result};

/// The physical dimension of a [`Unit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Distances.
    Length,
    /// Speeds.
    Velocity,
    /// Angles.
    Angle,
    /// Time spans.
    Time,
    /// Pure numbers such as the eccentricity.
    Dimensionless,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Length => "length",
            Dimension::Velocity => "velocity",
            Dimension::Angle => "angle",
            Dimension::Time => "time",
            Dimension::Dimensionless => "dimensionless",
        };
        f.write_str(name)
    }
}

/// A unit that an input value may be tagged with.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Meter,
    Kilometer,
    AstronomicalUnit,
    MeterPerSecond,
    KilometerPerSecond,
    Radian,
    Degree,
    Second,
    Minute,
    Hour,
    Day,
    Dimensionless,
}

impl Unit {
    /// The dimension this unit measures.
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Meter | Unit::Kilometer | Unit::AstronomicalUnit => Dimension::Length,
            Unit::MeterPerSecond | Unit::KilometerPerSecond => Dimension::Velocity,
            Unit::Radian | Unit::Degree => Dimension::Angle,
            Unit::Second | Unit::Minute | Unit::Hour | Unit::Day => Dimension::Time,
            Unit::Dimensionless => Dimension::Dimensionless,
        }
    }

    /// The factor that converts a value in this unit into SI.
    pub fn to_si_factor(self) -> f64 {
        match self {
            Unit::Meter | Unit::MeterPerSecond | Unit::Radian | Unit::Second => 1.0,
            Unit::Dimensionless => 1.0,
            Unit::Kilometer | Unit::KilometerPerSecond => 1e3,
            Unit::AstronomicalUnit => AU,
            Unit::Degree => core::f64::consts::PI / 180.0,
            Unit::Minute => 60.0,
            Unit::Hour => 3600.0,
            Unit::Day => 86400.0,
        }
    }
}

/// A scalar tagged with the unit it is expressed in.
///
/// # Example
/// ```
/// use twobody::units::{normalize_length, Quantity, Unit};
///
/// let a = Quantity::new(7000.0, Unit::Kilometer);
/// assert_eq!(normalize_length(a, "semi-major axis").unwrap(), 7.0e6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity {
    /// The numeric value, in `unit`.
    pub value: f64,
    /// The unit of `value`.
    pub unit: Unit,
}

impl Quantity {
    /// Tags a value with a unit.
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    fn to_si(self, label: &'static str, expected: Dimension) -> Result<f64> {
        let found = self.unit.dimension();
        if found != expected {
            return Err(OrbitError::Unit {
                label,
                expected,
                found,
            });
        }
        Ok(self.value * self.unit.to_si_factor())
    }
}

/// A scalar input: either a bare SI number or a unit-tagged quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// A number already in SI.
    Bare(f64),
    /// A number with an explicit unit.
    Tagged(Quantity),
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Bare(value)
    }
}

impl From<Quantity> for Scalar {
    fn from(quantity: Quantity) -> Self {
        Scalar::Tagged(quantity)
    }
}

/// A vector input: either a bare SI vector or a vector tagged with one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Vector {
    /// A vector already in SI.
    Bare(DVec3),
    /// A vector whose three components share a unit.
    Tagged(DVec3, Unit),
}

impl From<DVec3> for Vector {
    fn from(value: DVec3) -> Self {
        Vector::Bare(value)
    }
}

impl From<[f64; 3]> for Vector {
    fn from(value: [f64; 3]) -> Self {
        Vector::Bare(DVec3::from_array(value))
    }
}

impl From<(DVec3, Unit)> for Vector {
    fn from((value, unit): (DVec3, Unit)) -> Self {
        Vector::Tagged(value, unit)
    }
}

/// A time-span input: a [`Duration`], bare seconds, or a time-tagged quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeSpan {
    /// A duration value.
    Duration(Duration),
    /// A scalar in seconds, or tagged with a time unit.
    Scalar(Scalar),
}

impl From<Duration> for TimeSpan {
    fn from(value: Duration) -> Self {
        TimeSpan::Duration(value)
    }
}

impl From<f64> for TimeSpan {
    fn from(value: f64) -> Self {
        TimeSpan::Scalar(Scalar::Bare(value))
    }
}

impl From<Quantity> for TimeSpan {
    fn from(value: Quantity) -> Self {
        TimeSpan::Scalar(Scalar::Tagged(value))
    }
}

fn normalize_scalar(value: Scalar, label: &'static str, expected: Dimension) -> Result<f64> {
    match value {
        Scalar::Bare(value) => Ok(value),
        Scalar::Tagged(quantity) => quantity.to_si(label, expected),
    }
}

/// Normalizes a length to meters.
pub fn normalize_length(value: impl Into<Scalar>, label: &'static str) -> Result<f64> {
    normalize_scalar(value.into(), label, Dimension::Length)
}

/// Normalizes an angle to radians.
pub fn normalize_angle(value: impl Into<Scalar>, label: &'static str) -> Result<f64> {
    normalize_scalar(value.into(), label, Dimension::Angle)
}

/// Normalizes a dimensionless value.
pub fn normalize_dimensionless(value: impl Into<Scalar>, label: &'static str) -> Result<f64> {
    normalize_scalar(value.into(), label, Dimension::Dimensionless)
}

/// Normalizes a position vector to meters.
pub fn normalize_position(value: impl Into<Vector>, label: &'static str) -> Result<DVec3> {
    normalize_vector(value.into(), label, Dimension::Length)
}

/// Normalizes a velocity vector to meters per second.
pub fn normalize_velocity(value: impl Into<Vector>, label: &'static str) -> Result<DVec3> {
    normalize_vector(value.into(), label, Dimension::Velocity)
}

/// Normalizes a time span to seconds.
pub fn normalize_time(value: impl Into<TimeSpan>, label: &'static str) -> Result<f64> {
    match value.into() {
        TimeSpan::Duration(duration) => Ok(duration.to_seconds()),
        TimeSpan::Scalar(scalar) => normalize_scalar(scalar, label, Dimension::Time),
    }
}

fn normalize_vector(value: Vector, label: &'static str, expected: Dimension) -> Result<DVec3> {
    match value {
        Vector::Bare(vec) => Ok(vec),
        Vector::Tagged(vec, unit) => {
            let found = unit.dimension();
            if found != expected {
                return Err(OrbitError::Unit {
                    label,
                    expected,
                    found,
                });
            }
            Ok(vec * unit.to_si_factor())
        }
    }
}
