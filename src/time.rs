//! Points in time and time intervals.
//!
//! Both types are thin, immutable wrappers around [`hifitime`], which handles
//! nanosecond precision and all of the time-scale bookkeeping. The wrappers
//! add the one thing hifitime doesn't: overflow is reported as
//! [`OrbitError::Range`] instead of silently saturating.

use core::{
    fmt,
    ops::{Add, Neg, Sub},
};

use hifitime::{Duration as HifiDuration, Epoch as HifiEpoch, TimeScale};

use crate::{OrbitError, Result};

/// The largest time span, in seconds, that can be represented safely.
///
/// hifitime stores durations as a number of centuries in an `i16`, which gives
/// roughly ±1.03e14 seconds. We keep some headroom below that.
const MAX_SPAN_SECONDS: f64 = 1.0e14;

/// The largest offset from J2000, in seconds, that an epoch may have.
///
/// hifitime measures epochs from J1900, a century before J2000.
const MAX_EPOCH_OFFSET_SECONDS: f64 = MAX_SPAN_SECONDS - 3.2e9;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// A signed time interval.
///
/// # Example
/// ```
/// use twobody::Duration;
///
/// let one_hour = Duration::from_hours(1.0).unwrap();
/// assert_eq!(one_hour.to_seconds(), 3600.0);
/// assert_eq!((-one_hour).to_seconds(), -3600.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Duration(HifiDuration);

impl Duration {
    /// A zero-length interval.
    pub const ZERO: Duration = Duration(HifiDuration::ZERO);

    /// Creates a duration from a number of seconds.
    ///
    /// Fails with [`OrbitError::Range`] if the value is not finite or is too
    /// large to be represented.
    pub fn from_seconds(seconds: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds.abs() > MAX_SPAN_SECONDS {
            return Err(OrbitError::Range(format!(
                "{seconds} s cannot be represented as a duration"
            )));
        }

        Ok(Duration(HifiDuration::from_seconds(seconds)))
    }

    /// Creates a duration from a number of minutes.
    pub fn from_minutes(minutes: f64) -> Result<Self> {
        Self::from_seconds(minutes * SECONDS_PER_MINUTE)
    }

    /// Creates a duration from a number of hours.
    pub fn from_hours(hours: f64) -> Result<Self> {
        Self::from_seconds(hours * SECONDS_PER_HOUR)
    }

    /// Creates a duration from a number of days (of exactly 86400 s).
    pub fn from_days(days: f64) -> Result<Self> {
        Self::from_seconds(days * SECONDS_PER_DAY)
    }

    /// Wraps an existing hifitime duration.
    pub fn from_hifitime(duration: HifiDuration) -> Self {
        Duration(duration)
    }

    /// The underlying hifitime duration.
    pub fn to_hifitime(self) -> HifiDuration {
        self.0
    }

    /// The length of this interval in seconds.
    pub fn to_seconds(self) -> f64 {
        self.0.to_seconds()
    }

    /// The length of this interval in minutes.
    pub fn to_minutes(self) -> f64 {
        self.to_seconds() / SECONDS_PER_MINUTE
    }

    /// The length of this interval in days.
    pub fn to_days(self) -> f64 {
        self.to_seconds() / SECONDS_PER_DAY
    }

    /// Adds two durations, failing if the sum is out of range.
    pub fn checked_add(self, other: Duration) -> Result<Duration> {
        Self::from_seconds(self.to_seconds() + other.to_seconds())
    }

    /// Whether this is a negative (backwards) interval.
    pub fn is_negative(self) -> bool {
        self.0 < HifiDuration::ZERO
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration(-self.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An absolute point in time.
///
/// Epochs are built from a fixed reference (a calendar date, or J2000 plus an
/// offset), never from the system clock, so every computation in this crate
/// is reproducible.
///
/// # Example
/// ```
/// use twobody::{Duration, Epoch};
///
/// let start = Epoch::j2000();
/// let later = start.checked_add(Duration::from_days(1.0).unwrap()).unwrap();
///
/// assert!(later > start);
/// assert!(((later - start).to_days() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Epoch(HifiEpoch);

impl Epoch {
    /// The J2000.0 reference epoch: 2000-01-01 12:00:00 TT.
    pub fn j2000() -> Self {
        Epoch(HifiEpoch::from_gregorian(
            2000,
            1,
            1,
            12,
            0,
            0,
            0,
            TimeScale::TT,
        ))
    }

    /// Creates an epoch from a UTC calendar date and time of day.
    ///
    /// # Errors
    /// [`OrbitError::Validation`] if the fields don't form a valid date and
    /// time, e.g. month 13 or February 30th.
    pub fn from_gregorian_utc(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanos: u32,
    ) -> Result<Self> {
        HifiEpoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, nanos)
            .map(Epoch)
            .map_err(|err| {
                OrbitError::Validation(format!(
                    "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{nanos:09} \
                    is not a valid UTC date: {err}"
                ))
            })
    }

    /// Creates an epoch a given interval away from J2000.
    pub fn from_j2000_offset(offset: Duration) -> Result<Self> {
        Self::j2000().checked_add(offset)
    }

    /// Wraps an existing hifitime epoch.
    pub fn from_hifitime(epoch: HifiEpoch) -> Self {
        Epoch(epoch)
    }

    /// The underlying hifitime epoch.
    pub fn to_hifitime(self) -> HifiEpoch {
        self.0
    }

    /// Seconds elapsed since J2000 (negative before it).
    pub fn seconds_since_j2000(self) -> f64 {
        (self.0 - Self::j2000().0).to_seconds()
    }

    /// The Julian date of this epoch in the UTC time scale.
    pub fn to_jde_utc_days(self) -> f64 {
        self.0.to_jde_utc_days()
    }

    /// Moves this epoch forward (or backward, for a negative interval).
    ///
    /// Fails with [`OrbitError::Range`] if the result is not representable.
    pub fn checked_add(self, duration: Duration) -> Result<Epoch> {
        let offset = self.seconds_since_j2000() + duration.to_seconds();
        if !offset.is_finite() || offset.abs() > MAX_EPOCH_OFFSET_SECONDS {
            return Err(OrbitError::Range(format!(
                "{self} shifted by {duration} leaves the representable range"
            )));
        }

        Ok(Epoch(self.0 + duration.0))
    }

    /// Moves this epoch backward (or forward, for a negative interval).
    pub fn checked_sub(self, duration: Duration) -> Result<Epoch> {
        self.checked_add(-duration)
    }

    /// The signed interval from `earlier` to `self`.
    pub fn duration_since(self, earlier: Epoch) -> Duration {
        Duration(self.0 - earlier.0)
    }
}

impl Default for Epoch {
    /// J2000, the conventional epoch when none is specified.
    fn default() -> Self {
        Self::j2000()
    }
}

impl Sub for Epoch {
    type Output = Duration;

    fn sub(self, rhs: Epoch) -> Duration {
        self.duration_since(rhs)
    }
}

impl Add for Duration {
    type Output = Duration;

    /// Adds two durations.
    ///
    /// Sums beyond hifitime's range saturate; use
    /// [`Duration::checked_add`] to detect that instead.
    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
