//! Two-line element set ingestion.
//!
//! TLEs are mean elements fitted for the SGP4 model, so the only sound way to
//! turn one into a state vector is to run SGP4 on it. Both parsing and
//! propagation are done by the [`sgp4`] crate; this module converts its
//! output into SI units and an [`Epoch`].

use core::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike};
use glam::DVec3;
use tracing::{debug, info};

use crate::{Duration, Epoch, OrbitError, Result, StateVectors};

/// A parsed two-line element set.
///
/// Cloning is cheap; clones share the parsed elements.
#[derive(Clone)]
pub struct Tle {
    elements: Arc<sgp4::Elements>,
    epoch: Epoch,
}

impl fmt::Debug for Tle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tle")
            .field("object_name", &self.elements.object_name)
            .field("norad_id", &self.elements.norad_id)
            .field("datetime", &self.elements.datetime)
            .finish_non_exhaustive()
    }
}

/// The SGP4 state of a TLE at some time.
///
/// The vectors are in the TEME frame, in meters and meters per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TleState {
    /// Position and velocity.
    pub state: StateVectors,
    /// The instant the state refers to.
    pub epoch: Epoch,
}

/// Parses a TLE in either 2-line or 3-line (with a leading name line) form.
///
/// Blank lines and trailing whitespace are ignored.
///
/// # Errors
/// [`OrbitError::Tle`] if the text doesn't hold a line 1 followed by a line 2,
/// or if either line fails to parse.
pub fn parse_tle(text: &str) -> Result<Tle> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let (name, line1, line2) = match lines.as_slice() {
        [line1, line2] => (None, *line1, *line2),
        [name, line1, line2] => (Some(name.trim().to_string()), *line1, *line2),
        other => {
            return Err(OrbitError::Tle(format!(
                "expected 2 or 3 non-empty lines, got {}",
                other.len()
            )))
        }
    };

    if !line1.starts_with('1') || !line2.starts_with('2') {
        return Err(OrbitError::Tle(
            "element lines must start with '1' and '2'".to_string(),
        ));
    }

    debug!(name = name.as_deref().unwrap_or(""), "parsing TLE");
    let elements = sgp4::Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
    info!(
        norad_id = elements.norad_id,
        epoch = %elements.datetime,
        "parsed TLE"
    );

    let epoch = epoch_from_naive_utc(&elements.datetime)?;

    Ok(Tle {
        elements: Arc::new(elements),
        epoch,
    })
}

impl Tle {
    /// The satellite name from the first line of a 3-line TLE.
    pub fn get_name(&self) -> Option<&str> {
        self.elements.object_name.as_deref()
    }

    /// The epoch the elements were fitted at.
    pub fn get_epoch(&self) -> Epoch {
        self.epoch
    }

    /// The underlying SGP4 elements.
    pub fn get_elements(&self) -> &sgp4::Elements {
        &self.elements
    }

    /// Runs SGP4 `minutes` after the TLE epoch.
    ///
    /// # Errors
    /// [`OrbitError::Tle`] if SGP4 rejects the elements or the satellite
    /// has decayed by then.
    pub fn propagate(&self, minutes: f64) -> Result<TleState> {
        let epoch = self
            .get_epoch()
            .checked_add(Duration::from_minutes(minutes)?)?;

        Ok(TleState {
            state: self.run_sgp4(minutes)?,
            epoch,
        })
    }

    /// Runs SGP4 at an absolute epoch.
    pub fn state_at(&self, epoch: Epoch) -> Result<TleState> {
        let offset = epoch - self.get_epoch();

        Ok(TleState {
            state: self.run_sgp4(offset.to_minutes())?,
            epoch,
        })
    }

    fn run_sgp4(&self, minutes: f64) -> Result<StateVectors> {
        let prediction = sgp4::Constants::from_elements(&self.elements)?.propagate(minutes)?;

        // TEME kilometres to meters
        Ok(StateVectors::new(
            DVec3::from_array(prediction.position) * 1e3,
            DVec3::from_array(prediction.velocity) * 1e3,
        ))
    }
}

fn epoch_from_naive_utc(datetime: &NaiveDateTime) -> Result<Epoch> {
    // chrono encodes a leap second as nanoseconds past 1e9
    if datetime.nanosecond() >= 1_000_000_000 {
        return Err(OrbitError::Tle(format!(
            "TLE epoch {datetime} falls on a leap second"
        )));
    }

    Epoch::from_gregorian_utc(
        datetime.year(),
        datetime.month() as u8,
        datetime.day() as u8,
        datetime.hour() as u8,
        datetime.minute() as u8,
        datetime.second() as u8,
        datetime.nanosecond(),
    )
    .map_err(|err| OrbitError::Tle(format!("TLE epoch {datetime} is not representable: {err}")))
}
