//! Celestial reference frames.
//!
//! Orbits live in an inertial, attractor-centered frame. This module moves
//! their state into and out of the named celestial frames, through the
//! [`FrameTransform`] trait. [`EarthRotation`] is the bundled implementation
//! for Earth-centered orbits.

use core::{fmt, str::FromStr};

use glam::{DMat3, DVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::EARTH_ROTATION_RATE, Epoch, OrbitError, Result, StateVectors};

/// A named celestial reference frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Frame {
    /// The International Celestial Reference System.
    Icrs,
    /// The Geocentric Celestial Reference System.
    Gcrs,
    /// The International Terrestrial Reference System (Earth-fixed).
    Itrs,
}

impl Frame {
    /// The lowercase name of the frame.
    pub fn name(self) -> &'static str {
        match self {
            Frame::Icrs => "icrs",
            Frame::Gcrs => "gcrs",
            Frame::Itrs => "itrs",
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frame {
    type Err = OrbitError;

    /// Parses a frame name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icrs" => Ok(Frame::Icrs),
            "gcrs" => Ok(Frame::Gcrs),
            "itrs" => Ok(Frame::Itrs),
            _ => Err(OrbitError::UnsupportedFrame(s.to_string())),
        }
    }
}

/// A position and velocity expressed in a named frame at an epoch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// The frame the vectors are expressed in.
    pub frame: Frame,
    /// Position, in meters.
    pub position: DVec3,
    /// Velocity, in meters per second.
    pub velocity: DVec3,
    /// The instant the state refers to.
    pub epoch: Epoch,
}

/// Converts between an orbit's inertial state and a named frame.
pub trait FrameTransform {
    /// Expresses an inertial state in `frame`.
    fn inertial_to_frame(&self, state: &StateVectors, epoch: Epoch, frame: Frame)
        -> Result<FrameState>;

    /// Brings a state expressed in a named frame back into the inertial
    /// frame.
    fn frame_to_inertial(&self, state: &FrameState) -> Result<StateVectors>;
}

/// Frame transformations for Earth-centered orbits.
///
/// The inertial frame is GCRS. ICRS shares its axes, and since the vectors
/// here are relative to the attractor they carry over unchanged. ITRS is
/// obtained by rotating about the z-axis by the Earth Rotation Angle, which
/// ignores precession, nutation and polar motion, and by removing the
/// `ω⊕ × r` transport velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EarthRotation;

impl EarthRotation {
    /// The Earth Rotation Angle at an epoch, in radians, in `[0, 2π)`.
    ///
    /// UT1 is approximated by UTC.
    pub fn rotation_angle(epoch: Epoch) -> f64 {
        let days_since_j2000 = epoch.to_jde_utc_days() - 2_451_545.0;
        let turns = 0.779_057_273_264_0 + 1.002_737_811_911_354_5 * days_since_j2000;

        core::f64::consts::TAU * turns.rem_euclid(1.0)
    }

    /// The matrix taking inertial (GCRS) vectors into Earth-fixed axes.
    fn inertial_to_fixed(epoch: Epoch) -> DMat3 {
        DMat3::from_rotation_z(-Self::rotation_angle(epoch))
    }
}

const EARTH_SPIN: DVec3 = DVec3::new(0.0, 0.0, EARTH_ROTATION_RATE);

impl FrameTransform for EarthRotation {
    fn inertial_to_frame(
        &self,
        state: &StateVectors,
        epoch: Epoch,
        frame: Frame,
    ) -> Result<FrameState> {
        let (position, velocity) = match frame {
            Frame::Icrs | Frame::Gcrs => (state.position, state.velocity),
            Frame::Itrs => {
                let rotation = Self::inertial_to_fixed(epoch);
                let position = rotation * state.position;
                let velocity = rotation * state.velocity - EARTH_SPIN.cross(position);
                (position, velocity)
            }
        };

        Ok(FrameState {
            frame,
            position,
            velocity,
            epoch,
        })
    }

    fn frame_to_inertial(&self, state: &FrameState) -> Result<StateVectors> {
        match state.frame {
            Frame::Icrs | Frame::Gcrs => Ok(StateVectors::new(state.position, state.velocity)),
            Frame::Itrs => {
                let rotation = Self::inertial_to_fixed(state.epoch).transpose();
                let velocity = state.velocity + EARTH_SPIN.cross(state.position);
                Ok(StateVectors::new(
                    rotation * state.position,
                    rotation * velocity,
                ))
            }
        }
    }
}
