//! Fundamental geographic, identity and time types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo;

/// A point on the earth's surface (decimal degrees).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another position (meters).
    pub fn distance_to(&self, other: &GeoPosition) -> f64 {
        geo::distance(self, other)
    }

    /// Initial bearing to another position (degrees, 0 = north, clockwise).
    pub fn bearing_to(&self, other: &GeoPosition) -> f64 {
        geo::bearing(self, other)
    }

    /// Position reached by moving `distance_m` along `heading_deg`.
    pub fn moved(&self, heading_deg: f64, distance_m: f64) -> GeoPosition {
        geo::translate(self, heading_deg, distance_m)
    }
}

/// Heading (degrees) and ground speed (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub heading: f64,
    pub speed: f64,
}

/// Stable scenario-assigned identifier of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a task on the task board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential contact number, displayed as `contact-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u32);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contact-{}", self.0)
    }
}

/// Sequential missile number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissileId(pub u32);

impl fmt::Display for MissileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missile-{}", self.0)
    }
}

/// Simulation clock.
///
/// `scale` is game seconds per real second; 0 pauses the clock.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimClock {
    /// Number of ticks that advanced game time.
    pub tick: u64,
    /// Elapsed game time in seconds.
    pub elapsed_secs: f64,
    /// Mission duration; `None` runs forever.
    pub duration_secs: Option<f64>,
    pub scale: f64,
    /// Scale to restore when un-pausing.
    pub previous_scale: f64,
}

impl SimClock {
    pub fn new(scale: f64, duration_secs: Option<f64>) -> Self {
        Self {
            tick: 0,
            elapsed_secs: 0.0,
            duration_secs,
            scale,
            previous_scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }

    /// Game seconds this frame should advance, given a real frame delta.
    ///
    /// The real delta is capped at `max_real_delta`, scaled, then clamped so
    /// elapsed time never passes the mission duration.
    pub fn game_delta(&self, real_delta: f64, max_real_delta: f64) -> f64 {
        let capped = real_delta.clamp(0.0, max_real_delta);
        let target = self.elapsed_secs + capped * self.scale;
        let target = match self.duration_secs {
            Some(d) => target.min(d),
            None => target,
        };
        target - self.elapsed_secs
    }

    /// Move the clock forward by `dt` game seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }

    pub fn is_paused(&self) -> bool {
        self.scale <= 0.0
    }

    pub fn set_scale(&mut self, scale: f64) {
        let scale = scale.max(0.0);
        if scale > 0.0 {
            self.previous_scale = scale;
        }
        self.scale = scale;
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.scale = self.previous_scale;
        } else {
            self.previous_scale = self.scale;
            self.scale = 0.0;
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.duration_secs, Some(d) if self.elapsed_secs >= d)
    }
}
