//! ECS components for simulation entities.
//!
//! These are plain data structs used as hecs components. Every entity has
//! the mandatory set (identity, kinematics, vitals, signature, detection,
//! flight, orders, engagement). Capabilities are optional components; a
//! system acts on an entity only when the component it needs is present.
//! The static capability components are the platform specs themselves
//! (`MovementSpec`, `WeaponSpec`, `FuelSpec`, `BaseSpec`).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::enums::{EntityState, Faction, FlightState, RadarMode, SensorKind};
use crate::types::{EntityId, GeoPosition, TaskId, Velocity};

// --- Mandatory ---

/// Who this entity is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: EntityId,
    pub platform_id: String,
    pub faction: Faction,
    /// Objective tag, if this entity is a mission objective.
    pub tag: Option<String>,
}

/// Where the entity is and where it is going.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: GeoPosition,
    pub heading: f64,
    pub velocity: Velocity,
    /// Zero for entities that cannot move.
    pub max_speed: f64,
    pub destination: Option<GeoPosition>,
}

impl Kinematics {
    pub fn at(position: GeoPosition, heading: f64) -> Self {
        Self {
            position,
            heading,
            velocity: Velocity { heading, speed: 0.0 },
            max_speed: 0.0,
            destination: None,
        }
    }

    /// Point at `destination` and fly there at `speed`.
    pub fn steer_to(&mut self, destination: GeoPosition, speed: f64) {
        let heading = self.position.bearing_to(&destination);
        self.destination = Some(destination);
        self.heading = heading;
        self.velocity = Velocity { heading, speed };
    }
}

/// Health and activity state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub state: EntityState,
    pub health: f64,
    pub max_health: f64,
}

impl Vitals {
    pub fn is_destroyed(&self) -> bool {
        self.state == EntityState::Destroyed
    }

    /// Subtract damage; at zero health the entity is destroyed.
    pub fn apply_damage(&mut self, damage: f64) {
        self.health = (self.health - damage).max(0.0);
        if self.health <= 0.0 {
            self.state = EntityState::Destroyed;
        }
    }

    pub fn destroy(&mut self) {
        self.health = 0.0;
        self.state = EntityState::Destroyed;
    }
}

/// Emission state and radar cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub radar_mode: RadarMode,
    pub rcs: f64,
}

/// Result of this tick's detection pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub is_detected: bool,
    /// Observers that currently see this entity.
    pub detected_by: Vec<EntityId>,
}

/// Flight-ops state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub state: FlightState,
    pub home_base: Option<EntityId>,
}

impl Flight {
    /// In the air and free to manoeuvre.
    pub fn is_airborne(&self) -> bool {
        matches!(self.state, FlightState::Airborne | FlightState::Launching)
    }
}

/// Current task and queued task ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Orders {
    pub current: Option<TaskId>,
    pub queue: VecDeque<TaskId>,
}

impl Orders {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Current task first, then the queue in order.
    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.current.iter().chain(self.queue.iter())
    }
}

/// Weapon target and reload timer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub target: Option<EntityId>,
    /// Game time of the last shot; `None` if never fired.
    pub last_fire_time: Option<f64>,
}

// --- Capabilities ---

/// Mounted sensor. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub kind: SensorKind,
    pub range: f64,
    pub field_of_view: f64,
    /// Current sweep offset from the entity heading.
    pub current_angle: f64,
    /// Degrees per second.
    pub rotation_speed: f64,
}

/// Fuel remaining.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelState {
    pub remaining: f64,
    pub capacity: f64,
    pub is_bingo: bool,
}

/// Finite magazine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmmoState {
    pub remaining: i32,
    pub capacity: i32,
}

/// Airbase bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseState {
    /// Aircraft parked here, rebuilt every tick.
    pub parked: Vec<EntityId>,
    pub launch_queue: VecDeque<EntityId>,
    pub last_launch_time: Option<f64>,
    pub last_recovery_time: Option<f64>,
}

impl BaseState {
    /// Seconds since the last launch, infinite if nothing has launched.
    pub fn since_last_launch(&self, now: f64) -> f64 {
        self.last_launch_time.map_or(f64::INFINITY, |t| now - t)
    }
}
