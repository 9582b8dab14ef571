//! Game state snapshot and the picture-level records it carries.

use serde::{Deserialize, Serialize};

use crate::components::{AmmoState, FuelState, Sensor};
use crate::enums::*;
use crate::events::SimEvent;
use crate::task::Task;
use crate::types::{ContactId, EntityId, GeoPosition, MissileId, SimClock, TaskId};

/// A fused track on the common operating picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub entity_id: EntityId,
    pub position: GeoPosition,
    pub platform_id: String,
    pub faction: Faction,
    /// False once no friendly sensor sees it.
    pub is_live: bool,
    pub first_detected: f64,
    pub last_seen: f64,
}

/// A missile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Missile {
    pub id: MissileId,
    pub position: GeoPosition,
    pub heading: f64,
    pub speed: f64,
    pub target_entity: EntityId,
    /// Contact followed by lattice-networked guidance.
    pub target_contact: Option<ContactId>,
    pub launched_by: EntityId,
    pub faction: Faction,
    pub guidance: GuidanceType,
    pub damage: f64,
    pub last_known_target_pos: GeoPosition,
    /// Set once an emission-homing target stops radiating. Never cleared.
    #[serde(default)]
    pub emission_lost: bool,
}

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimClock,
    pub scenario: Option<String>,
    pub result: MissionResult,
    pub entities: Vec<EntityView>,
    pub contacts: Vec<Contact>,
    pub missiles: Vec<Missile>,
    pub tasks: Vec<Task>,
    pub launch_queues: Vec<LaunchQueueView>,
    pub objectives: Vec<ObjectiveView>,
    pub events: Vec<SimEvent>,
}

/// One entity as the display sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub platform_id: String,
    pub faction: Faction,
    pub tag: Option<String>,
    pub position: GeoPosition,
    pub heading: f64,
    pub speed: f64,
    pub destination: Option<GeoPosition>,
    pub state: EntityState,
    pub health: f64,
    pub max_health: f64,
    pub flight_state: FlightState,
    pub runway_phase: Option<RunwayPhase>,
    pub home_base: Option<EntityId>,
    pub radar_mode: RadarMode,
    pub sensor: Option<Sensor>,
    pub is_detected: bool,
    pub fuel: Option<FuelState>,
    pub ammo: Option<AmmoState>,
    pub current_task: Option<TaskId>,
    pub task_queue: Vec<TaskId>,
    pub target: Option<EntityId>,
}

/// Launch queue indicator for a base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchQueueView {
    pub base_id: EntityId,
    pub queue_length: usize,
    /// Whole seconds until the next launch slot.
    pub countdown_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveView {
    pub label: String,
    pub entity_tag: String,
    pub complete: bool,
}
