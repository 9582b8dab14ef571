//! Events emitted by the simulation for the UI event feed.
//!
//! Events accumulate during a tick and are drained into the snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::{FlightState, GuidanceType, MissionResult};
use crate::types::{ContactId, EntityId, MissileId, TaskId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    // --- Picture ---
    ContactDetected { contact_id: ContactId, entity_id: EntityId },
    ContactLost { contact_id: ContactId, entity_id: EntityId },

    // --- Weapons ---
    MissileLaunched {
        missile_id: MissileId,
        launcher: EntityId,
        target: EntityId,
        guidance: GuidanceType,
    },
    MissileImpact { missile_id: MissileId, target: EntityId },
    /// Missile reached its aim point with nothing there to hit.
    MissileLost { missile_id: MissileId },
    /// One-way attack reached its target.
    SuicideStrike { attacker: EntityId, target: EntityId },
    EntityDestroyed { entity_id: EntityId },

    // --- Flight ops ---
    FlightStateChanged { entity_id: EntityId, state: FlightState },
    BingoFuel { entity_id: EntityId },
    FuelExhausted { entity_id: EntityId },

    // --- Tasks ---
    TaskActivated { task_id: TaskId },
    TaskCompleted { task_id: TaskId },
    TaskFailed { task_id: TaskId },

    MissionEnded { result: MissionResult },
}
