//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::task::Task;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Put a task on the board and queue it for each assignee.
    AssignTask { task: Task },
    /// Set game seconds per real second (0 pauses).
    SetTimeScale { scale: f64 },
    TogglePause,
}
