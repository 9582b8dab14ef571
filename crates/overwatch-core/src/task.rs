//! Mission task model and the task board.
//!
//! A task is a tagged variant describing what a group of entities should
//! do, plus shared lifecycle fields. Status only moves forward:
//! QUEUED → ACTIVE → COMPLETE | FAILED.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::{FlightState, FormationType, RadarMode, Roe, TaskStatus};
use crate::types::{ContactId, EntityId, GeoPosition, TaskId};

/// Circular area on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaDef {
    pub center: GeoPosition,
    pub radius: f64,
}

impl AreaDef {
    pub fn contains(&self, pos: &GeoPosition, multiplier: f64) -> bool {
        self.center.distance_to(pos) <= self.radius * multiplier
    }
}

/// Behaviour modifiers shared by every task variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskParams {
    pub roe: Roe,
    pub formation: FormationType,
    /// Formation spacing in meters.
    pub spacing: f64,
    /// Fraction of max speed to fly at.
    pub speed_fraction: f64,
    pub radar_mode: RadarMode,
}

impl Default for TaskParams {
    fn default() -> Self {
        Self {
            roe: Roe::WeaponsHold,
            formation: FormationType::None,
            spacing: 0.0,
            speed_fraction: 0.8,
            radar_mode: RadarMode::Active,
        }
    }
}

/// When an ACTIVE task is considered done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionCondition {
    /// Every living assignee reached its goal (MOVE_TO) or went idle.
    Arrival,
    /// Every living assignee is in the given flight state.
    FlightState { target: FlightState },
    /// Seconds since activation.
    Duration { seconds: f64 },
    /// At least `count` live contacts on the picture.
    OnDetect {
        #[serde(default)]
        count: Option<u32>,
    },
    /// Every living assignee is attacking or out of ammunition.
    AllEngaged,
    TargetDestroyed { entity_id: EntityId },
}

/// Variant-specific task payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    MoveTo {
        destination: GeoPosition,
    },
    ReconArea {
        area: AreaDef,
    },
    Patrol {
        area: AreaDef,
    },
    StrikeOnDetect {
        #[serde(default)]
        watch_area: Option<AreaDef>,
    },
    StrikeTarget {
        contact_id: ContactId,
    },
    Takeoff {
        base_id: EntityId,
    },
    Land {
        base_id: EntityId,
    },
    Rtb {
        #[serde(default)]
        base_id: Option<EntityId>,
    },
    FireCruiseMissile {
        target_contact_id: ContactId,
        target_position: GeoPosition,
        standoff_position: GeoPosition,
    },
    FireArm {
        target_entity_id: EntityId,
        target_position: GeoPosition,
        approach_position: GeoPosition,
    },
    Rearm {
        base_id: EntityId,
    },
    Orbit {
        center: GeoPosition,
        radius: f64,
    },
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::MoveTo { .. } => "MOVE_TO",
            TaskKind::ReconArea { .. } => "RECON_AREA",
            TaskKind::Patrol { .. } => "PATROL",
            TaskKind::StrikeOnDetect { .. } => "STRIKE_ON_DETECT",
            TaskKind::StrikeTarget { .. } => "STRIKE_TARGET",
            TaskKind::Takeoff { .. } => "TAKEOFF",
            TaskKind::Land { .. } => "LAND",
            TaskKind::Rtb { .. } => "RTB",
            TaskKind::FireCruiseMissile { .. } => "FIRE_CRUISE_MISSILE",
            TaskKind::FireArm { .. } => "FIRE_ARM",
            TaskKind::Rearm { .. } => "REARM",
            TaskKind::Orbit { .. } => "ORBIT",
        }
    }

    pub fn is_recovery(&self) -> bool {
        matches!(self, TaskKind::Rtb { .. } | TaskKind::Land { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub assigned_ids: Vec<EntityId>,
    #[serde(default)]
    pub status: TaskStatus,
    pub completion: CompletionCondition,
    #[serde(default)]
    pub params: TaskParams,
    #[serde(default)]
    pub created_at: f64,
    #[serde(default)]
    pub activated_at: Option<f64>,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl Task {
    /// A new QUEUED task.
    pub fn new(
        id: impl Into<String>,
        assigned_ids: Vec<EntityId>,
        kind: TaskKind,
        completion: CompletionCondition,
    ) -> Self {
        Self {
            id: TaskId::new(id),
            assigned_ids,
            status: TaskStatus::Queued,
            completion,
            params: TaskParams::default(),
            created_at: 0.0,
            activated_at: None,
            kind,
        }
    }

    pub fn with_params(mut self, params: TaskParams) -> Self {
        self.params = params;
        self
    }
}

/// Ordered collection of every task in the mission, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. A task whose id is already on the board replaces nothing
    /// and returns `false`.
    pub fn insert(&mut self, task: Task) -> bool {
        if self.index.contains_key(&task.id) {
            return false;
        }
        self.index.insert(task.id.clone(), self.tasks.len());
        self.tasks.push(task);
        true
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    pub fn status(&self, id: &TaskId) -> Option<TaskStatus> {
        self.get(id).map(|t| t.status)
    }

    /// Move a task forward in its lifecycle. Regressions and changes to a
    /// terminal task are refused.
    pub fn transition(&mut self, id: &TaskId, next: TaskStatus, now: f64) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        let task = &mut self.tasks[i];
        if !task.status.can_become(next) {
            return false;
        }
        task.status = next;
        if next == TaskStatus::Active && task.activated_at.is_none() {
            task.activated_at = Some(now);
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
