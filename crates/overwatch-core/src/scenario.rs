//! Scenario definition types. Static data, no runtime state.

use serde::{Deserialize, Serialize};

use crate::enums::{DefeatCondition, Faction, FlightState, ObjectiveKind};
use crate::error::ContentError;
use crate::runway::RunwayTable;
use crate::types::{EntityId, GeoPosition};

/// One entity placed at scenario start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawn {
    pub platform_id: String,
    pub faction: Faction,
    pub position: GeoPosition,
    #[serde(default)]
    pub heading: f64,
    /// Generated from the platform id when absent.
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub home_base_id: Option<EntityId>,
    /// Overrides the category default (e.g. PARKED aircraft at a base).
    #[serde(default)]
    pub flight_state: Option<FlightState>,
}

impl EntitySpawn {
    pub fn new(platform_id: &str, faction: Faction, position: GeoPosition) -> Self {
        Self {
            platform_id: platform_id.to_string(),
            faction,
            position,
            heading: 0.0,
            id: None,
            tag: None,
            home_base_id: None,
            flight_state: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(EntityId::new(id));
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// Start parked at `base_id`.
    pub fn parked_at(mut self, base_id: &str) -> Self {
        self.home_base_id = Some(EntityId::new(base_id));
        self.flight_state = Some(FlightState::Parked);
        self
    }

    pub fn heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }
}

/// A mission objective: destroy the entity carrying `entity_tag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveDef {
    pub entity_tag: String,
    pub label: String,
    pub kind: ObjectiveKind,
}

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Seconds; `None` for an open-ended mission.
    #[serde(default)]
    pub duration: Option<f64>,
    pub entities: Vec<EntitySpawn>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveDef>,
    #[serde(default)]
    pub defeat_condition: DefeatCondition,
    /// Runway geometry for this scenario's bases. Bases without an entry
    /// launch and recover without runway phases.
    #[serde(default)]
    pub runways: RunwayTable,
}

impl ScenarioDef {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }
}
