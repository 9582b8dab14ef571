//! Platform capability table.
//!
//! A platform definition is static data. When an entity is spawned its
//! optional capabilities (movement, sensor, weapon, fuel, base) become
//! components on the entity, and systems dispatch on their presence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{PlatformCategory, SensorKind, WeaponKind};
use crate::error::ContentError;

/// Kinematic limits (m/s, m/s²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSpec {
    pub max_speed: f64,
    pub cruise_speed: f64,
    pub acceleration: f64,
}

/// Sensor definition. `rotation_speed` is degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    pub kind: SensorKind,
    pub range: f64,
    pub field_of_view: f64,
    #[serde(default)]
    pub rotation_speed: f64,
}

/// Weapon definition. Negative `ammo_capacity` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub range: f64,
    pub damage: f64,
    pub reload_time: f64,
    pub ammo_capacity: i32,
    #[serde(default)]
    pub missile_speed: f64,
    /// Preferred launch distance for cruise missiles.
    #[serde(default)]
    pub standoff_range: Option<f64>,
}

/// Fuel definition. Burn rates are units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelSpec {
    pub capacity: f64,
    pub burn_rate_cruise: f64,
    pub burn_rate_max: f64,
    pub bingo_percent: f64,
}

/// Airbase definition. Intervals are seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseSpec {
    pub capacity: u32,
    pub launch_interval: f64,
    pub recovery_interval: f64,
}

/// A platform type in the capability table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub id: String,
    pub name: String,
    /// Short display label, also the prefix of generated entity ids.
    #[serde(default)]
    pub label: String,
    pub category: PlatformCategory,
    pub max_health: f64,
    #[serde(default)]
    pub rcs: Option<f64>,
    #[serde(default)]
    pub movement: Option<MovementSpec>,
    #[serde(default)]
    pub sensor: Option<SensorSpec>,
    #[serde(default)]
    pub weapon: Option<WeaponSpec>,
    #[serde(default)]
    pub fuel: Option<FuelSpec>,
    #[serde(default)]
    pub base: Option<BaseSpec>,
}

impl PlatformDef {
    /// Radar cross-section multiplier, 1.0 when unspecified.
    pub fn rcs_or_default(&self) -> f64 {
        self.rcs.unwrap_or(1.0)
    }

    /// Prefix for generated entity ids, e.g. `ghwk` for `ghwk-3`.
    pub fn id_prefix(&self) -> String {
        if self.label.is_empty() {
            self.id.to_lowercase()
        } else {
            self.label.to_lowercase()
        }
    }
}

/// Lookup table of platform definitions keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformCatalog {
    platforms: BTreeMap<String, PlatformDef>,
}

impl PlatformCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. Ids must be unique.
    pub fn register(&mut self, def: PlatformDef) -> Result<(), ContentError> {
        if self.platforms.contains_key(&def.id) {
            return Err(ContentError::DuplicatePlatform(def.id));
        }
        self.platforms.insert(def.id.clone(), def);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&PlatformDef, ContentError> {
        self.platforms
            .get(id)
            .ok_or_else(|| ContentError::UnknownPlatform(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformDef> {
        self.platforms.values()
    }

    /// Parse a JSON array of platform definitions.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let defs: Vec<PlatformDef> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for def in defs {
            catalog.register(def)?;
        }
        Ok(catalog)
    }
}
