//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Side an entity fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Faction {
    Blue,
    Red,
}

impl Faction {
    pub fn opponent(self) -> Faction {
        match self {
            Faction::Blue => Faction::Red,
            Faction::Red => Faction::Blue,
        }
    }
}

/// Broad platform category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformCategory {
    Air,
    Ground,
}

/// Activity state of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityState {
    #[default]
    Idle,
    Transit,
    Attacking,
    /// Terminal.
    Destroyed,
}

/// Flight-ops lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightState {
    /// Ground units, bases.
    #[default]
    Grounded,
    Parked,
    Launching,
    Airborne,
    Recovering,
}

/// Runway sub-phase of a launching or recovering aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunwayPhase {
    TakeoffRoll,
    Rotate,
    DepartureClimb,
    ApproachAlign,
    FinalApproach,
    LandingRoll,
}

impl RunwayPhase {
    /// Phases that hold the runway surface.
    pub fn occupies_runway(self) -> bool {
        matches!(
            self,
            RunwayPhase::TakeoffRoll | RunwayPhase::Rotate | RunwayPhase::LandingRoll
        )
    }

    /// Phases in which flight-ops places the aircraft directly.
    pub fn drives_position(self) -> bool {
        !matches!(self, RunwayPhase::ApproachAlign)
    }
}

/// Emission state of an entity's radar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RadarMode {
    #[default]
    Active,
    Passive,
}

/// Sensor technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorKind {
    Radar,
    Camera,
}

/// Weapon archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponKind {
    /// One-way attack drone; the carrier is the warhead.
    Suicide,
    /// Surface-to-air missile, auto-engaged.
    Missile,
    CruiseMissile,
    AntiRadiation,
}

/// How an in-flight missile resolves its aim point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuidanceType {
    /// Homes on the live target, else its last known position.
    FireForget,
    /// Follows the fused contact picture.
    LatticeNetworked,
    /// Homes while the target radiates.
    EmissionHoming,
}

impl WeaponKind {
    /// Guidance a missile of this weapon flies with, if the weapon launches one.
    pub fn launch_guidance(self) -> Option<GuidanceType> {
        match self {
            WeaponKind::Suicide => None,
            WeaponKind::Missile => Some(GuidanceType::FireForget),
            WeaponKind::CruiseMissile => Some(GuidanceType::LatticeNetworked),
            WeaponKind::AntiRadiation => Some(GuidanceType::EmissionHoming),
        }
    }
}

/// Rules of engagement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Roe {
    #[default]
    WeaponsHold,
    WeaponsTight,
    WeaponsFree,
}

/// Group geometry for multi-entity tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormationType {
    #[default]
    None,
    Line,
    Column,
    Wedge,
}

/// Task lifecycle. Only moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Queued,
    Active,
    Complete,
    Failed,
}

impl TaskStatus {
    fn rank(self) -> u8 {
        match self {
            TaskStatus::Queued => 0,
            TaskStatus::Active => 1,
            TaskStatus::Complete | TaskStatus::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Complete | TaskStatus::Failed)
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_become(self, next: TaskStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

/// Mission objective kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveKind {
    Destroy,
}

/// How the player can lose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefeatCondition {
    #[default]
    AllBlueDead,
    TimeExpired,
    Both,
}

/// Outcome of the mission so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionResult {
    #[default]
    Pending,
    Victory,
    Defeat,
}
