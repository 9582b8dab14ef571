//! Scenario definitions: hardcoded missions shipped with the engine.

use overwatch_core::enums::{DefeatCondition, Faction, ObjectiveKind};
use overwatch_core::error::ContentError;
use overwatch_core::runway::{RunwayDef, RunwayEnd, RunwayTable};
use overwatch_core::scenario::{EntitySpawn, ObjectiveDef, ScenarioDef};
use overwatch_core::types::GeoPosition;

/// Ids accepted by [`builtin`].
pub const BUILTIN_SCENARIOS: &[&str] = &["opening-strike", "archipelago-sweep"];

/// Look up a shipped scenario by id.
pub fn builtin(id: &str) -> Result<ScenarioDef, ContentError> {
    match id {
        "opening-strike" => Ok(opening_strike()),
        "archipelago-sweep" => Ok(archipelago_sweep()),
        other => Err(ContentError::UnknownScenario(other.to_string())),
    }
}

fn destroy(tag: &str, label: &str) -> ObjectiveDef {
    ObjectiveDef {
        entity_tag: tag.to_string(),
        label: label.to_string(),
        kind: ObjectiveKind::Destroy,
    }
}

/// Al Dhafra 13R/31L, departing from the 13R end.
pub fn al_dhafra_13r() -> RunwayDef {
    RunwayDef {
        name: "13R/31L".to_string(),
        threshold_a: GeoPosition::new(24.24083, 54.53667),
        threshold_b: GeoPosition::new(24.22100, 54.56550),
        preferred_departure_end: RunwayEnd::A,
    }
}

/// Opening Strike: one ISR drone and two B-2 loadouts out of Al Dhafra
/// against a coastal IADS near Bandar Abbas. No time limit.
fn opening_strike() -> ScenarioDef {
    let base = GeoPosition::new(24.248, 54.547);
    let mut runways = RunwayTable::new();
    runways.insert("outpost-base", al_dhafra_13r());

    ScenarioDef {
        id: "opening-strike".to_string(),
        name: "Opening Strike".to_string(),
        description: "Blind and dismantle the coastal air defense network, then destroy \
                      the command post."
            .to_string(),
        duration: None,
        entities: vec![
            EntitySpawn::new("AIRBASE", Faction::Blue, base).with_id("outpost-base"),
            EntitySpawn::new("RQ4_GLOBAL_HAWK", Faction::Blue, base).parked_at("outpost-base"),
            EntitySpawn::new("B2_SPIRIT_JDAM", Faction::Blue, base).parked_at("outpost-base"),
            EntitySpawn::new("B2_SPIRIT_JASSM", Faction::Blue, base).parked_at("outpost-base"),
            EntitySpawn::new("SURVEILLANCE_RADAR", Faction::Red, GeoPosition::new(26.7, 56.3))
                .with_tag("obj-surv-radar"),
            EntitySpawn::new("MERSAD_SAM", Faction::Red, GeoPosition::new(26.9, 56.2))
                .with_tag("obj-mersad"),
            EntitySpawn::new("S300_PMU2", Faction::Red, GeoPosition::new(27.1, 56.3))
                .with_tag("obj-s300"),
            EntitySpawn::new("TOR_M1", Faction::Red, GeoPosition::new(27.2, 56.3)),
            EntitySpawn::new("COMMAND_POST", Faction::Red, GeoPosition::new(27.2, 56.35))
                .with_tag("obj-command-post"),
        ],
        objectives: vec![
            destroy("obj-surv-radar", "Surveillance Radar"),
            destroy("obj-s300", "S-300PMU2"),
            destroy("obj-mersad", "Mersad SAM"),
            destroy("obj-command-post", "Command Post"),
        ],
        defeat_condition: DefeatCondition::AllBlueDead,
        runways,
    }
}

/// Archipelago Sweep: a larger SEAD campaign across the Paracels from an
/// austere strip with no surveyed runway.
fn archipelago_sweep() -> ScenarioDef {
    let base = GeoPosition::new(15.85, 111.60);
    let mut entities = vec![EntitySpawn::new("AIRBASE", Faction::Blue, base).with_id("paracel-base")];
    for (platform, count) in [
        ("RQ4_GLOBAL_HAWK", 4),
        ("B2_SPIRIT_JASSM", 2),
        ("B2_SPIRIT_JDAM", 2),
    ] {
        for _ in 0..count {
            entities.push(EntitySpawn::new(platform, Faction::Blue, base).parked_at("paracel-base"));
        }
    }
    entities.extend([
        EntitySpawn::new("SURVEILLANCE_RADAR", Faction::Red, GeoPosition::new(16.84, 112.34))
            .with_tag("obj-surv-radar"),
        EntitySpawn::new("S300_PMU2", Faction::Red, GeoPosition::new(16.83, 112.33))
            .with_tag("obj-s300-alpha"),
        EntitySpawn::new("MERSAD_SAM", Faction::Red, GeoPosition::new(16.92, 112.33))
            .with_tag("obj-mersad-bravo"),
        EntitySpawn::new("MERSAD_SAM", Faction::Red, GeoPosition::new(16.45, 112.73))
            .with_tag("obj-mersad-charlie"),
        EntitySpawn::new("TOR_M1", Faction::Red, GeoPosition::new(16.67, 112.73)),
        EntitySpawn::new("TOR_M1", Faction::Red, GeoPosition::new(15.78, 111.21)),
        EntitySpawn::new("COMMAND_POST", Faction::Red, GeoPosition::new(16.835, 112.345))
            .with_tag("obj-command-post"),
    ]);

    ScenarioDef {
        id: "archipelago-sweep".to_string(),
        name: "Archipelago Sweep".to_string(),
        description: "Suppress the island air defense network and destroy the command post."
            .to_string(),
        duration: None,
        entities,
        objectives: vec![
            destroy("obj-surv-radar", "Surveillance Radar"),
            destroy("obj-s300-alpha", "S-300PMU2"),
            destroy("obj-mersad-bravo", "Mersad SAM (Rocky)"),
            destroy("obj-mersad-charlie", "Mersad SAM (Duncan)"),
            destroy("obj-command-post", "Command Post"),
        ],
        defeat_condition: DefeatCondition::AllBlueDead,
        runways: RunwayTable::new(),
    }
}
