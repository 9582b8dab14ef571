//! Built-in platform catalog.

use overwatch_core::enums::{PlatformCategory, SensorKind, WeaponKind};
use overwatch_core::error::ContentError;
use overwatch_core::platform::*;

/// The stock platforms used by the shipped scenarios.
pub fn builtin_catalog() -> Result<PlatformCatalog, ContentError> {
    let mut catalog = PlatformCatalog::new();
    for def in [
        rq4_global_hawk(),
        b2_spirit(
            "B2_SPIRIT_JDAM",
            "B-2 Spirit (JDAM)",
            "B2-J",
            WeaponSpec {
                kind: WeaponKind::CruiseMissile,
                range: 28_000.0,
                damage: 150.0,
                reload_time: 3.0,
                ammo_capacity: 16,
                missile_speed: 250.0,
                standoff_range: Some(20_000.0),
            },
        ),
        b2_spirit(
            "B2_SPIRIT_JASSM",
            "B-2 Spirit (JASSM-ER)",
            "B2-M",
            WeaponSpec {
                kind: WeaponKind::CruiseMissile,
                range: 925_000.0,
                damage: 120.0,
                reload_time: 8.0,
                ammo_capacity: 16,
                missile_speed: 250.0,
                standoff_range: Some(500_000.0),
            },
        ),
        airbase(),
        sam(
            "S300_PMU2",
            "S-300PMU2 Battery",
            "S300",
            150.0,
            (200_000.0, 90.0, 6.0),
            (150_000.0, 100.0, 5.0, 2_000.0),
        ),
        sam(
            "MERSAD_SAM",
            "Mersad SAM Battery",
            "MRSD",
            80.0,
            (100_000.0, 60.0, 12.0),
            (50_000.0, 60.0, 10.0, 900.0),
        ),
        sam(
            "TOR_M1",
            "Tor-M1 SAM",
            "TOR",
            60.0,
            (25_000.0, 360.0, 0.0),
            (12_000.0, 40.0, 3.0, 850.0),
        ),
        surveillance_radar(),
        ground_target("COMMAND_POST", "Command Post", "CP", 150.0),
    ] {
        catalog.register(def)?;
    }
    Ok(catalog)
}

fn bare(id: &str, name: &str, label: &str, category: PlatformCategory, health: f64) -> PlatformDef {
    PlatformDef {
        id: id.to_string(),
        name: name.to_string(),
        label: label.to_string(),
        category,
        max_health: health,
        rcs: None,
        movement: None,
        sensor: None,
        weapon: None,
        fuel: None,
        base: None,
    }
}

// --- Blue air ---

fn rq4_global_hawk() -> PlatformDef {
    PlatformDef {
        rcs: Some(1.0),
        movement: Some(MovementSpec {
            max_speed: 175.0,
            cruise_speed: 160.0,
            acceleration: 3.0,
        }),
        sensor: Some(SensorSpec {
            kind: SensorKind::Radar,
            range: 200_000.0,
            field_of_view: 120.0,
            rotation_speed: 0.0,
        }),
        fuel: Some(FuelSpec {
            capacity: 9_000.0,
            burn_rate_cruise: 0.08,
            burn_rate_max: 0.15,
            bingo_percent: 0.15,
        }),
        ..bare("RQ4_GLOBAL_HAWK", "RQ-4B Global Hawk", "GHWK", PlatformCategory::Air, 40.0)
    }
}

/// Both B-2 loadouts share the airframe.
fn b2_spirit(id: &str, name: &str, label: &str, weapon: WeaponSpec) -> PlatformDef {
    PlatformDef {
        rcs: Some(0.1),
        movement: Some(MovementSpec {
            max_speed: 326.0,
            cruise_speed: 291.0,
            acceleration: 5.0,
        }),
        sensor: Some(SensorSpec {
            kind: SensorKind::Radar,
            range: 80_000.0,
            field_of_view: 120.0,
            rotation_speed: 0.0,
        }),
        weapon: Some(weapon),
        fuel: Some(FuelSpec {
            capacity: 75_000.0,
            burn_rate_cruise: 2.0,
            burn_rate_max: 3.5,
            bingo_percent: 0.2,
        }),
        ..bare(id, name, label, PlatformCategory::Air, 80.0)
    }
}

// --- Bases ---

fn airbase() -> PlatformDef {
    PlatformDef {
        base: Some(BaseSpec {
            capacity: 12,
            launch_interval: 15.0,
            recovery_interval: 20.0,
        }),
        ..bare("AIRBASE", "Outpost Base", "BASE", PlatformCategory::Ground, 500.0)
    }
}

// --- Red ground ---

/// Unlimited-magazine SAM battery. `radar` is (range, fov, rotation),
/// `missile` is (range, damage, reload, speed).
fn sam(
    id: &str,
    name: &str,
    label: &str,
    health: f64,
    radar: (f64, f64, f64),
    missile: (f64, f64, f64, f64),
) -> PlatformDef {
    let (range, field_of_view, rotation_speed) = radar;
    let (weapon_range, damage, reload_time, missile_speed) = missile;
    PlatformDef {
        sensor: Some(SensorSpec {
            kind: SensorKind::Radar,
            range,
            field_of_view,
            rotation_speed,
        }),
        weapon: Some(WeaponSpec {
            kind: WeaponKind::Missile,
            range: weapon_range,
            damage,
            reload_time,
            ammo_capacity: -1,
            missile_speed,
            standoff_range: None,
        }),
        ..bare(id, name, label, PlatformCategory::Ground, health)
    }
}

fn surveillance_radar() -> PlatformDef {
    PlatformDef {
        sensor: Some(SensorSpec {
            kind: SensorKind::Radar,
            range: 400_000.0,
            field_of_view: 360.0,
            rotation_speed: 0.0,
        }),
        ..bare("SURVEILLANCE_RADAR", "Surveillance Radar", "SRDR", PlatformCategory::Ground, 80.0)
    }
}

fn ground_target(id: &str, name: &str, label: &str, health: f64) -> PlatformDef {
    bare(id, name, label, PlatformCategory::Ground, health)
}
