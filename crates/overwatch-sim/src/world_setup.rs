//! Entity spawn factories for setting up the simulation world.
//!
//! A platform definition becomes a component bundle: the mandatory set
//! plus one component per capability the platform has.

use hecs::{Entity, EntityBuilder, World};

use overwatch_core::components::*;
use overwatch_core::enums::*;
use overwatch_core::error::ContentError;
use overwatch_core::platform::PlatformCatalog;
use overwatch_core::scenario::{EntitySpawn, ScenarioDef};
use overwatch_core::types::{EntityId, Velocity};

use crate::index::EntityIndex;

/// Generates `label-N` ids for spawns without an explicit id.
#[derive(Debug, Default)]
pub struct IdSerial(u32);

impl IdSerial {
    fn next(&mut self, prefix: &str) -> EntityId {
        self.0 += 1;
        EntityId::new(format!("{prefix}-{}", self.0))
    }
}

/// Spawn every entity of a scenario, then fill in base parked lists.
pub fn setup_scenario(
    world: &mut World,
    index: &mut EntityIndex,
    catalog: &PlatformCatalog,
    scenario: &ScenarioDef,
) -> Result<(), ContentError> {
    let mut serial = IdSerial::default();
    for spawn in &scenario.entities {
        spawn_entity(world, index, catalog, spawn, &mut serial)?;
    }
    rebuild_parked_lists(world, index);
    log::info!(
        "scenario '{}' set up with {} entities",
        scenario.id,
        index.len()
    );
    Ok(())
}

/// Spawn one entity from its platform definition.
pub fn spawn_entity(
    world: &mut World,
    index: &mut EntityIndex,
    catalog: &PlatformCatalog,
    spawn: &EntitySpawn,
    serial: &mut IdSerial,
) -> Result<Entity, ContentError> {
    let def = catalog.get(&spawn.platform_id)?;
    let id = match &spawn.id {
        Some(id) => id.clone(),
        None => serial.next(&def.id_prefix()),
    };
    if index.contains(&id) {
        return Err(ContentError::DuplicateEntity(id.0));
    }

    let default_flight = match def.category {
        PlatformCategory::Air => FlightState::Airborne,
        PlatformCategory::Ground => FlightState::Grounded,
    };

    let mut builder = EntityBuilder::new();
    builder.add(Identity {
        id: id.clone(),
        platform_id: def.id.clone(),
        faction: spawn.faction,
        tag: spawn.tag.clone(),
    });
    builder.add(Kinematics {
        position: spawn.position,
        heading: spawn.heading,
        velocity: Velocity {
            heading: spawn.heading,
            speed: 0.0,
        },
        max_speed: def.movement.map_or(0.0, |m| m.max_speed),
        destination: None,
    });
    builder.add(Vitals {
        state: EntityState::Idle,
        health: def.max_health,
        max_health: def.max_health,
    });
    builder.add(Signature {
        radar_mode: RadarMode::Active,
        rcs: def.rcs_or_default(),
    });
    builder.add(Detection::default());
    builder.add(Flight {
        state: spawn.flight_state.unwrap_or(default_flight),
        home_base: spawn.home_base_id.clone(),
    });
    builder.add(Orders::default());
    builder.add(Engagement::default());

    // --- Capabilities ---
    if let Some(movement) = def.movement {
        builder.add(movement);
    }
    if let Some(sensor) = def.sensor {
        builder.add(Sensor {
            kind: sensor.kind,
            range: sensor.range,
            field_of_view: sensor.field_of_view,
            current_angle: 0.0,
            rotation_speed: sensor.rotation_speed,
        });
    }
    if let Some(weapon) = def.weapon {
        builder.add(weapon);
        if weapon.ammo_capacity > 0 {
            builder.add(AmmoState {
                remaining: weapon.ammo_capacity,
                capacity: weapon.ammo_capacity,
            });
        }
    }
    if let Some(fuel) = def.fuel {
        builder.add(fuel);
        builder.add(FuelState {
            remaining: fuel.capacity,
            capacity: fuel.capacity,
            is_bingo: false,
        });
    }
    if let Some(base) = def.base {
        builder.add(base);
        builder.add(BaseState::default());
    }

    let handle = world.spawn(builder.build());
    index.insert(id, handle);
    Ok(handle)
}

/// Recompute every base's parked list from its aircraft's home base and
/// flight state.
pub fn rebuild_parked_lists(world: &mut World, index: &EntityIndex) {
    let mut parked: Vec<(EntityId, EntityId)> = Vec::new();
    for handle in index.handles() {
        if let Ok(mut q) = world.query_one::<(&Identity, &Flight, &Vitals)>(handle) {
            if let Some((ident, flight, vitals)) = q.get() {
                if flight.state == FlightState::Parked && !vitals.is_destroyed() {
                    if let Some(base) = &flight.home_base {
                        parked.push((base.clone(), ident.id.clone()));
                    }
                }
            }
        }
    }

    for (_entity, (ident, base)) in world.query_mut::<(&Identity, &mut BaseState)>() {
        base.parked = parked
            .iter()
            .filter(|(home, _)| *home == ident.id)
            .map(|(_, aircraft)| aircraft.clone())
            .collect();
    }
}
