//! Snapshot system: reads the world and side tables into a complete
//! GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use overwatch_core::components::*;
use overwatch_core::enums::MissionResult;
use overwatch_core::events::SimEvent;
use overwatch_core::scenario::ScenarioDef;
use overwatch_core::state::*;
use overwatch_core::task::TaskBoard;
use overwatch_core::types::SimClock;

use crate::index::EntityIndex;
use crate::systems::contacts::ContactPicture;
use crate::systems::missiles::MissileSet;
use crate::systems::mission::objective_complete;
use crate::systems::runway_ops::{launch_queue_info, RunwayOps};
use crate::unit::{read_all, Unit};

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    index: &EntityIndex,
    clock: &SimClock,
    scenario: Option<&ScenarioDef>,
    result: MissionResult,
    contacts: &ContactPicture,
    missiles: &MissileSet,
    board: &TaskBoard,
    runway_ops: &RunwayOps,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    let units = read_all(world, index);

    GameStateSnapshot {
        time: *clock,
        scenario: scenario.map(|s| s.id.clone()),
        result,
        entities: units
            .iter()
            .map(|u| build_entity(world, runway_ops, u))
            .collect(),
        contacts: contacts.iter().cloned().collect(),
        missiles: missiles.iter().cloned().collect(),
        tasks: board.iter().cloned().collect(),
        launch_queues: build_launch_queues(world, &units, clock.elapsed_secs),
        objectives: scenario
            .map(|s| {
                s.objectives
                    .iter()
                    .map(|o| ObjectiveView {
                        label: o.label.clone(),
                        entity_tag: o.entity_tag.clone(),
                        complete: objective_complete(&units, &o.entity_tag),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        events,
    }
}

fn build_entity(world: &World, runway_ops: &RunwayOps, unit: &Unit) -> EntityView {
    let max_health = world
        .get::<&Vitals>(unit.handle)
        .map(|v| v.max_health)
        .unwrap_or(unit.health);
    let fuel = world.get::<&FuelState>(unit.handle).ok().map(|f| *f);
    let task_queue = world
        .get::<&Orders>(unit.handle)
        .map(|o| o.queue.iter().cloned().collect())
        .unwrap_or_default();

    EntityView {
        id: unit.id.clone(),
        platform_id: unit.platform_id.clone(),
        faction: unit.faction,
        tag: unit.tag.clone(),
        position: unit.position,
        heading: unit.heading,
        speed: unit.speed,
        destination: unit.destination,
        state: unit.state,
        health: unit.health,
        max_health,
        flight_state: unit.flight,
        runway_phase: runway_ops.phase(&unit.id),
        home_base: unit.home_base.clone(),
        radar_mode: unit.radar_mode,
        sensor: unit.sensor,
        is_detected: unit.is_detected,
        fuel,
        ammo: unit.ammo,
        current_task: unit.current_task.clone(),
        task_queue,
        target: unit.target.clone(),
    }
}

/// One entry per base with aircraft waiting to launch.
fn build_launch_queues(world: &World, units: &[Unit], now: f64) -> Vec<LaunchQueueView> {
    units
        .iter()
        .filter_map(|u| {
            let spec = u.base?;
            let state = world.get::<&BaseState>(u.handle).ok()?;
            let (queue_length, countdown_secs) = launch_queue_info(&state, &spec, now)?;
            Some(LaunchQueueView {
                base_id: u.id.clone(),
                queue_length,
                countdown_secs,
            })
        })
        .collect()
}
