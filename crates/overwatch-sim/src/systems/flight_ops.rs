//! Flight-ops state machine: PARKED → LAUNCHING → AIRBORNE → RECOVERING → PARKED.
//!
//! Bases with runway geometry hand their aircraft to runway ops. Bases
//! without it use a simpler launch (accelerate in place) and recovery
//! (fly to the base and park within range).

use hecs::World;

use overwatch_core::components::{Flight, Kinematics, Vitals};
use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, FlightState};
use overwatch_core::events::SimEvent;
use overwatch_core::runway::RunwayTable;

use crate::index::EntityIndex;
use crate::systems::runway_ops::{self, RunwayOps};
use crate::unit::{read_all, update, Unit};
use crate::world_setup::rebuild_parked_lists;

/// Accelerate toward cruise; AIRBORNE at `LAUNCH_SPEED_FRACTION` of cruise.
fn fallback_launch(world: &mut World, unit: &Unit, dt: f64, events: &mut Vec<SimEvent>) {
    let Some(movement) = unit.movement else {
        return;
    };
    let speed = (unit.speed + movement.acceleration * dt).min(movement.cruise_speed);
    update::<Kinematics, _>(world, unit.handle, |k| k.velocity.speed = speed);

    if speed >= movement.cruise_speed * LAUNCH_SPEED_FRACTION {
        update::<Flight, _>(world, unit.handle, |f| f.state = FlightState::Airborne);
        update::<Vitals, _>(world, unit.handle, |v| v.state = EntityState::Idle);
        events.push(SimEvent::FlightStateChanged {
            entity_id: unit.id.clone(),
            state: FlightState::Airborne,
        });
    }
}

/// Slow down on the way in and park once close to the base.
fn fallback_recovery(
    world: &mut World,
    unit: &Unit,
    base: &Unit,
    now: f64,
    events: &mut Vec<SimEvent>,
) {
    let dist = unit.distance_to(&base.position);
    if dist < RECOVERY_PARK_DISTANCE_M {
        runway_ops::park(world, unit, base, now, events);
        return;
    }

    let cruise = unit.movement.map_or(30.0, |m| m.cruise_speed);
    let approach_speed = (dist / 1000.0 * cruise).max(RECOVERY_MIN_SPEED);
    update::<Kinematics, _>(world, unit.handle, |k| {
        k.velocity.speed = k.velocity.speed.min(approach_speed);
    });
}

pub fn run(
    world: &mut World,
    index: &EntityIndex,
    ops: &mut RunwayOps,
    runways: &RunwayTable,
    now: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    // Launch queues first, so a released aircraft starts rolling this tick.
    for unit in read_all(world, index) {
        if !unit.is_alive() {
            ops.clear(&unit.id);
        } else if unit.base.is_some() {
            runway_ops::process_launch_queue(world, index, ops, runways, &unit, now, events);
        }
    }

    let units = read_all(world, index);
    for unit in units.iter().filter(|u| u.is_alive()) {
        match unit.flight {
            FlightState::Launching => {
                if !runway_ops::process_takeoff(world, ops, runways, unit, dt, events) {
                    fallback_launch(world, unit, dt, events);
                }
            }
            FlightState::Recovering => {
                let base = unit
                    .home_base
                    .as_ref()
                    .and_then(|id| units.iter().find(|u| &u.id == id));
                let Some(base) = base else {
                    continue;
                };
                if !runway_ops::process_recovery(world, ops, runways, unit, base, now, dt, events) {
                    fallback_recovery(world, unit, base, now, events);
                }
            }
            FlightState::Grounded | FlightState::Parked | FlightState::Airborne => {}
        }
    }

    rebuild_parked_lists(world, index);
}
