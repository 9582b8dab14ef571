//! Fuel burn and bingo recovery.
//!
//! Burn rate is interpolated between the cruise and max rates by speed
//! fraction. Running dry while AIRBORNE is a crash.

use hecs::World;

use overwatch_core::components::*;
use overwatch_core::enums::{EntityState, FlightState, TaskStatus};
use overwatch_core::events::SimEvent;
use overwatch_core::platform::{FuelSpec, MovementSpec};
use overwatch_core::task::TaskBoard;
use overwatch_core::types::TaskId;

use crate::index::EntityIndex;
use crate::systems::tasks::recovery::{recovery_base, recovery_pair};
use crate::systems::tasks::AutoTaskIds;
use crate::unit::{read_all, update, Unit};

/// Fuel burned per second at `speed`.
pub fn burn_rate(fuel: &FuelSpec, movement: &MovementSpec, speed: f64) -> f64 {
    let fraction = if movement.max_speed > 0.0 {
        speed / movement.max_speed
    } else {
        0.0
    };
    fuel.burn_rate_cruise + (fuel.burn_rate_max - fuel.burn_rate_cruise) * fraction
}

pub fn run(world: &mut World, dt: f64, events: &mut Vec<SimEvent>) {
    for (_entity, (ident, vitals, flight, kin, spec, movement, fuel)) in world.query_mut::<(
        &Identity,
        &mut Vitals,
        &Flight,
        &mut Kinematics,
        &FuelSpec,
        &MovementSpec,
        &mut FuelState,
    )>() {
        if vitals.is_destroyed() || !flight.is_airborne() {
            continue;
        }

        let was_bingo = fuel.is_bingo;
        fuel.remaining = (fuel.remaining - burn_rate(spec, movement, kin.velocity.speed) * dt).max(0.0);
        fuel.is_bingo = fuel.remaining <= fuel.capacity * spec.bingo_percent;

        if fuel.remaining <= 0.0 && flight.state == FlightState::Airborne {
            vitals.destroy();
            kin.velocity.speed = 0.0;
            kin.destination = None;
            log::warn!("{} ran out of fuel", ident.id);
            events.push(SimEvent::FuelExhausted {
                entity_id: ident.id.clone(),
            });
            events.push(SimEvent::EntityDestroyed {
                entity_id: ident.id.clone(),
            });
            continue;
        }

        if fuel.is_bingo && !was_bingo {
            log::info!("{} is bingo fuel ({:.0} left)", ident.id, fuel.remaining);
            events.push(SimEvent::BingoFuel {
                entity_id: ident.id.clone(),
            });
        }
    }
}

/// Send every bingo aircraft home.
///
/// An aircraft that already has an RTB or LAND task anywhere in its orders
/// is left alone, so repeated calls inject at most once. Otherwise a fresh
/// ACTIVE RTB replaces its current task and a QUEUED LAND goes to the front
/// of its queue. A displaced task that no other unit is still flying fails.
pub fn inject_bingo_rtb(
    world: &mut World,
    index: &EntityIndex,
    board: &mut TaskBoard,
    ids: &mut AutoTaskIds,
    now: f64,
    events: &mut Vec<SimEvent>,
) {
    let mut units = read_all(world, index);

    for i in 0..units.len() {
        let unit = units[i].clone();
        if !unit.is_alive() || unit.flight != FlightState::Airborne {
            continue;
        }
        let bingo = world
            .get::<&FuelState>(unit.handle)
            .map(|f| f.is_bingo)
            .unwrap_or(false);
        if !bingo {
            continue;
        }

        let has_recovery = world
            .get::<&Orders>(unit.handle)
            .map(|orders| {
                orders
                    .task_ids()
                    .filter_map(|id| board.get(id))
                    .any(|task| task.kind.is_recovery())
            })
            .unwrap_or(true);
        if has_recovery {
            continue;
        }

        let Some(base) = recovery_base(&units, &unit) else {
            log::warn!("{} is bingo with no base to recover to", unit.id);
            continue;
        };

        let (rtb, land) = recovery_pair(ids, &unit.id, &base, now);
        let (rtb_id, land_id) = (rtb.id.clone(), land.id.clone());
        board.insert(rtb);
        board.insert(land);
        board.transition(&rtb_id, TaskStatus::Active, now);

        update::<Orders, _>(world, unit.handle, |orders| {
            orders.current = Some(rtb_id.clone());
            orders.queue.push_front(land_id);
        });
        units[i].current_task = Some(rtb_id.clone());
        if let Some(displaced) = &unit.current_task {
            abandon(&units, displaced, board, now, events);
        }
        // Halt any transit so the RTB redirects the aircraft this tick.
        if unit.state == EntityState::Transit {
            update::<Vitals, _>(world, unit.handle, |v| v.state = EntityState::Idle);
            update::<Kinematics, _>(world, unit.handle, |k| k.destination = None);
        }
        log::info!("{} bingo: {} injected toward {}", unit.id, rtb_id, base);
    }
}

/// Fail `task` once the last unit working it has been pulled off.
fn abandon(
    units: &[Unit],
    task: &TaskId,
    board: &mut TaskBoard,
    now: f64,
    events: &mut Vec<SimEvent>,
) {
    let still_flown = units
        .iter()
        .any(|u| u.is_alive() && u.current_task.as_ref() == Some(task));
    if still_flown || !board.transition(task, TaskStatus::Failed, now) {
        return;
    }
    log::info!("task {task} abandoned for bingo fuel");
    events.push(SimEvent::TaskFailed {
        task_id: task.clone(),
    });
}
