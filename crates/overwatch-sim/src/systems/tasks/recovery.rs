//! Flight-line tasks: TAKEOFF, LAND, RTB, REARM, and the automatic
//! RTB + LAND pair given to aircraft with nothing left to do.

use std::collections::HashSet;

use hecs::World;

use overwatch_core::components::*;
use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, FlightState, TaskStatus};
use overwatch_core::events::SimEvent;
use overwatch_core::task::{CompletionCondition, Task, TaskKind, TaskParams};
use overwatch_core::types::{EntityId, Velocity};

use crate::systems::tasks::{participants, AutoTaskIds, TaskContext};
use crate::unit::{dispatch, nearest_base, update, Unit};

fn hold_params(speed_fraction: f64) -> TaskParams {
    TaskParams {
        speed_fraction,
        ..TaskParams::default()
    }
}

fn land_task(id: String, entity: &EntityId, base: &EntityId, now: f64) -> Task {
    let mut land = Task::new(
        id,
        vec![entity.clone()],
        TaskKind::Land {
            base_id: base.clone(),
        },
        CompletionCondition::FlightState {
            target: FlightState::Parked,
        },
    )
    .with_params(hold_params(0.5));
    land.created_at = now;
    land
}

/// An RTB to `base` followed by a LAND there, both QUEUED.
pub fn recovery_pair(ids: &mut AutoTaskIds, entity: &EntityId, base: &EntityId, now: f64) -> (Task, Task) {
    let mut rtb = Task::new(
        ids.next("rtb", entity),
        vec![entity.clone()],
        TaskKind::Rtb {
            base_id: Some(base.clone()),
        },
        CompletionCondition::Arrival,
    )
    .with_params(hold_params(RTB_SPEED_FRACTION));
    rtb.created_at = now;

    let land = land_task(ids.next("land", entity), entity, base, now);
    (rtb, land)
}

/// Home base while it stands, else the nearest friendly base.
pub fn recovery_base(units: &[Unit], unit: &Unit) -> Option<EntityId> {
    let home = unit
        .home_base
        .as_ref()
        .and_then(|id| units.iter().find(|u| &u.id == id))
        .filter(|b| b.is_alive() && b.base.is_some());
    match home {
        Some(base) => Some(base.id.clone()),
        None => nearest_base(units, unit.faction, &unit.position).map(|b| b.id),
    }
}

fn set_flight(world: &mut World, unit: &Unit, flight: Flight, events: &mut Vec<SimEvent>) {
    let state = flight.state;
    update::<Flight, _>(world, unit.handle, |f| *f = flight);
    events.push(SimEvent::FlightStateChanged {
        entity_id: unit.id.clone(),
        state,
    });
}

pub fn takeoff(ctx: &mut TaskContext, task: &Task, base_id: &EntityId) {
    let units = ctx.units();
    let base = units.iter().find(|u| &u.id == base_id);
    let has_runway = ctx.runways.primary(base_id.as_str()).is_some();

    for unit in participants(&units, task) {
        if unit.flight != FlightState::Parked {
            continue;
        }

        // Runway bases release aircraft one at a time from the launch queue.
        if let Some(base) = base.filter(|b| has_runway && b.base.is_some()) {
            update::<BaseState, _>(ctx.world, base.handle, |s| {
                if !s.launch_queue.contains(&unit.id) {
                    s.launch_queue.push_back(unit.id.clone());
                    log::debug!("{} queued for launch at {}", unit.id, base.id);
                }
            });
            continue;
        }

        let position = base.map_or(unit.position, |b| b.position);
        update::<Vitals, _>(ctx.world, unit.handle, |v| v.state = EntityState::Transit);
        update::<Kinematics, _>(ctx.world, unit.handle, |k| {
            k.position = position;
            k.velocity = Velocity {
                heading: k.heading,
                speed: 1.0,
            };
        });
        set_flight(
            ctx.world,
            unit,
            Flight {
                state: FlightState::Launching,
                home_base: Some(base_id.clone()),
            },
            ctx.events,
        );
        log::info!("{} launching from {base_id}", unit.id);
    }
}

pub fn land(ctx: &mut TaskContext, task: &Task, base_id: &EntityId) {
    let units = ctx.units();
    let Some(base) = units.iter().find(|u| &u.id == base_id) else {
        return;
    };

    for unit in participants(&units, task) {
        if unit.flight != FlightState::Airborne {
            continue;
        }

        let (destination, heading) = match ctx.runway_ops.begin_landing(&unit.id, base_id, ctx.runways) {
            Some(approach) => (approach.destination, approach.heading),
            None => (base.position, unit.position.bearing_to(&base.position)),
        };
        update::<Vitals, _>(ctx.world, unit.handle, |v| v.state = EntityState::Transit);
        update::<Kinematics, _>(ctx.world, unit.handle, |k| {
            k.destination = Some(destination);
            k.heading = heading;
            k.velocity.heading = heading;
        });
        set_flight(
            ctx.world,
            unit,
            Flight {
                state: FlightState::Recovering,
                home_base: Some(base_id.clone()),
            },
            ctx.events,
        );
        log::info!("{} recovering to {base_id}", unit.id);
    }
}

pub fn rtb(ctx: &mut TaskContext, task: &Task, base_id: Option<&EntityId>) {
    let units = ctx.units();
    let members = participants(&units, task);

    let base = match base_id {
        Some(id) => units.iter().find(|u| &u.id == id).cloned(),
        None => members
            .first()
            .and_then(|lead| nearest_base(&units, lead.faction, &lead.position)),
    };
    let Some(base) = base else {
        return;
    };

    for unit in members.iter().filter(|u| u.flight == FlightState::Airborne) {
        update::<Flight, _>(ctx.world, unit.handle, |f| f.home_base = Some(base.id.clone()));

        if unit.distance_to(&base.position) < RTB_ARRIVAL_M {
            let board = &*ctx.board;
            let has_land = ctx
                .world
                .get::<&Orders>(unit.handle)
                .map(|orders| {
                    orders
                        .queue
                        .iter()
                        .filter_map(|id| board.get(id))
                        .any(|t| matches!(t.kind, TaskKind::Land { .. }))
                })
                .unwrap_or(true);
            if !has_land {
                let land = land_task(ctx.ids.next("land", &unit.id), &unit.id, &base.id, ctx.now);
                let land_id = land.id.clone();
                ctx.board.insert(land);
                update::<Orders, _>(ctx.world, unit.handle, |o| o.queue.push_back(land_id));
            }
            continue;
        }

        if unit.state == EntityState::Idle {
            dispatch(
                ctx.world,
                unit.handle,
                base.position,
                unit.max_speed * RTB_SPEED_FRACTION,
            );
        }
    }
}

/// One round back in the magazine every `REARM_INTERVAL_SECS` while parked.
pub fn rearm(ctx: &mut TaskContext, task: &Task, base_id: &EntityId) {
    if !ctx.index.contains(base_id) {
        return;
    }
    let now = ctx.now;
    let units = ctx.units();
    for unit in participants(&units, task) {
        if unit.flight != FlightState::Parked {
            continue;
        }
        let Some(ammo) = unit.ammo.filter(|a| a.remaining < a.capacity) else {
            continue;
        };
        let since = unit.last_fire_time.map_or(f64::INFINITY, |t| now - t);
        if since < REARM_INTERVAL_SECS {
            continue;
        }
        let remaining = (ammo.remaining + 1).min(ammo.capacity);
        update::<AmmoState, _>(ctx.world, unit.handle, |a| a.remaining = remaining);
        update::<Engagement, _>(ctx.world, unit.handle, |e| e.last_fire_time = Some(now));
    }
}

/// Airborne player aircraft with no orders at all get an RTB + LAND, once.
pub fn auto_rtb(ctx: &mut TaskContext, done: &mut HashSet<EntityId>) {
    let units = ctx.units();

    for unit in &units {
        if unit.faction != PLAYER_FACTION || !unit.is_alive() || unit.flight != FlightState::Airborne {
            continue;
        }
        let no_orders = ctx
            .world
            .get::<&Orders>(unit.handle)
            .map(|o| o.is_empty())
            .unwrap_or(false);
        if !no_orders || !done.insert(unit.id.clone()) {
            continue;
        }

        let Some(base) = recovery_base(&units, unit) else {
            log::warn!("{} has no base to return to", unit.id);
            continue;
        };
        let (rtb, land) = recovery_pair(ctx.ids, &unit.id, &base, ctx.now);
        let (rtb_id, land_id) = (rtb.id.clone(), land.id.clone());
        ctx.board.insert(rtb);
        ctx.board.insert(land);
        if ctx.board.transition(&rtb_id, TaskStatus::Active, ctx.now) {
            ctx.events.push(SimEvent::TaskActivated {
                task_id: rtb_id.clone(),
            });
        }

        update::<Orders, _>(ctx.world, unit.handle, |o| {
            o.current = Some(rtb_id.clone());
            o.queue.push_back(land_id);
        });
        log::info!("{} idle in the air, {rtb_id} toward {base}", unit.id);
    }
}
