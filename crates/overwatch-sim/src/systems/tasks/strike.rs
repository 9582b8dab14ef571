//! Offensive tasks and weapon-specific fire control.
//!
//! One-way attackers go ATTACKING and the combat system flies them in.
//! Cruise missile carriers fire inside their envelope or reposition to
//! standoff range. ARM carriers only shoot at radiating emitters.

use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, Roe, WeaponKind};
use overwatch_core::platform::WeaponSpec;
use overwatch_core::state::Contact;
use overwatch_core::task::{AreaDef, Task};
use overwatch_core::types::{ContactId, EntityId, GeoPosition};

use crate::systems::missiles::{launch_arm, launch_cruise_missile, MissileSet};
use crate::systems::tasks::{participants, roe, TaskContext};
use crate::unit::{dispatch, engage, Unit};

/// Closest contact, heavily penalised for missiles already inbound so
/// fire spreads across targets.
fn pick_target<'c>(unit: &Unit, contacts: &[&'c Contact], missiles: &MissileSet) -> Option<&'c Contact> {
    let score = |c: &Contact| {
        unit.distance_to(&c.position) + missiles.inbound_to(&c.entity_id) as f64 * INBOUND_PENALTY_M
    };
    contacts
        .iter()
        .copied()
        .min_by(|a, b| score(a).total_cmp(&score(b)))
}

/// Fire at `contact` if it sits inside the envelope, else fall back to
/// standoff range when idle.
fn cruise_fire_control(
    ctx: &mut TaskContext,
    unit: &Unit,
    weapon: &WeaponSpec,
    contact: &Contact,
    speed_fraction: f64,
) {
    let dist = unit.distance_to(&contact.position);
    let standoff = weapon.standoff_range.unwrap_or(DEFAULT_STANDOFF_M);

    if dist <= weapon.range && dist >= standoff * MIN_STANDOFF_FRACTION {
        launch_cruise_missile(ctx.world, ctx.missiles, unit.handle, contact, ctx.now, ctx.events);
    } else if unit.state == EntityState::Idle {
        let away = contact.position.bearing_to(&unit.position);
        let standoff_pos = contact.position.moved(away, standoff);
        dispatch(ctx.world, unit.handle, standoff_pos, unit.max_speed * speed_fraction);
    }
}

/// Fire at an emitter in range, else close to 80 % of weapon range when idle.
fn arm_fire_control(
    ctx: &mut TaskContext,
    unit: &Unit,
    weapon: &WeaponSpec,
    target: &Unit,
    speed_fraction: f64,
) {
    if unit.distance_to(&target.position) <= weapon.range {
        launch_arm(
            ctx.world,
            ctx.missiles,
            unit.handle,
            &target.id,
            target.position,
            ctx.now,
            ctx.events,
        );
    } else if unit.state == EntityState::Idle {
        let away = target.position.bearing_to(&unit.position);
        let approach = target.position.moved(away, weapon.range * 0.8);
        dispatch(ctx.world, unit.handle, approach, unit.max_speed * speed_fraction);
    }
}

fn emitting<'u>(units: &'u [Unit], id: &EntityId) -> Option<&'u Unit> {
    units
        .iter()
        .find(|u| &u.id == id)
        .filter(|u| u.is_alive() && u.is_emitting())
}

pub fn strike_on_detect(ctx: &mut TaskContext, task: &Task, watch_area: Option<&AreaDef>) {
    let contacts = ctx.contacts;
    let eligible = roe::eligible(
        contacts.iter(),
        task.params.roe,
        watch_area,
        Some(STRIKE_AREA_MULTIPLIER),
    );
    let speed_fraction = task.params.speed_fraction;

    let units = ctx.units();
    let members = participants(&units, task);

    if eligible.is_empty() {
        let Some(area) = watch_area else {
            return;
        };
        // Standoff carriers wait where they are; the rest close on the area.
        for unit in members.iter().filter(|u| u.state == EntityState::Idle) {
            if matches!(
                unit.weapon_kind(),
                Some(WeaponKind::CruiseMissile | WeaponKind::AntiRadiation)
            ) {
                continue;
            }
            if unit.distance_to(&area.center) > area.radius * 0.5 {
                dispatch(ctx.world, unit.handle, area.center, unit.max_speed * speed_fraction);
            }
        }
        return;
    }

    let emitters: Vec<&Contact> = eligible
        .iter()
        .copied()
        .filter(|c| emitting(&units, &c.entity_id).is_some())
        .collect();

    for unit in members {
        if unit.state == EntityState::Attacking {
            continue;
        }
        let Some(weapon) = unit.weapon else {
            continue;
        };
        match weapon.kind {
            WeaponKind::Suicide => {
                if let Some(contact) = pick_target(unit, &eligible, ctx.missiles) {
                    engage(ctx.world, unit.handle, &contact.entity_id);
                }
            }
            WeaponKind::CruiseMissile => {
                if let Some(contact) = pick_target(unit, &eligible, ctx.missiles) {
                    cruise_fire_control(ctx, unit, &weapon, contact, speed_fraction);
                }
            }
            WeaponKind::AntiRadiation => {
                let target = pick_target(unit, &emitters, ctx.missiles)
                    .and_then(|c| emitting(&units, &c.entity_id));
                if let Some(target) = target {
                    arm_fire_control(ctx, unit, &weapon, target, speed_fraction);
                }
            }
            // Surface-to-air batteries engage on their own.
            WeaponKind::Missile => {}
        }
    }
}

pub fn strike_target(ctx: &mut TaskContext, task: &Task, contact_id: ContactId) {
    if task.params.roe == Roe::WeaponsHold {
        return;
    }
    let contacts = ctx.contacts;
    let Some(contact) = contacts.get(contact_id) else {
        return;
    };
    let units = ctx.units();
    let Some(target) = units
        .iter()
        .find(|u| u.id == contact.entity_id)
        .filter(|u| u.is_alive())
    else {
        return;
    };

    for unit in participants(&units, task) {
        if unit.state == EntityState::Attacking {
            continue;
        }
        let Some(weapon) = unit.weapon else {
            continue;
        };
        match weapon.kind {
            WeaponKind::CruiseMissile => {
                cruise_fire_control(ctx, unit, &weapon, contact, task.params.speed_fraction)
            }
            WeaponKind::AntiRadiation => {
                if target.is_emitting() {
                    arm_fire_control(ctx, unit, &weapon, target, task.params.speed_fraction);
                }
            }
            WeaponKind::Suicide => {
                engage(ctx.world, unit.handle, &target.id);
            }
            // ATTACKING would freeze a battery that only shoots at aircraft.
            WeaponKind::Missile => {}
        }
    }
}

/// Fly to the standoff point, then fire at the contact's latest position.
/// Without a track on the picture there is nothing to guide on.
pub fn fire_cruise_missile(
    ctx: &mut TaskContext,
    task: &Task,
    contact_id: ContactId,
    standoff: GeoPosition,
) {
    let units = ctx.units();
    let contacts = ctx.contacts;
    let contact = contacts.get(contact_id);

    for unit in participants(&units, task) {
        if !unit.ammo.is_some_and(|a| a.remaining > 0) {
            continue;
        }
        if unit.distance_to(&standoff) > STAGING_TOLERANCE_M && unit.state == EntityState::Idle {
            dispatch(ctx.world, unit.handle, standoff, unit.max_speed * 0.6);
            continue;
        }
        if let Some(contact) = contact {
            launch_cruise_missile(ctx.world, ctx.missiles, unit.handle, contact, ctx.now, ctx.events);
        }
    }
}

/// Fly to the approach point, then fire while the target radiates.
pub fn fire_arm(ctx: &mut TaskContext, task: &Task, target: &EntityId, approach: GeoPosition) {
    let units = ctx.units();
    let emitter = emitting(&units, target);

    for unit in participants(&units, task) {
        if !unit.ammo.is_some_and(|a| a.remaining > 0) {
            continue;
        }
        if unit.distance_to(&approach) > STAGING_TOLERANCE_M && unit.state == EntityState::Idle {
            dispatch(ctx.world, unit.handle, approach, unit.max_speed * 0.8);
            continue;
        }
        if let Some(emitter) = emitter {
            launch_arm(
                ctx.world,
                ctx.missiles,
                unit.handle,
                &emitter.id,
                emitter.position,
                ctx.now,
                ctx.events,
            );
        }
    }
}
