//! Movement orders: MOVE_TO, RECON_AREA, PATROL, ORBIT.
//!
//! Only IDLE participants get a new waypoint, so a unit in transit keeps
//! flying its leg until the movement system marks it arrived.

use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, Roe, WeaponKind};
use overwatch_core::geo::normalize_heading;
use overwatch_core::state::Contact;
use overwatch_core::task::{AreaDef, Task};
use overwatch_core::types::GeoPosition;

use crate::formations::formation_positions;
use crate::systems::formation::formation_speed;
use crate::systems::tasks::completion::arrival_radius;
use crate::systems::tasks::{participants, roe, slot_of, TaskContext};
use crate::unit::{dispatch, engage, Unit};

/// Formation speed for a group, or this unit's own fraction of max speed.
fn group_speed(task: &Task, members: &[&Unit], unit: &Unit) -> f64 {
    if task.assigned_ids.len() > 1 {
        formation_speed(members, task.params.speed_fraction).unwrap_or(0.0)
    } else {
        unit.max_speed * task.params.speed_fraction
    }
}

/// Point idle or transiting one-way attackers at their nearest contact.
fn engage_nearest(ctx: &mut TaskContext, members: &[&Unit], contacts: &[&Contact]) {
    if contacts.is_empty() {
        return;
    }
    for unit in members {
        if unit.weapon_kind() != Some(WeaponKind::Suicide)
            || !matches!(unit.state, EntityState::Idle | EntityState::Transit)
        {
            continue;
        }
        let nearest = contacts
            .iter()
            .min_by(|a, b| unit.distance_to(&a.position).total_cmp(&unit.distance_to(&b.position)));
        if let Some(contact) = nearest {
            log::debug!("{} engaging {}", unit.id, contact.entity_id);
            engage(ctx.world, unit.handle, &contact.entity_id);
        }
    }
}

/// Engagements allowed while searching an area: TIGHT stays inside it,
/// FREE takes anything live.
fn engage_in_area(ctx: &mut TaskContext, task: &Task, area: &AreaDef) {
    let roe = task.params.roe;
    if roe == Roe::WeaponsHold {
        return;
    }
    let scope = (roe == Roe::WeaponsTight).then_some(area);
    let contacts = ctx.contacts;
    let eligible = roe::eligible(contacts.iter(), roe, scope, None);

    let units = ctx.units();
    let members = participants(&units, task);
    engage_nearest(ctx, &members, &eligible);
}

pub fn move_to(ctx: &mut TaskContext, task: &Task, destination: GeoPosition) {
    let units = ctx.units();
    let members = participants(&units, task);
    let radius = arrival_radius(task);
    let count = task.assigned_ids.len();

    for unit in &members {
        if unit.state != EntityState::Idle || unit.distance_to(&destination) < radius {
            continue;
        }
        let heading = unit.position.bearing_to(&destination);
        let slots = formation_positions(
            destination,
            count,
            task.params.formation,
            heading,
            task.params.spacing,
        );
        let slot = slots.get(slot_of(task, &unit.id)).copied().unwrap_or(destination);
        dispatch(ctx.world, unit.handle, slot, group_speed(task, &members, unit));
    }

    if task.params.roe == Roe::WeaponsFree {
        let contacts = ctx.contacts;
        let eligible = roe::eligible(contacts.iter(), Roe::WeaponsFree, None, None);
        let units = ctx.units();
        let members = participants(&units, task);
        engage_nearest(ctx, &members, &eligible);
    }
}

/// Waypoints rotate 60° every leg and alternate between 60 % and 80 % of
/// the area radius.
pub fn recon_waypoint(area: &AreaDef, slot: usize, count: usize, now: f64) -> GeoPosition {
    let leg = (now / RECON_LEG_SECS).floor();
    let base_angle = 360.0 / count.max(1) as f64 * slot as f64;
    let angle = normalize_heading(base_angle + leg * 60.0);
    let fraction = if leg as i64 % 2 == 0 { 0.6 } else { 0.8 };
    area.center.moved(angle, area.radius * fraction)
}

pub fn recon_area(ctx: &mut TaskContext, task: &Task, area: &AreaDef) {
    let units = ctx.units();
    let members = participants(&units, task);
    let count = task.assigned_ids.len();

    for unit in members.iter().filter(|u| u.state == EntityState::Idle) {
        let waypoint = recon_waypoint(area, slot_of(task, &unit.id), count, ctx.now);
        dispatch(ctx.world, unit.handle, waypoint, group_speed(task, &members, unit));
    }
    engage_in_area(ctx, task, area);
}

/// Next patrol corner: snap the unit's bearing from the centre to a
/// quadrant, then step a quarter turn on, staggered per slot.
pub fn patrol_waypoint(area: &AreaDef, from: &GeoPosition, slot: usize, count: usize) -> GeoPosition {
    let snapped = (area.center.bearing_to(from) / 90.0).round() * 90.0;
    let angle = normalize_heading(snapped + 90.0 + slot as f64 * 90.0 / count.max(1) as f64);
    area.center.moved(angle, area.radius * 0.8)
}

pub fn patrol(ctx: &mut TaskContext, task: &Task, area: &AreaDef) {
    let units = ctx.units();
    let members = participants(&units, task);
    let count = task.assigned_ids.len();

    for unit in members.iter().filter(|u| u.state == EntityState::Idle) {
        let waypoint = patrol_waypoint(area, &unit.position, slot_of(task, &unit.id), count);
        dispatch(ctx.world, unit.handle, waypoint, group_speed(task, &members, unit));
    }
    engage_in_area(ctx, task, area);
}

pub fn orbit(ctx: &mut TaskContext, task: &Task, center: GeoPosition, radius: f64) {
    let units = ctx.units();
    let members = participants(&units, task);
    let count = task.assigned_ids.len().max(1) as f64;
    let sweep = normalize_heading(ctx.now * ORBIT_DEG_PER_SEC);

    for unit in members.iter().filter(|u| u.state == EntityState::Idle) {
        let base_angle = 360.0 / count * slot_of(task, &unit.id) as f64;
        let waypoint = center.moved(normalize_heading(base_angle + sweep), radius);
        dispatch(
            ctx.world,
            unit.handle,
            waypoint,
            unit.max_speed * task.params.speed_fraction,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: AreaDef = AreaDef {
        center: GeoPosition { lat: 16.0, lon: 112.0 },
        radius: 10_000.0,
    };

    #[test]
    fn recon_waypoints_rotate_and_alternate_radius() {
        let first = recon_waypoint(&AREA, 0, 1, 0.0);
        let second = recon_waypoint(&AREA, 0, 1, 30.0);
        assert!((AREA.center.distance_to(&first) - 6_000.0).abs() < 5.0);
        assert!((AREA.center.distance_to(&second) - 8_000.0).abs() < 5.0);
        let bearing = AREA.center.bearing_to(&second);
        assert!((bearing - 60.0).abs() < 0.5, "bearing {bearing}");
        assert_eq!(recon_waypoint(&AREA, 0, 1, 29.9), first);
    }

    #[test]
    fn patrol_steps_a_quarter_turn() {
        let north = AREA.center.moved(5.0, 5_000.0);
        let next = patrol_waypoint(&AREA, &north, 0, 1);
        let bearing = AREA.center.bearing_to(&next);
        assert!((bearing - 90.0).abs() < 0.5, "bearing {bearing}");
        assert!((AREA.center.distance_to(&next) - 8_000.0).abs() < 5.0);
    }
}
