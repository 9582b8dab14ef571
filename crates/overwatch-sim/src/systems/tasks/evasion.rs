//! ISR evasion: unarmed player aircraft that are being watched run away
//! from the closest enemy sensor covering them.

use std::collections::HashMap;

use hecs::World;

use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, FlightState};
use overwatch_core::types::{EntityId, GeoPosition};

use crate::index::EntityIndex;
use crate::unit::{dispatch, read_all, Unit};

fn wants_to_evade(unit: &Unit, last: Option<f64>, now: f64) -> bool {
    unit.faction == PLAYER_FACTION
        && unit.is_alive()
        && unit.state != EntityState::Attacking
        && unit.flight == FlightState::Airborne
        && unit.is_detected
        && unit.weapon.is_none()
        && unit.movement.is_some()
        && last.map_or(true, |t| now - t >= EVASION_COOLDOWN_SECS)
}

/// Closest living enemy whose sensor range covers `unit`.
fn nearest_threat(units: &[Unit], unit: &Unit) -> Option<GeoPosition> {
    units
        .iter()
        .filter(|o| o.faction != unit.faction && o.is_alive())
        .filter_map(|o| {
            let dist = unit.distance_to(&o.position);
            o.sensor.filter(|s| dist < s.range).map(|_| (dist, o.position))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, pos)| pos)
}

pub fn run(world: &mut World, index: &EntityIndex, last_evasion: &mut HashMap<EntityId, f64>, now: f64) {
    let units = read_all(world, index);

    for unit in &units {
        if !wants_to_evade(unit, last_evasion.get(&unit.id).copied(), now) {
            continue;
        }
        let Some(threat) = nearest_threat(&units, unit) else {
            continue;
        };

        let away = threat.bearing_to(&unit.position);
        let flee_to = unit.position.moved(away, EVASION_DISTANCE_M);
        dispatch(world, unit.handle, flee_to, unit.max_speed);
        last_evasion.insert(unit.id.clone(), now);
        log::debug!("{} evading, heading {away:.0}", unit.id);
    }
}
