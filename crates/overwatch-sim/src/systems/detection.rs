//! Sensor detection system.
//!
//! Every tick, recomputes which opposing entities each sensor sees.
//! Detection flags are rebuilt from scratch; nothing carries over.

use hecs::World;

use overwatch_core::components::Detection;
use overwatch_core::constants::{radar_cross_section_factor, OMNI_FOV_DEG};
use overwatch_core::enums::{FlightState, RadarMode, SensorKind};
use overwatch_core::geo;

use crate::index::EntityIndex;
use crate::unit::{read_all, update, Unit};

/// Whether `observer`'s sensor sees `target` this tick.
///
/// Radar reach scales with the target's cross-section and emission state.
/// A radar carrier running passive sees nothing; cameras are unaffected.
pub fn sensor_sees(observer: &Unit, target: &Unit) -> bool {
    let Some(sensor) = observer.sensor else {
        return false;
    };

    let mut range = sensor.range;
    if sensor.kind == SensorKind::Radar {
        if observer.radar_mode == RadarMode::Passive {
            return false;
        }
        range *= target.rcs * radar_cross_section_factor(target.radar_mode);
    }

    if observer.distance_to(&target.position) > range {
        return false;
    }
    if sensor.field_of_view >= OMNI_FOV_DEG {
        return true;
    }

    let bearing = observer.position.bearing_to(&target.position);
    let boresight = observer.heading + sensor.current_angle;
    geo::angle_between(bearing, boresight) <= sensor.field_of_view / 2.0
}

fn on_the_map(unit: &Unit) -> bool {
    unit.is_alive() && unit.flight != FlightState::Parked
}

pub fn run(world: &mut World, index: &EntityIndex) {
    let units = read_all(world, index);
    let observers: Vec<&Unit> = units
        .iter()
        .filter(|u| u.sensor.is_some() && on_the_map(u))
        .collect();

    for target in &units {
        let mut detection = Detection::default();
        if on_the_map(target) {
            detection.detected_by = observers
                .iter()
                .filter(|obs| obs.faction != target.faction && sensor_sees(obs, target))
                .map(|obs| obs.id.clone())
                .collect();
            detection.is_detected = !detection.detected_by.is_empty();
        }
        update::<Detection, _>(world, target.handle, |d| *d = detection);
    }
}
