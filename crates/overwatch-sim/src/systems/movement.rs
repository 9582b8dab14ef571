//! Kinematic movement and sensor sweep.
//!
//! Moves entities toward their destination at their current speed. An
//! aircraft with nowhere to go flies a holding circle instead of stopping
//! in mid-air. Aircraft whose runway phase drives their position are left
//! to runway ops.

use std::f64::consts::PI;

use hecs::World;

use overwatch_core::components::*;
use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, FlightState};
use overwatch_core::geo;
use overwatch_core::types::Velocity;

use crate::systems::runway_ops::RunwayOps;

fn rotate_sensor(sensor: &mut Sensor, dt: f64) {
    if sensor.rotation_speed != 0.0 {
        sensor.current_angle = geo::normalize_heading(sensor.current_angle + sensor.rotation_speed * dt);
    }
}

fn in_the_air(flight: FlightState) -> bool {
    matches!(
        flight,
        FlightState::Airborne | FlightState::Launching | FlightState::Recovering
    )
}

/// One step of a clockwise holding circle.
fn fly_holding(kin: &mut Kinematics, dt: f64) {
    let speed = kin.velocity.speed.max(kin.max_speed * HOLDING_SPEED_FRACTION);
    if speed <= 0.0 {
        return;
    }
    let lap_secs = 2.0 * PI * HOLDING_RADIUS_M / speed;
    let turn = (HOLDING_DEG_PER_SEC * dt * 360.0 / lap_secs).min(HOLDING_MAX_TURN_DEG);
    let heading = geo::normalize_heading(kin.heading + turn);

    kin.position = kin.position.moved(heading, speed * dt);
    kin.heading = heading;
    kin.velocity = Velocity { heading, speed };
}

/// Move toward the destination; returns true on arrival.
fn step_toward(kin: &mut Kinematics, dt: f64) -> bool {
    let Some(dest) = kin.destination else {
        return false;
    };
    let dist = kin.position.distance_to(&dest);
    if dist < ARRIVAL_THRESHOLD_M {
        kin.position = dest;
        kin.destination = None;
        return true;
    }

    let heading = kin.position.bearing_to(&dest);
    kin.position = kin.position.moved(heading, (kin.velocity.speed * dt).min(dist));
    kin.heading = heading;
    kin.velocity.heading = heading;
    false
}

pub fn run(world: &mut World, runway: &RunwayOps, dt: f64) {
    for (_entity, (ident, flight, kin, vitals, sensor)) in world.query_mut::<(
        &Identity,
        &Flight,
        &mut Kinematics,
        &mut Vitals,
        Option<&mut Sensor>,
    )>() {
        if flight.state == FlightState::Parked || vitals.is_destroyed() {
            continue;
        }
        if let Some(sensor) = sensor {
            rotate_sensor(sensor, dt);
        }
        if vitals.state == EntityState::Attacking || runway.drives_position(&ident.id) {
            continue;
        }

        if kin.destination.is_none() {
            if in_the_air(flight.state) && flight.state != FlightState::Recovering {
                fly_holding(kin, dt);
                vitals.state = EntityState::Idle;
            }
            continue;
        }

        if step_toward(kin, dt) {
            vitals.state = EntityState::Idle;
            // Aircraft keep their speed; the holding pattern takes over.
            if !in_the_air(flight.state) {
                kin.velocity.speed = 0.0;
            }
        }
    }
}
