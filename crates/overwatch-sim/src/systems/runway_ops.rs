//! Runway-aligned takeoff and landing.
//!
//! Aircraft using a base with surveyed runway geometry go through ground
//! roll phases along the runway centerline. The runway is a shared
//! resource: at most one aircraft per base may be in TAKEOFF_ROLL, ROTATE
//! or LANDING_ROLL at a time. The launch queue waits for a clear runway,
//! and an aircraft reaching the threshold while the runway is busy goes
//! around.

use std::collections::HashMap;

use hecs::World;

use overwatch_core::components::*;
use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, FlightState, RunwayPhase};
use overwatch_core::events::SimEvent;
use overwatch_core::platform::BaseSpec;
use overwatch_core::runway::{RunwayDef, RunwayTable};
use overwatch_core::types::{EntityId, GeoPosition, Velocity};

use crate::index::EntityIndex;
use crate::unit::{update, Unit};

/// Cruise speed assumed for an aircraft without a movement spec (m/s).
const FALLBACK_CRUISE: f64 = 60.0;

/// Runway progress of one aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct RunwayState {
    pub phase: RunwayPhase,
    pub base_id: EntityId,
    /// Distance along the runway from the threshold the roll started at.
    pub progress_m: f64,
    pub runway_length_m: f64,
    /// Set after a go-around; the aircraft must reach the approach fix
    /// again before turning final.
    pub go_around: bool,
}

impl RunwayState {
    fn new(phase: RunwayPhase, base_id: EntityId, runway: &RunwayDef) -> Self {
        Self {
            phase,
            base_id,
            progress_m: 0.0,
            runway_length_m: runway.length_m(),
            go_around: false,
        }
    }
}

/// Where a landing aircraft should fly first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingApproach {
    pub destination: GeoPosition,
    pub heading: f64,
}

/// Per-aircraft runway phases, keyed by entity id.
#[derive(Debug, Default)]
pub struct RunwayOps {
    states: HashMap<EntityId, RunwayState>,
}

impl RunwayOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &EntityId) -> Option<&RunwayState> {
        self.states.get(id)
    }

    pub fn phase(&self, id: &EntityId) -> Option<RunwayPhase> {
        self.states.get(id).map(|s| s.phase)
    }

    /// Whether runway ops, not the movement system, positions this aircraft.
    pub fn drives_position(&self, id: &EntityId) -> bool {
        self.phase(id).is_some_and(RunwayPhase::drives_position)
    }

    /// Whether any aircraft is on the ground roll at `base`.
    pub fn is_occupied(&self, base: &EntityId) -> bool {
        self.occupants(base) > 0
    }

    pub fn occupants(&self, base: &EntityId) -> usize {
        self.states
            .values()
            .filter(|s| &s.base_id == base && s.phase.occupies_runway())
            .count()
    }

    pub fn clear(&mut self, id: &EntityId) {
        self.states.remove(id);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Start a runway landing at `base`. `None` if the base has no runway.
    pub fn begin_landing(
        &mut self,
        id: &EntityId,
        base: &EntityId,
        runways: &RunwayTable,
    ) -> Option<LandingApproach> {
        let runway = runways.primary(base.as_str())?;
        self.states.insert(
            id.clone(),
            RunwayState::new(RunwayPhase::ApproachAlign, base.clone(), runway),
        );
        Some(LandingApproach {
            destination: runway.approach_point(),
            heading: runway.landing_heading(),
        })
    }
}

fn set_flight(world: &mut World, unit: &Unit, state: FlightState, events: &mut Vec<SimEvent>) {
    update::<Flight, _>(world, unit.handle, |f| f.state = state);
    events.push(SimEvent::FlightStateChanged {
        entity_id: unit.id.clone(),
        state,
    });
}

fn place(world: &mut World, unit: &Unit, position: GeoPosition, heading: f64, speed: f64) {
    update::<Kinematics, _>(world, unit.handle, |k| {
        k.position = position;
        k.heading = heading;
        k.velocity = Velocity { heading, speed };
    });
}

/// Release the next aircraft in a base's launch queue onto the runway.
///
/// Nothing happens before `launch_interval` has passed since the last
/// launch, or while the runway is occupied. A queue head that is
/// destroyed or no longer parked is dropped.
pub fn process_launch_queue(
    world: &mut World,
    index: &EntityIndex,
    ops: &mut RunwayOps,
    runways: &RunwayTable,
    base: &Unit,
    now: f64,
    events: &mut Vec<SimEvent>,
) {
    let (Some(spec), Some(runway)) = (base.base, runways.primary(base.id.as_str())) else {
        return;
    };
    let head = match world.get::<&BaseState>(base.handle) {
        Ok(state) if state.since_last_launch(now) >= spec.launch_interval => {
            match state.launch_queue.front() {
                Some(head) => head.clone(),
                None => return,
            }
        }
        _ => return,
    };
    if ops.is_occupied(&base.id) {
        return;
    }

    update::<BaseState, _>(world, base.handle, |s| {
        s.launch_queue.pop_front();
    });

    let aircraft = index.get(&head).and_then(|h| Unit::read(world, h));
    let Some(aircraft) = aircraft.filter(|a| a.is_alive() && a.flight == FlightState::Parked) else {
        log::debug!("dropped stale launch queue entry {head} at {}", base.id);
        return;
    };

    update::<BaseState, _>(world, base.handle, |s| s.last_launch_time = Some(now));
    ops.states.insert(
        aircraft.id.clone(),
        RunwayState::new(RunwayPhase::TakeoffRoll, base.id.clone(), runway),
    );

    let heading = runway.departure_heading();
    let runout = runway.along_takeoff_roll(runway.length_m() + DEPARTURE_RUNOUT_M);
    place(world, &aircraft, runway.departure_threshold(), heading, 1.0);
    update::<Kinematics, _>(world, aircraft.handle, |k| k.destination = Some(runout));
    update::<Vitals, _>(world, aircraft.handle, |v| v.state = EntityState::Transit);
    update::<Flight, _>(world, aircraft.handle, |f| f.home_base = Some(base.id.clone()));
    set_flight(world, &aircraft, FlightState::Launching, events);
    log::info!("{} rolling on {} at {}", aircraft.id, runway.name, base.id);
}

/// Advance a LAUNCHING aircraft along its takeoff. Returns false if the
/// aircraft has no runway state and should use the fallback launch.
pub fn process_takeoff(
    world: &mut World,
    ops: &mut RunwayOps,
    runways: &RunwayTable,
    unit: &Unit,
    dt: f64,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Some(mut state) = ops.states.get(&unit.id).cloned() else {
        return false;
    };
    let Some(runway) = runways.primary(state.base_id.as_str()) else {
        ops.clear(&unit.id);
        return false;
    };
    let Some(movement) = unit.movement else {
        return true;
    };

    let speed = (unit.speed + movement.acceleration * dt).min(movement.cruise_speed);
    state.progress_m += speed * dt;
    let length = state.runway_length_m;

    if state.phase == RunwayPhase::TakeoffRoll && state.progress_m >= length * ROTATE_FRACTION {
        state.phase = RunwayPhase::Rotate;
    }
    if matches!(state.phase, RunwayPhase::TakeoffRoll | RunwayPhase::Rotate)
        && state.progress_m >= length
    {
        state.phase = RunwayPhase::DepartureClimb;
    }

    let heading = runway.departure_heading();
    place(world, unit, runway.along_takeoff_roll(state.progress_m), heading, speed);

    let climbed_out = state.phase == RunwayPhase::DepartureClimb
        && state.progress_m - length >= DEPARTURE_CLIMB_DIST_M
        && speed >= movement.cruise_speed * LAUNCH_SPEED_FRACTION;
    if climbed_out {
        ops.clear(&unit.id);
        update::<Kinematics, _>(world, unit.handle, |k| k.destination = None);
        update::<Vitals, _>(world, unit.handle, |v| v.state = EntityState::Idle);
        set_flight(world, unit, FlightState::Airborne, events);
        log::debug!("{} airborne off {}", unit.id, state.base_id);
    } else {
        ops.states.insert(unit.id.clone(), state);
    }
    true
}

/// Advance a RECOVERING aircraft through approach, final and landing
/// roll. Returns false if it has no runway state and should use the
/// fallback recovery.
#[allow(clippy::too_many_arguments)]
pub fn process_recovery(
    world: &mut World,
    ops: &mut RunwayOps,
    runways: &RunwayTable,
    unit: &Unit,
    base: &Unit,
    now: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Some(mut state) = ops.states.get(&unit.id).cloned() else {
        return false;
    };
    let Some(runway) = runways.primary(state.base_id.as_str()) else {
        ops.clear(&unit.id);
        return false;
    };

    let cruise = unit.movement.map_or(FALLBACK_CRUISE, |m| m.cruise_speed);
    let threshold = runway.arrival_threshold();
    let landing_heading = runway.landing_heading();

    match state.phase {
        RunwayPhase::ApproachAlign => {
            let to_threshold = unit.distance_to(&threshold);
            let at_fix = unit.destination.is_none()
                || unit.distance_to(&runway.approach_point()) < ARRIVAL_THRESHOLD_M;
            if at_fix || (!state.go_around && to_threshold < FINAL_APPROACH_DIST_M) {
                state.phase = RunwayPhase::FinalApproach;
                state.go_around = false;
                let speed = unit
                    .speed
                    .min(cruise * 0.5)
                    .max(FINAL_APPROACH_MIN_SPEED);
                let heading = unit.position.bearing_to(&threshold);
                place(world, unit, unit.position, heading, speed);
                update::<Kinematics, _>(world, unit.handle, |k| k.destination = Some(threshold));
                update::<Vitals, _>(world, unit.handle, |v| v.state = EntityState::Transit);
            }
        }

        RunwayPhase::FinalApproach => {
            let to_threshold = unit.distance_to(&threshold);
            let approach_speed =
                (to_threshold / 1000.0 * cruise * 0.3).max(FINAL_APPROACH_MIN_SPEED);
            let speed = unit.speed.min(approach_speed);

            if to_threshold < LANDING_THRESHOLD_DIST_M {
                if ops.is_occupied(&state.base_id) {
                    state.phase = RunwayPhase::ApproachAlign;
                    state.go_around = true;
                    let fix = runway.approach_point();
                    let heading = unit.position.bearing_to(&fix);
                    place(world, unit, unit.position, heading, speed.max(cruise * 0.5));
                    update::<Kinematics, _>(world, unit.handle, |k| k.destination = Some(fix));
                    log::info!("{} going around, runway at {} occupied", unit.id, state.base_id);
                } else {
                    state.phase = RunwayPhase::LandingRoll;
                    state.progress_m = 0.0;
                    place(world, unit, threshold, landing_heading, speed);
                    let rollout = runway.along_landing_roll(state.runway_length_m);
                    update::<Kinematics, _>(world, unit.handle, |k| k.destination = Some(rollout));
                }
            } else {
                let heading = unit.position.bearing_to(&threshold);
                let position = unit.position.moved(heading, (speed * dt).min(to_threshold));
                place(world, unit, position, heading, speed);
            }
        }

        RunwayPhase::LandingRoll => {
            let speed = (unit.speed - cruise * 0.8 * dt).max(0.0);
            state.progress_m += speed * dt;

            if speed <= 1.0 || state.progress_m >= state.runway_length_m * LANDING_STOP_FRACTION {
                ops.clear(&unit.id);
                park(world, unit, base, now, events);
                return true;
            }
            place(world, unit, runway.along_landing_roll(state.progress_m), landing_heading, speed);
        }

        // Takeoff phases belong to `process_takeoff`.
        RunwayPhase::TakeoffRoll | RunwayPhase::Rotate | RunwayPhase::DepartureClimb => {}
    }

    ops.states.insert(unit.id.clone(), state);
    true
}

/// Put a recovered aircraft on the ground at its base.
pub fn park(world: &mut World, unit: &Unit, base: &Unit, now: f64, events: &mut Vec<SimEvent>) {
    place(world, unit, base.position, unit.heading, 0.0);
    update::<Kinematics, _>(world, unit.handle, |k| k.destination = None);
    update::<Vitals, _>(world, unit.handle, |v| v.state = EntityState::Idle);
    update::<BaseState, _>(world, base.handle, |s| s.last_recovery_time = Some(now));
    set_flight(world, unit, FlightState::Parked, events);
    log::info!("{} parked at {}", unit.id, base.id);
}

/// Queue length and whole seconds until the next launch slot, or `None`
/// when the queue is empty.
pub fn launch_queue_info(state: &BaseState, spec: &BaseSpec, now: f64) -> Option<(usize, u32)> {
    if state.launch_queue.is_empty() {
        return None;
    }
    let remaining = (spec.launch_interval - state.since_last_launch(now)).max(0.0);
    Some((state.launch_queue.len(), remaining.ceil() as u32))
}
