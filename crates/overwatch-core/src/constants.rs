//! Simulation constants and tuning parameters.

use crate::enums::{Faction, RadarMode};

/// Mean earth radius used by all geo math (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Side commanded by the player. The contact picture is built for it.
pub const PLAYER_FACTION: Faction = Faction::Blue;

// --- Time ---

/// Largest real frame delta fed into one tick (seconds).
pub const MAX_REAL_DELTA: f64 = 0.1;

/// Highest accepted time scale.
pub const MAX_TIME_SCALE: f64 = 120.0;

// --- Detection ---

/// Detection range multiplier for a target's radar emission state.
/// An emitting target is easier to see.
pub fn radar_cross_section_factor(mode: RadarMode) -> f64 {
    match mode {
        RadarMode::Active => 2.0,
        RadarMode::Passive => 0.5,
    }
}

/// Field of view at or above which a sensor is omnidirectional (degrees).
pub const OMNI_FOV_DEG: f64 = 360.0;

/// Seconds a stale contact stays on the picture.
pub const CONTACT_PERSISTENCE_SECS: f64 = 30.0;

// --- Movement ---

/// Distance at which a destination counts as reached (meters).
pub const ARRIVAL_THRESHOLD_M: f64 = 200.0;

/// Radius of the holding circle flown by an airborne entity with no destination.
pub const HOLDING_RADIUS_M: f64 = 2_000.0;

/// Holding speed floor as a fraction of max speed.
pub const HOLDING_SPEED_FRACTION: f64 = 0.5;

/// Angular rate of the holding circle (degrees per second).
pub const HOLDING_DEG_PER_SEC: f64 = 2.0;

/// Upper bound on holding-pattern turn per tick (degrees).
pub const HOLDING_MAX_TURN_DEG: f64 = 3.0;

// --- Missiles ---

/// Distance to the aim point at which a missile detonates (meters).
pub const MISSILE_HIT_RADIUS_M: f64 = 100.0;

/// Direct-target tolerance around the impact point (meters).
pub const DIRECT_HIT_TOLERANCE_M: f64 = 300.0;

/// Lattice-guided splash search radius (meters).
pub const LATTICE_SPLASH_RADIUS_M: f64 = 200.0;

/// Cruise missile standoff if the weapon defines none (meters).
pub const DEFAULT_STANDOFF_M: f64 = 20_000.0;

/// Fraction of the standoff range inside which cruise missiles refuse to launch.
pub const MIN_STANDOFF_FRACTION: f64 = 0.5;

// --- Flight ops ---

/// Speed at which a launching aircraft is airborne, as a fraction of cruise.
pub const LAUNCH_SPEED_FRACTION: f64 = 0.8;

/// Distance from base at which fallback recovery parks the aircraft (meters).
pub const RECOVERY_PARK_DISTANCE_M: f64 = 300.0;

/// Minimum approach speed during fallback recovery (m/s).
pub const RECOVERY_MIN_SPEED: f64 = 10.0;

// --- Runway ops ---

/// Fraction of runway length at which the takeoff roll rotates.
pub const ROTATE_FRACTION: f64 = 0.7;

/// Distance past the runway end before the climb-out completes (meters).
pub const DEPARTURE_CLIMB_DIST_M: f64 = 2_000.0;

/// Distance from the arrival threshold of the approach fix (meters).
pub const APPROACH_DIST_M: f64 = 2_500.0;

/// Distance from the threshold at which final approach begins (meters).
pub const FINAL_APPROACH_DIST_M: f64 = 2_500.0;

/// Touchdown distance from the arrival threshold (meters).
pub const LANDING_THRESHOLD_DIST_M: f64 = 50.0;

/// Fraction of runway length after which the landing roll stops.
pub const LANDING_STOP_FRACTION: f64 = 0.6;

/// Final approach speed floor (m/s).
pub const FINAL_APPROACH_MIN_SPEED: f64 = 15.0;

/// Distance past the far runway end of a departing aircraft's initial target.
pub const DEPARTURE_RUNOUT_M: f64 = 5_000.0;

// --- Formation ---

/// Slot error below which wingmen are left alone (meters).
pub const FORMATION_TOLERANCE_M: f64 = 300.0;

/// Heading blend factor toward the slot bearing.
pub const FORMATION_HEADING_BLEND: f64 = 0.3;

/// Lead speed may exceed formation speed by this factor before capping.
pub const FORMATION_LEAD_SPEED_MARGIN: f64 = 1.1;

/// Wingman catch-up and fall-back speed multipliers.
pub const FORMATION_CATCH_UP: f64 = 1.15;
pub const FORMATION_FALL_BACK: f64 = 0.85;

// --- Tasks ---

/// MOVE_TO arrival radius (meters).
pub const MOVE_TO_ARRIVAL_M: f64 = 500.0;

/// RTB arrival radius before a landing is requested (meters).
pub const RTB_ARRIVAL_M: f64 = 500.0;

/// Distance beyond which a fire task first repositions (meters).
pub const STAGING_TOLERANCE_M: f64 = 2_000.0;

/// Area radius multiplier for STRIKE_ON_DETECT eligibility.
pub const STRIKE_AREA_MULTIPLIER: f64 = 1.5;

/// Default area multiplier for WEAPONS_FREE.
pub const FREE_AREA_MULTIPLIER: f64 = 2.0;

/// Score penalty per missile already inbound to a candidate target.
pub const INBOUND_PENALTY_M: f64 = 100_000.0;

/// Seconds between recon waypoint rotations.
pub const RECON_LEG_SECS: f64 = 30.0;

/// Degrees added to the orbit angle per game second.
pub const ORBIT_DEG_PER_SEC: f64 = 3.0;

/// Seconds per reloaded round while rearming.
pub const REARM_INTERVAL_SECS: f64 = 5.0;

/// RTB speed as a fraction of max speed.
pub const RTB_SPEED_FRACTION: f64 = 0.8;

// --- Evasion ---

pub const EVASION_COOLDOWN_SECS: f64 = 10.0;
pub const EVASION_DISTANCE_M: f64 = 5_000.0;
