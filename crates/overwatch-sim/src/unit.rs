//! Read-only entity views and small write helpers.
//!
//! Systems that touch more than one entity at a time read `Unit` copies
//! first, decide, then write back one entity at a time. This keeps hecs
//! borrows short and makes the order of effects explicit.

use hecs::{Component, Entity, World};

use overwatch_core::components::*;
use overwatch_core::enums::*;
use overwatch_core::platform::{BaseSpec, MovementSpec, WeaponSpec};
use overwatch_core::types::{EntityId, GeoPosition, TaskId};

use crate::index::EntityIndex;

/// Snapshot of the fields systems decide on.
#[derive(Debug, Clone)]
pub struct Unit {
    pub handle: Entity,
    pub id: EntityId,
    pub platform_id: String,
    pub faction: Faction,
    pub tag: Option<String>,
    pub position: GeoPosition,
    pub heading: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub destination: Option<GeoPosition>,
    pub state: EntityState,
    pub health: f64,
    pub flight: FlightState,
    pub home_base: Option<EntityId>,
    pub radar_mode: RadarMode,
    pub rcs: f64,
    pub is_detected: bool,
    pub target: Option<EntityId>,
    pub last_fire_time: Option<f64>,
    pub current_task: Option<TaskId>,
    pub sensor: Option<Sensor>,
    pub movement: Option<MovementSpec>,
    pub weapon: Option<WeaponSpec>,
    pub ammo: Option<AmmoState>,
    pub base: Option<BaseSpec>,
}

impl Unit {
    pub fn read(world: &World, handle: Entity) -> Option<Unit> {
        let mut query = world
            .query_one::<(
                &Identity,
                &Kinematics,
                &Vitals,
                &Flight,
                &Signature,
                &Detection,
                &Engagement,
                &Orders,
                Option<&Sensor>,
                Option<&MovementSpec>,
                Option<&WeaponSpec>,
                Option<&AmmoState>,
                Option<&BaseSpec>,
            )>(handle)
            .ok()?;
        let (ident, kin, vitals, flight, sig, det, engagement, orders, sensor, movement, weapon, ammo, base) =
            query.get()?;

        Some(Unit {
            handle,
            id: ident.id.clone(),
            platform_id: ident.platform_id.clone(),
            faction: ident.faction,
            tag: ident.tag.clone(),
            position: kin.position,
            heading: kin.heading,
            speed: kin.velocity.speed,
            max_speed: kin.max_speed,
            destination: kin.destination,
            state: vitals.state,
            health: vitals.health,
            flight: flight.state,
            home_base: flight.home_base.clone(),
            radar_mode: sig.radar_mode,
            rcs: sig.rcs,
            is_detected: det.is_detected,
            target: engagement.target.clone(),
            last_fire_time: engagement.last_fire_time,
            current_task: orders.current.clone(),
            sensor: sensor.copied(),
            movement: movement.copied(),
            weapon: weapon.copied(),
            ammo: ammo.copied(),
            base: base.copied(),
        })
    }

    /// Look an entity up by scenario id.
    pub fn find(world: &World, index: &EntityIndex, id: &EntityId) -> Option<Unit> {
        Unit::read(world, index.get(id)?)
    }

    pub fn is_alive(&self) -> bool {
        self.state != EntityState::Destroyed
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.flight, FlightState::Airborne | FlightState::Launching)
    }

    pub fn cruise_speed(&self) -> f64 {
        self.movement.map_or(0.0, |m| m.cruise_speed)
    }

    pub fn weapon_kind(&self) -> Option<WeaponKind> {
        self.weapon.map(|w| w.kind)
    }

    /// Rounds left, or `None` for an unlimited magazine.
    pub fn ammo_remaining(&self) -> Option<i32> {
        self.ammo.map(|a| a.remaining)
    }

    /// A radar carrier that is radiating: ground radars always are,
    /// anything else only in ACTIVE mode.
    pub fn is_emitting(&self) -> bool {
        let has_radar = matches!(self.sensor, Some(s) if s.kind == SensorKind::Radar);
        has_radar && (self.flight == FlightState::Grounded || self.radar_mode == RadarMode::Active)
    }

    /// Whether the weapon's reload time has passed since the last shot.
    pub fn is_reloaded(&self, now: f64) -> bool {
        match (self.weapon, self.last_fire_time) {
            (Some(w), Some(t)) => now - t >= w.reload_time,
            _ => true,
        }
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo_remaining().map_or(true, |n| n > 0)
    }

    pub fn distance_to(&self, pos: &GeoPosition) -> f64 {
        self.position.distance_to(pos)
    }
}

/// Every entity, in spawn order.
pub fn read_all(world: &World, index: &EntityIndex) -> Vec<Unit> {
    index.handles().filter_map(|h| Unit::read(world, h)).collect()
}

/// Apply `f` to one component of one entity. `None` if it lacks the component.
pub fn update<T: Component, R>(
    world: &mut World,
    handle: Entity,
    f: impl FnOnce(&mut T) -> R,
) -> Option<R> {
    world.query_one_mut::<&mut T>(handle).ok().map(f)
}

/// Send a unit toward `destination` at `speed`, in TRANSIT.
pub fn dispatch(world: &mut World, handle: Entity, destination: GeoPosition, speed: f64) {
    if let Ok((kin, vitals)) = world.query_one_mut::<(&mut Kinematics, &mut Vitals)>(handle) {
        if vitals.is_destroyed() {
            return;
        }
        kin.steer_to(destination, speed);
        vitals.state = EntityState::Transit;
    }
}

/// Point a unit at a target entity.
pub fn engage(world: &mut World, handle: Entity, target: &EntityId) {
    if let Ok((vitals, engagement)) =
        world.query_one_mut::<(&mut Vitals, &mut Engagement)>(handle)
    {
        if vitals.is_destroyed() {
            return;
        }
        vitals.state = EntityState::Attacking;
        engagement.target = Some(target.clone());
    }
}

/// Nearest living base of `faction` to `pos`.
pub fn nearest_base(units: &[Unit], faction: Faction, pos: &GeoPosition) -> Option<Unit> {
    units
        .iter()
        .filter(|u| u.faction == faction && u.base.is_some() && u.is_alive())
        .min_by(|a, b| a.distance_to(pos).total_cmp(&b.distance_to(pos)))
        .cloned()
}

#[cfg(test)]
impl Unit {
    /// Bare ground unit with no capabilities, for system tests.
    pub fn stub(id: &str, faction: Faction, position: GeoPosition) -> Unit {
        Unit {
            handle: Entity::DANGLING,
            id: EntityId::new(id),
            platform_id: "TEST".to_string(),
            faction,
            tag: None,
            position,
            heading: 0.0,
            speed: 0.0,
            max_speed: 0.0,
            destination: None,
            state: EntityState::Idle,
            health: 100.0,
            flight: FlightState::Grounded,
            home_base: None,
            radar_mode: RadarMode::Active,
            rcs: 1.0,
            is_detected: false,
            target: None,
            last_fire_time: None,
            current_task: None,
            sensor: None,
            movement: None,
            weapon: None,
            ammo: None,
            base: None,
        }
    }
}

/// Spawn an entity carrying only the mandatory components and index it.
#[cfg(test)]
pub fn spawn_bare(
    world: &mut World,
    index: &mut EntityIndex,
    id: &str,
    faction: Faction,
    at: GeoPosition,
    flight: FlightState,
) -> Entity {
    let handle = world.spawn((
        Identity {
            id: EntityId::new(id),
            platform_id: "TEST".to_string(),
            faction,
            tag: None,
        },
        Kinematics::at(at, 0.0),
        Vitals {
            state: EntityState::Idle,
            health: 100.0,
            max_health: 100.0,
        },
        Flight {
            state: flight,
            home_base: None,
        },
        Signature {
            radar_mode: RadarMode::Active,
            rcs: 1.0,
        },
        Detection::default(),
        Engagement::default(),
        Orders::default(),
    ));
    index.insert(EntityId::new(id), handle);
    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radar() -> Sensor {
        Sensor {
            kind: SensorKind::Radar,
            range: 50_000.0,
            field_of_view: 360.0,
            current_angle: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn reload_gate() {
        let mut unit = Unit::stub("sam", Faction::Red, GeoPosition::default());
        assert!(unit.is_reloaded(0.0), "unarmed means ready");
        unit.weapon = Some(WeaponSpec {
            kind: WeaponKind::Missile,
            range: 10_000.0,
            damage: 40.0,
            reload_time: 5.0,
            ammo_capacity: -1,
            missile_speed: 800.0,
            standoff_range: None,
        });
        assert!(unit.is_reloaded(0.0), "never fired means ready");
        unit.last_fire_time = Some(10.0);
        assert!(!unit.is_reloaded(14.9));
        assert!(unit.is_reloaded(15.0));
    }

    #[test]
    fn ground_radars_always_emit() {
        let mut unit = Unit::stub("sr", Faction::Red, GeoPosition::default());
        assert!(!unit.is_emitting(), "no radar, no emission");
        unit.sensor = Some(radar());
        unit.radar_mode = RadarMode::Passive;
        assert!(unit.is_emitting());

        unit.flight = FlightState::Airborne;
        assert!(!unit.is_emitting());
        unit.radar_mode = RadarMode::Active;
        assert!(unit.is_emitting());
    }
}
