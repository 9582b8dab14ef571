//! Missile system: SAM auto-launch, task-driven cruise missile and ARM
//! launches, and per-tick flight with guidance and hit resolution.
//!
//! Missiles are not ECS entities. They live in a [`MissileSet`] owned by
//! the engine and refer to their targets by id.

use std::collections::HashMap;

use hecs::{Entity, World};

use overwatch_core::components::{AmmoState, Engagement, Vitals};
use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, GuidanceType, WeaponKind};
use overwatch_core::events::SimEvent;
use overwatch_core::state::{Contact, Missile};
use overwatch_core::types::{ContactId, EntityId, GeoPosition, MissileId};

use crate::index::EntityIndex;
use crate::systems::contacts::ContactPicture;
use crate::unit::{read_all, update, Unit};

/// Every missile in flight.
#[derive(Debug, Default)]
pub struct MissileSet {
    missiles: Vec<Missile>,
    last_id: u32,
}

impl MissileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Missile> {
        self.missiles.iter()
    }

    pub fn len(&self) -> usize {
        self.missiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missiles.is_empty()
    }

    /// Missiles currently flying at `target`.
    pub fn inbound_to(&self, target: &EntityId) -> usize {
        self.missiles
            .iter()
            .filter(|m| &m.target_entity == target)
            .count()
    }

    /// Whether `launcher` already has a missile in flight at `target`.
    pub fn is_tracking(&self, launcher: &EntityId, target: &EntityId) -> bool {
        self.missiles
            .iter()
            .any(|m| &m.launched_by == launcher && &m.target_entity == target)
    }

    fn next_id(&mut self) -> MissileId {
        self.last_id += 1;
        MissileId(self.last_id)
    }
}

/// Aim point handed to [`fire`].
struct FireSolution {
    target_entity: EntityId,
    target_contact: Option<ContactId>,
    target_pos: GeoPosition,
}

/// Spend a round, stamp the reload timer and put a missile in the air.
/// The shooter must have been checked for ammo and reload already.
fn fire(
    world: &mut World,
    missiles: &mut MissileSet,
    shooter: &Unit,
    guidance: GuidanceType,
    solution: FireSolution,
    now: f64,
    events: &mut Vec<SimEvent>,
) -> Option<MissileId> {
    let weapon = shooter.weapon?;

    update::<AmmoState, _>(world, shooter.handle, |ammo| {
        ammo.remaining = (ammo.remaining - 1).max(0);
    });
    update::<Engagement, _>(world, shooter.handle, |eng| {
        eng.last_fire_time = Some(now);
    });

    let id = missiles.next_id();
    missiles.missiles.push(Missile {
        id,
        position: shooter.position,
        heading: shooter.position.bearing_to(&solution.target_pos),
        speed: weapon.missile_speed,
        target_entity: solution.target_entity.clone(),
        target_contact: solution.target_contact,
        launched_by: shooter.id.clone(),
        faction: shooter.faction,
        guidance,
        damage: weapon.damage,
        last_known_target_pos: solution.target_pos,
        emission_lost: false,
    });

    log::debug!(
        "{} launched {id} ({guidance:?}) at {}",
        shooter.id,
        solution.target_entity
    );
    events.push(SimEvent::MissileLaunched {
        missile_id: id,
        launcher: shooter.id.clone(),
        target: solution.target_entity,
        guidance,
    });
    Some(id)
}

/// Fire a lattice-networked cruise missile at a contact.
///
/// Refused unless the shooter carries a cruise missile with rounds left,
/// is reloaded, has the contact within weapon range, and is no closer
/// than half its standoff range.
pub fn launch_cruise_missile(
    world: &mut World,
    missiles: &mut MissileSet,
    shooter: Entity,
    contact: &Contact,
    now: f64,
    events: &mut Vec<SimEvent>,
) -> Option<MissileId> {
    let unit = Unit::read(world, shooter)?;
    let weapon = unit.weapon.filter(|w| w.kind == WeaponKind::CruiseMissile)?;
    if !unit.is_alive() || !unit.has_ammo() || !unit.is_reloaded(now) {
        return None;
    }

    let dist = unit.distance_to(&contact.position);
    if dist > weapon.range {
        return None;
    }
    if dist < weapon.standoff_range.unwrap_or(0.0) * MIN_STANDOFF_FRACTION {
        return None;
    }

    fire(
        world,
        missiles,
        &unit,
        GuidanceType::LatticeNetworked,
        FireSolution {
            target_entity: contact.entity_id.clone(),
            target_contact: Some(contact.id),
            target_pos: contact.position,
        },
        now,
        events,
    )
}

/// Fire an anti-radiation missile at an emitter.
pub fn launch_arm(
    world: &mut World,
    missiles: &mut MissileSet,
    shooter: Entity,
    target: &EntityId,
    target_pos: GeoPosition,
    now: f64,
    events: &mut Vec<SimEvent>,
) -> Option<MissileId> {
    let unit = Unit::read(world, shooter)?;
    let weapon = unit.weapon.filter(|w| w.kind == WeaponKind::AntiRadiation)?;
    if !unit.is_alive() || !unit.has_ammo() || !unit.is_reloaded(now) {
        return None;
    }
    if unit.distance_to(&target_pos) > weapon.range {
        return None;
    }

    fire(
        world,
        missiles,
        &unit,
        GuidanceType::EmissionHoming,
        FireSolution {
            target_entity: target.clone(),
            target_contact: None,
            target_pos,
        },
        now,
        events,
    )
}

/// SAM auto-launch: every MISSILE carrier engages the nearest detected,
/// airborne enemy inside weapon range.
pub fn run_launch(
    world: &mut World,
    index: &EntityIndex,
    missiles: &mut MissileSet,
    now: f64,
    events: &mut Vec<SimEvent>,
) {
    let units = read_all(world, index);

    for sam in &units {
        let Some(weapon) = sam.weapon.filter(|w| w.kind == WeaponKind::Missile) else {
            continue;
        };
        if !sam.is_alive() {
            continue;
        }

        let target = units
            .iter()
            .filter(|t| {
                t.faction != sam.faction && t.is_alive() && t.is_detected && t.is_airborne()
            })
            .map(|t| (t, sam.distance_to(&t.position)))
            .filter(|(_, d)| *d <= weapon.range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, _)| t);
        let Some(target) = target else {
            continue;
        };

        if !sam.is_reloaded(now) || !sam.has_ammo() {
            continue;
        }
        if missiles.is_tracking(&sam.id, &target.id) {
            continue;
        }

        fire(
            world,
            missiles,
            sam,
            GuidanceType::FireForget,
            FireSolution {
                target_entity: target.id.clone(),
                target_contact: None,
                target_pos: target.position,
            },
            now,
            events,
        );
    }
}

/// Where a missile steers this tick.
///
/// An emission-homing missile latches onto the last emission point the
/// first tick its target goes quiet and never reacquires.
fn guidance_target(
    missile: &mut Missile,
    units: &HashMap<EntityId, Unit>,
    contacts: &ContactPicture,
) -> GeoPosition {
    let live_target = units.get(&missile.target_entity).filter(|u| u.is_alive());

    match missile.guidance {
        GuidanceType::FireForget => live_target.map(|u| u.position),
        // Any friendly sensor keeping the contact fresh updates the aim
        // point. A stale contact still holds its last position.
        GuidanceType::LatticeNetworked => missile
            .target_contact
            .and_then(|id| contacts.get(id))
            .map(|c| c.position)
            .or_else(|| live_target.map(|u| u.position)),
        GuidanceType::EmissionHoming => {
            if missile.emission_lost {
                None
            } else {
                let emitter = live_target.filter(|u| u.is_emitting()).map(|u| u.position);
                missile.emission_lost = emitter.is_none();
                emitter
            }
        }
    }
    .unwrap_or(missile.last_known_target_pos)
}

/// Entity damaged by a missile detonating at `aim`.
fn hit_entity<'a>(
    missile: &Missile,
    aim: &GeoPosition,
    units: &'a HashMap<EntityId, Unit>,
    order: &[EntityId],
) -> Option<&'a Unit> {
    let direct = units
        .get(&missile.target_entity)
        .filter(|u| u.is_alive() && u.distance_to(aim) < DIRECT_HIT_TOLERANCE_M);
    if direct.is_some() {
        return direct;
    }

    if missile.guidance != GuidanceType::LatticeNetworked {
        return None;
    }

    // The contact may have drifted off the entity: take the nearest
    // opponent inside the splash radius instead.
    order
        .iter()
        .filter_map(|id| units.get(id))
        .filter(|u| u.faction != missile.faction && u.is_alive())
        .map(|u| (u, u.distance_to(&missile.position)))
        .filter(|(_, d)| *d < LATTICE_SPLASH_RADIUS_M)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(u, _)| u)
}

/// Fly every missile one step and resolve detonations.
pub fn run_flight(
    world: &mut World,
    index: &EntityIndex,
    missiles: &mut MissileSet,
    contacts: &ContactPicture,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let snapshot = read_all(world, index);
    let order: Vec<EntityId> = snapshot.iter().map(|u| u.id.clone()).collect();
    let mut units: HashMap<EntityId, Unit> =
        snapshot.into_iter().map(|u| (u.id.clone(), u)).collect();

    let mut surviving = Vec::with_capacity(missiles.missiles.len());

    for mut missile in std::mem::take(&mut missiles.missiles) {
        let aim = guidance_target(&mut missile, &units, contacts);
        let dist = missile.position.distance_to(&aim);
        let step = missile.speed * dt;

        // Reaching the aim point within this step counts as arrival.
        if dist < MISSILE_HIT_RADIUS_M || step >= dist {
            missile.position = aim;
            let hit = hit_entity(&missile, &aim, &units, &order).map(|u| (u.id.clone(), u.handle));
            match hit {
                Some((target_id, handle)) => {
                    let destroyed = update::<Vitals, _>(world, handle, |v| {
                        v.apply_damage(missile.damage);
                        v.is_destroyed()
                    })
                    .unwrap_or(false);
                    if let Some(u) = units.get_mut(&target_id) {
                        u.health = (u.health - missile.damage).max(0.0);
                        if destroyed {
                            u.state = EntityState::Destroyed;
                        }
                    }
                    events.push(SimEvent::MissileImpact {
                        missile_id: missile.id,
                        target: target_id.clone(),
                    });
                    if destroyed {
                        log::info!("{} destroyed by {}", target_id, missile.id);
                        events.push(SimEvent::EntityDestroyed {
                            entity_id: target_id,
                        });
                    }
                }
                None => events.push(SimEvent::MissileLost {
                    missile_id: missile.id,
                }),
            }
            continue;
        }

        let heading = missile.position.bearing_to(&aim);
        missile.position = missile.position.moved(heading, step);
        missile.heading = heading;
        missile.last_known_target_pos = aim;
        surviving.push(missile);
    }

    missiles.missiles = surviving;
}

#[cfg(test)]
mod tests {
    use super::*;
    use overwatch_core::components::*;
    use overwatch_core::enums::{Faction, FlightState, RadarMode, SensorKind};
    use overwatch_core::platform::WeaponSpec;

    use crate::unit::spawn_bare;

    const SITE: GeoPosition = GeoPosition { lat: 30.0, lon: 50.0 };

    fn missile(guidance: GuidanceType, target: &str, at: GeoPosition) -> Missile {
        Missile {
            id: MissileId(1),
            position: at,
            heading: 0.0,
            speed: 1000.0,
            target_entity: EntityId::new(target),
            target_contact: None,
            launched_by: EntityId::new("sam-1"),
            faction: Faction::Red,
            guidance,
            damage: 50.0,
            last_known_target_pos: at.moved(90.0, 10_000.0),
            emission_lost: false,
        }
    }

    fn by_id(units: Vec<Unit>) -> HashMap<EntityId, Unit> {
        units.into_iter().map(|u| (u.id.clone(), u)).collect()
    }

    fn airborne_radar(id: &str, mode: RadarMode) -> Unit {
        let mut unit = Unit::stub(id, Faction::Red, SITE);
        unit.flight = FlightState::Airborne;
        unit.radar_mode = mode;
        unit.sensor = Some(Sensor {
            kind: SensorKind::Radar,
            range: 100_000.0,
            field_of_view: 360.0,
            current_angle: 0.0,
            rotation_speed: 0.0,
        });
        unit
    }

    fn contact(id: u32, entity: &str, position: GeoPosition, live: bool) -> Contact {
        Contact {
            id: ContactId(id),
            entity_id: EntityId::new(entity),
            position,
            platform_id: "COMMAND_POST".into(),
            faction: Faction::Red,
            is_live: live,
            first_detected: 0.0,
            last_seen: 0.0,
        }
    }

    fn spawn(world: &mut World, index: &mut EntityIndex, id: &str, faction: Faction, at: GeoPosition) -> Entity {
        spawn_bare(world, index, id, faction, at, FlightState::Grounded)
    }

    fn arm_carrier(world: &mut World, index: &mut EntityIndex, at: GeoPosition) -> Entity {
        let handle = spawn(world, index, "growler", Faction::Blue, at);
        let weapon = WeaponSpec {
            kind: WeaponKind::AntiRadiation,
            range: 60_000.0,
            damage: 80.0,
            reload_time: 10.0,
            ammo_capacity: 2,
            missile_speed: 600.0,
            standoff_range: None,
        };
        world
            .insert(handle, (weapon, AmmoState { remaining: 2, capacity: 2 }))
            .expect("carrier exists");
        handle
    }

    #[test]
    fn missing_target_falls_back_to_last_known() {
        let mut m = missile(GuidanceType::FireForget, "ghost", GeoPosition::new(20.0, 50.0));
        let aim = guidance_target(&mut m, &HashMap::new(), &ContactPicture::new());
        assert_eq!(aim, m.last_known_target_pos);
    }

    #[test]
    fn arm_keeps_last_emission_point_after_radar_goes_quiet() {
        let mut m = missile(GuidanceType::EmissionHoming, "awacs", SITE.moved(180.0, 50_000.0));
        m.last_known_target_pos = SITE.moved(180.0, 1_000.0);
        let picture = ContactPicture::new();

        let units = by_id(vec![airborne_radar("awacs", RadarMode::Active)]);
        assert_eq!(guidance_target(&mut m, &units, &picture), SITE);
        assert!(!m.emission_lost);

        let units = by_id(vec![airborne_radar("awacs", RadarMode::Passive)]);
        let quiet = guidance_target(&mut m, &units, &picture);
        assert_eq!(quiet, m.last_known_target_pos);
        assert!(m.emission_lost);

        let units = by_id(vec![airborne_radar("awacs", RadarMode::Active)]);
        assert_eq!(
            guidance_target(&mut m, &units, &picture),
            quiet,
            "no reacquisition once emission stopped"
        );
    }

    #[test]
    fn lattice_follows_contact_then_entity_then_last_known() {
        let mut m = missile(GuidanceType::LatticeNetworked, "cp", SITE.moved(180.0, 50_000.0));
        m.target_contact = Some(ContactId(7));
        let tracked = SITE.moved(0.0, 2_000.0);
        let mut picture = ContactPicture::new();
        picture.insert(contact(7, "cp", tracked, true));
        let units = by_id(vec![Unit::stub("cp", Faction::Red, SITE)]);

        assert_eq!(guidance_target(&mut m, &units, &picture), tracked);

        // A stale contact still holds its last position.
        let mut stale = ContactPicture::new();
        stale.insert(contact(7, "cp", tracked, false));
        assert_eq!(guidance_target(&mut m, &units, &stale), tracked);

        // Expired: fall back to the entity itself.
        let expired = ContactPicture::new();
        assert_eq!(guidance_target(&mut m, &units, &expired), SITE);

        let mut dead = Unit::stub("cp", Faction::Red, SITE);
        dead.state = EntityState::Destroyed;
        let units = by_id(vec![dead]);
        assert_eq!(guidance_target(&mut m, &units, &expired), m.last_known_target_pos);
    }

    #[test]
    fn fire_forget_flies_to_last_known_and_misses_a_dead_target() {
        let mut world = World::new();
        let mut index = EntityIndex::new();
        let target = spawn(&mut world, &mut index, "hawk", Faction::Blue, SITE);
        // A second opponent sitting on the aim point is not re-targeted.
        spawn(&mut world, &mut index, "bystander", Faction::Blue, SITE.moved(90.0, 1_500.0));
        update::<Vitals, _>(&mut world, target, |v| v.destroy());

        let mut set = MissileSet::new();
        let mut m = missile(GuidanceType::FireForget, "hawk", SITE.moved(90.0, 4_000.0));
        m.last_known_target_pos = SITE.moved(90.0, 1_500.0);
        set.missiles.push(m);
        let picture = ContactPicture::new();
        let mut events = Vec::new();

        run_flight(&mut world, &index, &mut set, &picture, 1.0, &mut events);
        assert_eq!(set.len(), 1);
        let m = set.iter().next().expect("still flying");
        assert!((m.position.distance_to(&SITE.moved(90.0, 1_500.0)) - 1_500.0).abs() < 5.0);

        run_flight(&mut world, &index, &mut set, &picture, 1.0, &mut events);
        run_flight(&mut world, &index, &mut set, &picture, 1.0, &mut events);
        assert!(set.is_empty());
        assert_eq!(events, vec![SimEvent::MissileLost { missile_id: MissileId(1) }]);
        let bystander = Unit::find(&world, &index, &EntityId::new("bystander")).expect("spawned");
        assert_eq!(bystander.health, 100.0);
    }

    #[test]
    fn arm_launch_is_gated_by_weapon_range_and_reload() {
        let mut world = World::new();
        let mut index = EntityIndex::new();
        let shooter = arm_carrier(&mut world, &mut index, SITE.moved(180.0, 40_000.0));
        let target = EntityId::new("sr");
        let mut set = MissileSet::new();
        let mut events = Vec::new();

        let far = SITE.moved(180.0, 120_000.0);
        assert!(launch_arm(&mut world, &mut set, shooter, &target, far, 0.0, &mut events).is_none());

        let id = launch_arm(&mut world, &mut set, shooter, &target, SITE, 0.0, &mut events);
        assert_eq!(id, Some(MissileId(1)));
        let fired = set.iter().next().expect("missile in flight");
        assert_eq!(fired.guidance, GuidanceType::EmissionHoming);
        assert_eq!(fired.target_contact, None);
        assert_eq!(world.get::<&AmmoState>(shooter).map(|a| a.remaining).ok(), Some(1));

        assert!(launch_arm(&mut world, &mut set, shooter, &target, SITE, 5.0, &mut events).is_none());
        assert!(launch_arm(&mut world, &mut set, shooter, &target, SITE, 10.0, &mut events).is_some());
        assert!(
            launch_arm(&mut world, &mut set, shooter, &target, SITE, 30.0, &mut events).is_none(),
            "magazine empty"
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn arm_homes_on_a_ground_emitter_and_hits() {
        let mut world = World::new();
        let mut index = EntityIndex::new();
        let shooter = arm_carrier(&mut world, &mut index, SITE.moved(180.0, 3_000.0));
        let radar = spawn(&mut world, &mut index, "sr", Faction::Red, SITE);
        world
            .insert_one(
                radar,
                Sensor {
                    kind: SensorKind::Radar,
                    range: 100_000.0,
                    field_of_view: 360.0,
                    current_angle: 0.0,
                    rotation_speed: 0.0,
                },
            )
            .expect("radar exists");
        let mut set = MissileSet::new();
        let mut events = Vec::new();

        launch_arm(&mut world, &mut set, shooter, &EntityId::new("sr"), SITE, 0.0, &mut events)
            .expect("in range");
        let picture = ContactPicture::new();
        for _ in 0..6 {
            run_flight(&mut world, &index, &mut set, &picture, 1.0, &mut events);
        }

        assert!(set.is_empty());
        assert!(events.contains(&SimEvent::MissileImpact {
            missile_id: MissileId(1),
            target: EntityId::new("sr"),
        }));
        let sr = Unit::find(&world, &index, &EntityId::new("sr")).expect("spawned");
        assert_eq!(sr.health, 20.0);
    }

    #[test]
    fn tracking_is_per_launcher_and_target() {
        let mut set = MissileSet::new();
        set.missiles
            .push(missile(GuidanceType::FireForget, "b2-1", GeoPosition::default()));
        assert!(set.is_tracking(&EntityId::new("sam-1"), &EntityId::new("b2-1")));
        assert!(!set.is_tracking(&EntityId::new("sam-2"), &EntityId::new("b2-1")));
        assert_eq!(set.inbound_to(&EntityId::new("b2-1")), 1);
    }
}
