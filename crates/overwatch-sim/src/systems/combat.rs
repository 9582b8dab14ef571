//! Suicide strikes.
//!
//! An ATTACKING one-way attack carrier flies straight at its target at max
//! speed. Inside weapon range both attacker and target are destroyed in
//! the same pass. Projectile weapons are handled by the missile system.

use std::collections::HashSet;

use hecs::World;

use overwatch_core::components::{Engagement, Kinematics, Vitals};
use overwatch_core::enums::{EntityState, WeaponKind};
use overwatch_core::events::SimEvent;
use overwatch_core::types::{EntityId, Velocity};

use crate::index::EntityIndex;
use crate::unit::{read_all, update, Unit};

fn lose_target(world: &mut World, attacker: &Unit) {
    let cruise = attacker.cruise_speed();
    update::<Engagement, _>(world, attacker.handle, |e| e.target = None);
    update::<Vitals, _>(world, attacker.handle, |v| v.state = EntityState::Idle);
    update::<Kinematics, _>(world, attacker.handle, |k| k.velocity.speed = cruise);
}

pub fn run(world: &mut World, index: &EntityIndex, dt: f64, events: &mut Vec<SimEvent>) {
    let units = read_all(world, index);
    // Targets already destroyed earlier in this pass.
    let mut struck: HashSet<EntityId> = HashSet::new();

    for attacker in &units {
        let Some(weapon) = attacker.weapon.filter(|w| w.kind == WeaponKind::Suicide) else {
            continue;
        };
        if attacker.state != EntityState::Attacking || struck.contains(&attacker.id) {
            continue;
        }

        let target = attacker
            .target
            .as_ref()
            .and_then(|id| units.iter().find(|u| &u.id == id))
            .filter(|t| t.is_alive() && !struck.contains(&t.id));
        let Some(target) = target else {
            lose_target(world, attacker);
            continue;
        };

        let dist = attacker.distance_to(&target.position);
        if dist < weapon.range {
            update::<Vitals, _>(world, attacker.handle, Vitals::destroy);
            update::<Vitals, _>(world, target.handle, Vitals::destroy);
            update::<Engagement, _>(world, attacker.handle, |e| e.target = None);
            update::<Kinematics, _>(world, attacker.handle, |k| {
                k.velocity.speed = 0.0;
                k.destination = None;
            });

            struck.insert(target.id.clone());
            log::info!("{} struck {}", attacker.id, target.id);
            events.push(SimEvent::SuicideStrike {
                attacker: attacker.id.clone(),
                target: target.id.clone(),
            });
            for id in [&attacker.id, &target.id] {
                events.push(SimEvent::EntityDestroyed { entity_id: id.clone() });
            }
            continue;
        }

        let heading = attacker.position.bearing_to(&target.position);
        let speed = attacker.max_speed;
        update::<Kinematics, _>(world, attacker.handle, |k| {
            k.position = k.position.moved(heading, (speed * dt).min(dist));
            k.heading = heading;
            k.velocity = Velocity { heading, speed };
        });
    }
}
