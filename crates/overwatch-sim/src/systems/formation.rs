//! Active formation keeping.
//!
//! For each ACTIVE multi-entity task flown in formation, the participant
//! with the longest sensor leads. The group flies at the speed of its
//! slowest member; wingmen steer toward their V slot behind the lead.

use std::collections::HashSet;

use hecs::World;

use overwatch_core::components::Kinematics;
use overwatch_core::constants::*;
use overwatch_core::enums::{EntityState, FormationType, TaskStatus};
use overwatch_core::geo;
use overwatch_core::task::TaskBoard;
use overwatch_core::types::{EntityId, Velocity};

use crate::formations::wingman_slot;
use crate::index::EntityIndex;
use crate::systems::tasks::participants;
use crate::unit::{read_all, update, Unit};

/// Longest sensor range wins; ties go to the first listed.
fn pick_lead<'a>(members: &[&'a Unit]) -> Option<&'a Unit> {
    let range = |u: &Unit| u.sensor.map_or(0.0, |s| s.range);
    members
        .iter()
        .copied()
        .fold(None, |best: Option<&Unit>, u| match best {
            Some(b) if range(b) >= range(u) => Some(b),
            _ => Some(u),
        })
}

/// Slowest member's max speed scaled by the task's speed fraction.
pub fn formation_speed(members: &[&Unit], speed_fraction: f64) -> Option<f64> {
    members
        .iter()
        .map(|u| u.max_speed)
        .min_by(f64::total_cmp)
        .map(|s| s * speed_fraction)
}

pub fn run(world: &mut World, index: &EntityIndex, board: &TaskBoard) {
    let units = read_all(world, index);
    let mut placed: HashSet<EntityId> = HashSet::new();

    for task in board.iter() {
        if task.status != TaskStatus::Active
            || task.assigned_ids.len() <= 1
            || task.params.formation == FormationType::None
        {
            continue;
        }

        let members = participants(&units, task);
        let Some(lead) = pick_lead(&members) else {
            continue;
        };
        if lead.state != EntityState::Transit {
            continue;
        }
        let Some(speed) = formation_speed(&members, task.params.speed_fraction) else {
            continue;
        };
        placed.insert(lead.id.clone());

        if lead.speed > speed * FORMATION_LEAD_SPEED_MARGIN {
            update::<Kinematics, _>(world, lead.handle, |k| k.velocity.speed = speed);
        }

        let spacing = task.params.spacing;
        let wingmen = members.iter().filter(|u| u.id != lead.id);
        let mut slot = 0;
        for wingman in wingmen {
            if wingman.state == EntityState::Attacking || !placed.insert(wingman.id.clone()) {
                continue;
            }
            let target = wingman_slot(lead.position, lead.heading, slot, spacing);
            slot += 1;

            if wingman.distance_to(&target) < FORMATION_TOLERANCE_M {
                continue;
            }

            let to_slot = wingman.position.bearing_to(&target);
            let current = wingman.heading;
            let heading =
                geo::normalize_heading(current + geo::shortest_turn(current, to_slot) * FORMATION_HEADING_BLEND);

            let gap = wingman.distance_to(&lead.position);
            let factor = if gap > spacing * 1.2 {
                FORMATION_CATCH_UP
            } else if gap < spacing * 0.8 {
                FORMATION_FALL_BACK
            } else {
                1.0
            };
            let wing_speed = (speed * factor).min(wingman.max_speed).max(0.0);

            update::<Kinematics, _>(world, wingman.handle, |k| {
                k.heading = heading;
                k.velocity = Velocity {
                    heading,
                    speed: wing_speed,
                };
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::Entity;
    use overwatch_core::components::{Orders, Sensor, Vitals};
    use overwatch_core::enums::{Faction, FlightState, SensorKind};
    use overwatch_core::task::{CompletionCondition, Task, TaskKind, TaskParams};
    use overwatch_core::types::{GeoPosition, TaskId};

    use crate::unit::spawn_bare;

    const LEAD_POS: GeoPosition = GeoPosition { lat: 30.0, lon: 50.0 };
    const SPACING: f64 = 1000.0;

    fn member(
        world: &mut World,
        index: &mut EntityIndex,
        id: &str,
        at: GeoPosition,
        speed: f64,
        state: EntityState,
    ) -> Entity {
        let handle = spawn_bare(world, index, id, Faction::Blue, at, FlightState::Airborne);
        update::<Kinematics, _>(world, handle, |k| {
            k.max_speed = 200.0;
            k.velocity.speed = speed;
        });
        update::<Vitals, _>(world, handle, |v| v.state = state);
        update::<Orders, _>(world, handle, |o| o.current = Some(TaskId::new("cap")));
        handle
    }

    fn board(ids: &[&str]) -> TaskBoard {
        let task = Task::new(
            "cap",
            ids.iter().map(|id| EntityId::new(*id)).collect(),
            TaskKind::Orbit {
                center: LEAD_POS,
                radius: 20_000.0,
            },
            CompletionCondition::Duration { seconds: 600.0 },
        )
        .with_params(TaskParams {
            formation: FormationType::Wedge,
            spacing: SPACING,
            speed_fraction: 0.5,
            ..TaskParams::default()
        });
        let mut board = TaskBoard::new();
        board.insert(task);
        board.transition(&TaskId::new("cap"), TaskStatus::Active, 0.0);
        board
    }

    fn speed(world: &World, handle: Entity) -> f64 {
        world.get::<&Kinematics>(handle).unwrap().velocity.speed
    }

    fn with_radar(world: &mut World, handle: Entity) {
        let sensor = Sensor {
            kind: SensorKind::Radar,
            range: 100_000.0,
            field_of_view: 360.0,
            current_angle: 0.0,
            rotation_speed: 0.0,
        };
        world.insert_one(handle, sensor).unwrap();
    }

    #[test]
    fn wingmen_close_up_or_ease_off_around_the_spacing_band() {
        let mut world = World::new();
        let mut index = EntityIndex::new();

        let lead = member(&mut world, &mut index, "lead", LEAD_POS, 200.0, EntityState::Transit);
        with_radar(&mut world, lead);
        let far = member(
            &mut world,
            &mut index,
            "far",
            LEAD_POS.moved(180.0, 5000.0),
            42.0,
            EntityState::Transit,
        );
        let busy = member(
            &mut world,
            &mut index,
            "busy",
            LEAD_POS.moved(180.0, 9000.0),
            42.0,
            EntityState::Attacking,
        );
        let close = member(
            &mut world,
            &mut index,
            "close",
            LEAD_POS.moved(90.0, 500.0),
            42.0,
            EntityState::Transit,
        );
        // The attacking wingman takes no slot, so this one holds slot 2.
        let on_slot = member(
            &mut world,
            &mut index,
            "on-slot",
            wingman_slot(LEAD_POS, 0.0, 2, SPACING),
            42.0,
            EntityState::Transit,
        );

        let board = board(&["lead", "far", "busy", "close", "on-slot"]);
        run(&mut world, &index, &board);

        // Slowest max speed 200 at half throttle.
        assert_eq!(speed(&world, lead), 100.0);
        assert!((speed(&world, far) - 115.0).abs() < 1e-9);
        assert!((speed(&world, close) - 85.0).abs() < 1e-9);
        assert_eq!(speed(&world, on_slot), 42.0);
        assert_eq!(speed(&world, busy), 42.0);
    }

    #[test]
    fn lead_within_margin_keeps_its_speed() {
        let mut world = World::new();
        let mut index = EntityIndex::new();

        let lead = member(&mut world, &mut index, "lead", LEAD_POS, 105.0, EntityState::Transit);
        with_radar(&mut world, lead);
        let wing = member(
            &mut world,
            &mut index,
            "far",
            LEAD_POS.moved(180.0, 1000.0),
            100.0,
            EntityState::Transit,
        );

        run(&mut world, &index, &board(&["lead", "far"]));
        assert_eq!(speed(&world, lead), 105.0);
        // 1 km back sits inside the band: formation speed unscaled.
        assert_eq!(speed(&world, wing), 100.0);
    }
}
