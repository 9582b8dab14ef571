//! Completion conditions.

use overwatch_core::constants::MOVE_TO_ARRIVAL_M;
use overwatch_core::enums::{EntityState, FormationType};
use overwatch_core::task::{CompletionCondition, Task, TaskKind};

use crate::systems::contacts::ContactPicture;
use crate::unit::Unit;

/// How close to a MOVE_TO destination counts as arrived. A formation slot
/// can sit up to `spacing × count` from the destination.
pub fn arrival_radius(task: &Task) -> f64 {
    if task.params.formation == FormationType::None {
        MOVE_TO_ARRIVAL_M
    } else {
        MOVE_TO_ARRIVAL_M + task.params.spacing * task.assigned_ids.len() as f64
    }
}

pub fn is_satisfied(task: &Task, units: &[Unit], contacts: &ContactPicture, now: f64) -> bool {
    let alive: Vec<&Unit> = task
        .assigned_ids
        .iter()
        .filter_map(|id| units.iter().find(|u| &u.id == id))
        .filter(|u| u.is_alive())
        .collect();

    match &task.completion {
        CompletionCondition::Arrival => {
            if alive.is_empty() {
                return false;
            }
            match &task.kind {
                TaskKind::MoveTo { destination } => {
                    let radius = arrival_radius(task);
                    alive.iter().all(|u| u.distance_to(destination) < radius)
                }
                _ => alive.iter().all(|u| u.state == EntityState::Idle),
            }
        }
        CompletionCondition::FlightState { target } => {
            !alive.is_empty() && alive.iter().all(|u| u.flight == *target)
        }
        CompletionCondition::Duration { seconds } => {
            task.activated_at.is_some_and(|t| now - t >= *seconds)
        }
        CompletionCondition::OnDetect { count } => {
            contacts.live_count() >= count.unwrap_or(1) as usize
        }
        CompletionCondition::AllEngaged => alive.iter().all(|u| {
            let spent = u.ammo.is_some_and(|a| a.capacity > 0 && a.remaining <= 0);
            u.state == EntityState::Attacking || spent
        }),
        CompletionCondition::TargetDestroyed { entity_id } => units
            .iter()
            .find(|u| &u.id == entity_id)
            .map_or(true, |u| !u.is_alive()),
    }
}
