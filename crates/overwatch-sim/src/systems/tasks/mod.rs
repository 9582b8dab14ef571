//! Task executor.
//!
//! Runs last in the tick so it reacts to this tick's final positions and
//! health. Each entity first drops a finished task and pops its next one;
//! then every ACTIVE task executes exactly once, however many entities
//! share it, and its completion condition is evaluated.

pub mod completion;
pub mod evasion;
pub mod orders;
pub mod recovery;
pub mod roe;
pub mod strike;

use std::collections::{HashMap, HashSet};

use hecs::World;

use overwatch_core::components::{Flight, Orders, Signature, Vitals};
use overwatch_core::enums::{FlightState, TaskStatus};
use overwatch_core::events::SimEvent;
use overwatch_core::runway::RunwayTable;
use overwatch_core::task::{Task, TaskBoard, TaskKind};
use overwatch_core::types::{EntityId, TaskId};

use crate::index::EntityIndex;
use crate::systems::contacts::ContactPicture;
use crate::systems::missiles::MissileSet;
use crate::systems::runway_ops::RunwayOps;
use crate::unit::{read_all, update, Unit};

/// Ids for tasks the simulation creates on its own.
#[derive(Debug, Default)]
pub struct AutoTaskIds {
    seq: u32,
}

impl AutoTaskIds {
    /// `auto-{label}-{entity}-{n}`, unique for the lifetime of the engine.
    pub fn next(&mut self, label: &str, entity: &EntityId) -> String {
        self.seq += 1;
        format!("auto-{label}-{entity}-{}", self.seq)
    }
}

/// Executor memory that outlives a tick.
#[derive(Debug, Default)]
pub struct ExecutorState {
    /// Entities that already received a post-mission RTB.
    auto_rtb_done: HashSet<EntityId>,
    last_evasion: HashMap<EntityId, f64>,
}

impl ExecutorState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Everything a task behaviour may read or change.
pub struct TaskContext<'a> {
    pub world: &'a mut World,
    pub index: &'a EntityIndex,
    pub board: &'a mut TaskBoard,
    pub contacts: &'a ContactPicture,
    pub missiles: &'a mut MissileSet,
    pub runway_ops: &'a mut RunwayOps,
    pub runways: &'a RunwayTable,
    pub ids: &'a mut AutoTaskIds,
    pub now: f64,
    pub events: &'a mut Vec<SimEvent>,
}

impl TaskContext<'_> {
    pub fn units(&self) -> Vec<Unit> {
        read_all(self.world, self.index)
    }
}

/// Living assignees currently working on `task`, in assignment order.
pub fn participants<'a>(units: &'a [Unit], task: &Task) -> Vec<&'a Unit> {
    task.assigned_ids
        .iter()
        .filter_map(|id| units.iter().find(|u| &u.id == id))
        .filter(|u| u.is_alive() && u.current_task.as_ref() == Some(&task.id))
        .collect()
}

/// Position of `id` in the task's assignment list, used for slot geometry.
pub fn slot_of(task: &Task, id: &EntityId) -> usize {
    task.assigned_ids.iter().position(|a| a == id).unwrap_or(0)
}

/// Put a task on the board and append it to each assignee's queue.
/// Returns `false` if the id is already taken.
pub fn submit_task(
    world: &mut World,
    index: &EntityIndex,
    board: &mut TaskBoard,
    mut task: Task,
    now: f64,
) -> bool {
    task.created_at = now;
    let (id, assigned) = (task.id.clone(), task.assigned_ids.clone());
    if !board.insert(task) {
        log::warn!("task {id} already exists, ignoring");
        return false;
    }

    for entity in &assigned {
        let queued = index
            .get(entity)
            .and_then(|h| update::<Orders, _>(world, h, |o| o.queue.push_back(id.clone())));
        if queued.is_none() {
            log::warn!("task {id}: unknown assignee {entity}");
        }
    }
    log::debug!("task {id} queued for {} entities", assigned.len());
    true
}

fn activate(board: &mut TaskBoard, id: &TaskId, now: f64, events: &mut Vec<SimEvent>) {
    if board.transition(id, TaskStatus::Active, now) {
        log::debug!("task {id} active");
        events.push(SimEvent::TaskActivated { task_id: id.clone() });
    }
}

/// Drop finished current tasks and pop the next live one off each queue.
fn advance_orders(ctx: &mut TaskContext) {
    for handle in ctx.index.handles() {
        let Ok((vitals, flight, orders)) =
            ctx.world.query_one_mut::<(&Vitals, &Flight, &mut Orders)>(handle)
        else {
            continue;
        };
        if vitals.is_destroyed() || (flight.state == FlightState::Parked && orders.is_empty()) {
            continue;
        }

        let finished = orders
            .current
            .as_ref()
            .is_some_and(|id| ctx.board.status(id).map_or(true, TaskStatus::is_terminal));
        if finished {
            orders.current = None;
        }
        if orders.current.is_some() {
            continue;
        }

        // Finished or unknown ids are never re-entered.
        while let Some(next) = orders.queue.pop_front() {
            if ctx.board.status(&next).is_some_and(|s| !s.is_terminal()) {
                activate(ctx.board, &next, ctx.now, ctx.events);
                orders.current = Some(next);
                break;
            }
        }
    }
}

fn sync_radar(ctx: &mut TaskContext, task: &Task) {
    let units = ctx.units();
    for unit in participants(&units, task) {
        if unit.radar_mode != task.params.radar_mode {
            update::<Signature, _>(ctx.world, unit.handle, |s| {
                s.radar_mode = task.params.radar_mode;
            });
        }
    }
}

fn execute(ctx: &mut TaskContext, task: &Task) {
    match &task.kind {
        TaskKind::MoveTo { destination } => orders::move_to(ctx, task, *destination),
        TaskKind::ReconArea { area } => orders::recon_area(ctx, task, area),
        TaskKind::Patrol { area } => orders::patrol(ctx, task, area),
        TaskKind::Orbit { center, radius } => orders::orbit(ctx, task, *center, *radius),
        TaskKind::StrikeOnDetect { watch_area } => {
            strike::strike_on_detect(ctx, task, watch_area.as_ref())
        }
        TaskKind::StrikeTarget { contact_id } => strike::strike_target(ctx, task, *contact_id),
        TaskKind::FireCruiseMissile {
            target_contact_id,
            standoff_position,
            ..
        } => strike::fire_cruise_missile(ctx, task, *target_contact_id, *standoff_position),
        TaskKind::FireArm {
            target_entity_id,
            approach_position,
            ..
        } => strike::fire_arm(ctx, task, target_entity_id, *approach_position),
        TaskKind::Takeoff { base_id } => recovery::takeoff(ctx, task, base_id),
        TaskKind::Land { base_id } => recovery::land(ctx, task, base_id),
        TaskKind::Rtb { base_id } => recovery::rtb(ctx, task, base_id.as_ref()),
        TaskKind::Rearm { base_id } => recovery::rearm(ctx, task, base_id),
    }
}

/// Completion first, so a destroyed target or exhausted strike still
/// counts as success when every assignee is gone.
fn resolve(ctx: &mut TaskContext, task: &Task) {
    let units = ctx.units();
    let next = if completion::is_satisfied(task, &units, ctx.contacts, ctx.now) {
        TaskStatus::Complete
    } else if task.assigned_ids.iter().all(|id| {
        units
            .iter()
            .find(|u| &u.id == id)
            .map_or(true, |u| !u.is_alive())
    }) {
        TaskStatus::Failed
    } else {
        return;
    };

    if !ctx.board.transition(&task.id, next, ctx.now) {
        return;
    }
    let task_id = task.id.clone();
    match next {
        TaskStatus::Complete => {
            log::info!("task {task_id} ({}) complete", task.kind.name());
            ctx.events.push(SimEvent::TaskCompleted { task_id });
        }
        _ => {
            log::info!("task {task_id} ({}) failed", task.kind.name());
            ctx.events.push(SimEvent::TaskFailed { task_id });
        }
    }
}

pub fn run(ctx: &mut TaskContext, state: &mut ExecutorState) {
    evasion::run(ctx.world, ctx.index, &mut state.last_evasion, ctx.now);

    advance_orders(ctx);

    let mut executed: HashSet<TaskId> = HashSet::new();
    let current: Vec<TaskId> = ctx
        .units()
        .into_iter()
        .filter_map(|u| u.current_task)
        .collect();
    for id in current {
        if !executed.insert(id.clone()) {
            continue;
        }
        let Some(task) = ctx.board.get(&id).filter(|t| t.status == TaskStatus::Active).cloned()
        else {
            continue;
        };

        sync_radar(ctx, &task);
        execute(ctx, &task);
        resolve(ctx, &task);
    }

    recovery::auto_rtb(ctx, &mut state.auto_rtb_done);
}
