//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world and every side table the
//! systems share (contacts, missiles, tasks, runway occupancy). It processes
//! player commands, runs the systems in a fixed order, and produces
//! `GameStateSnapshot`s. Completely headless, so whole missions can be
//! driven from tests.

use std::collections::VecDeque;

use hecs::World;

use overwatch_core::commands::PlayerCommand;
use overwatch_core::constants::{MAX_REAL_DELTA, MAX_TIME_SCALE};
use overwatch_core::enums::MissionResult;
use overwatch_core::error::ContentError;
use overwatch_core::events::SimEvent;
use overwatch_core::platform::PlatformCatalog;
use overwatch_core::scenario::ScenarioDef;
use overwatch_core::state::GameStateSnapshot;
use overwatch_core::task::TaskBoard;
use overwatch_core::types::{EntityId, SimClock};

use crate::index::EntityIndex;
use crate::platforms::builtin_catalog;
use crate::scenario;
use crate::systems;
use crate::systems::contacts::ContactPicture;
use crate::systems::missiles::MissileSet;
use crate::systems::runway_ops::RunwayOps;
use crate::systems::tasks::{AutoTaskIds, ExecutorState, TaskContext};
use crate::unit::{read_all, Unit};
use crate::world_setup;

/// Configuration for a new engine.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Initial game seconds per real second.
    pub time_scale: f64,
    /// Longest real frame delta honoured by a single tick.
    pub max_real_delta: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_real_delta: MAX_REAL_DELTA,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    catalog: PlatformCatalog,
    scenario: Option<ScenarioDef>,
    world: World,
    index: EntityIndex,
    clock: SimClock,
    result: MissionResult,
    board: TaskBoard,
    contacts: ContactPicture,
    missiles: MissileSet,
    runway_ops: RunwayOps,
    executor: ExecutorState,
    auto_ids: AutoTaskIds,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create an engine backed by the stock platform catalog.
    pub fn new(config: SimConfig) -> Result<Self, ContentError> {
        Ok(Self::with_catalog(config, builtin_catalog()?))
    }

    /// Create an engine that spawns from `catalog`.
    pub fn with_catalog(config: SimConfig, catalog: PlatformCatalog) -> Self {
        Self {
            config,
            catalog,
            scenario: None,
            world: World::new(),
            index: EntityIndex::new(),
            clock: SimClock::new(config.time_scale, None),
            result: MissionResult::Pending,
            board: TaskBoard::new(),
            contacts: ContactPicture::new(),
            missiles: MissileSet::new(),
            runway_ops: RunwayOps::new(),
            executor: ExecutorState::new(),
            auto_ids: AutoTaskIds::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Load one of the shipped scenarios by id.
    pub fn load_scenario(&mut self, id: &str) -> Result<(), ContentError> {
        self.load_scenario_def(scenario::builtin(id)?)
    }

    /// Discard the running mission and start `def` from time zero.
    pub fn load_scenario_def(&mut self, def: ScenarioDef) -> Result<(), ContentError> {
        self.scenario = None;
        self.world.clear();
        self.index.clear();
        self.board = TaskBoard::new();
        self.contacts = ContactPicture::new();
        self.missiles = MissileSet::new();
        self.runway_ops = RunwayOps::new();
        self.executor = ExecutorState::new();
        self.auto_ids = AutoTaskIds::default();
        self.command_queue.clear();
        self.events.clear();
        self.result = MissionResult::Pending;
        self.clock = SimClock::new(self.config.time_scale, def.duration);

        world_setup::setup_scenario(&mut self.world, &mut self.index, &self.catalog, &def)?;
        self.scenario = Some(def);
        Ok(())
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by one frame of `real_delta` seconds and return the snapshot.
    ///
    /// Commands are always processed. Game time only moves while a scenario
    /// is loaded, the clock is running, and the mission is undecided.
    pub fn tick(&mut self, real_delta: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.scenario.is_some() && self.result == MissionResult::Pending {
            let dt = self.clock.game_delta(real_delta, self.config.max_real_delta);
            if dt > 0.0 {
                self.clock.advance(dt);
                self.run_systems(dt);
                self.check_mission();
            }
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.index,
            &self.clock,
            self.scenario.as_ref(),
            self.result,
            &self.contacts,
            &self.missiles,
            &self.board,
            &self.runway_ops,
            events,
        )
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            match command {
                PlayerCommand::AssignTask { task } => {
                    systems::tasks::submit_task(
                        &mut self.world,
                        &self.index,
                        &mut self.board,
                        task,
                        self.clock.elapsed_secs,
                    );
                }
                PlayerCommand::SetTimeScale { scale } => {
                    self.clock.set_scale(scale.min(MAX_TIME_SCALE));
                    log::debug!("time scale {}", self.clock.scale);
                }
                PlayerCommand::TogglePause => {
                    self.clock.toggle_pause();
                    log::debug!("paused: {}", self.clock.is_paused());
                }
            }
        }
    }

    fn run_systems(&mut self, dt: f64) {
        let Some(scenario) = self.scenario.as_ref() else {
            return;
        };
        let now = self.clock.elapsed_secs;
        let world = &mut self.world;
        let index = &self.index;
        let events = &mut self.events;

        systems::flight_ops::run(
            world,
            index,
            &mut self.runway_ops,
            &scenario.runways,
            now,
            dt,
            events,
        );
        systems::movement::run(world, &self.runway_ops, dt);
        systems::fuel::run(world, dt, events);
        systems::combat::run(world, index, dt, events);
        systems::detection::run(world, index);
        systems::contacts::run(world, index, &mut self.contacts, now, events);
        systems::missiles::run_launch(world, index, &mut self.missiles, now, events);
        systems::formation::run(world, index, &self.board);
        systems::missiles::run_flight(world, index, &mut self.missiles, &self.contacts, dt, events);
        systems::fuel::inject_bingo_rtb(world, index, &mut self.board, &mut self.auto_ids, now, events);

        let mut ctx = TaskContext {
            world,
            index,
            board: &mut self.board,
            contacts: &self.contacts,
            missiles: &mut self.missiles,
            runway_ops: &mut self.runway_ops,
            runways: &scenario.runways,
            ids: &mut self.auto_ids,
            now,
            events,
        };
        systems::tasks::run(&mut ctx, &mut self.executor);
    }

    fn check_mission(&mut self) {
        let Some(scenario) = self.scenario.as_ref() else {
            return;
        };
        let units = read_all(&self.world, &self.index);
        let result = systems::mission::evaluate(&units, scenario, &self.clock);
        if result != MissionResult::Pending {
            log::info!(
                "mission '{}' ended at {:.1}s: {result:?}",
                scenario.id,
                self.clock.elapsed_secs
            );
            self.result = result;
            self.events.push(SimEvent::MissionEnded { result });
        }
    }

    /// Get the mission outcome so far.
    pub fn result(&self) -> MissionResult {
        self.result
    }

    /// Get the simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Get the loaded scenario, if any.
    pub fn scenario(&self) -> Option<&ScenarioDef> {
        self.scenario.as_ref()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn contacts(&self) -> &ContactPicture {
        &self.contacts
    }

    pub fn missiles(&self) -> &MissileSet {
        &self.missiles
    }

    pub fn runway_ops(&self) -> &RunwayOps {
        &self.runway_ops
    }

    /// Snapshot of one entity by id.
    pub fn unit(&self, id: &str) -> Option<Unit> {
        Unit::find(&self.world, &self.index, &EntityId::new(id))
    }

    /// Mutable world access for tests that stage unusual states.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
