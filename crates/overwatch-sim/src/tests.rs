//! Engine-level tests: flight ops, runway exclusion, fuel, detection,
//! weapons and mission outcome, driven through `SimulationEngine::tick`.

use std::collections::HashMap;

use overwatch_core::commands::PlayerCommand;
use overwatch_core::components::Kinematics;
use overwatch_core::enums::*;
use overwatch_core::error::ContentError;
use overwatch_core::events::SimEvent;
use overwatch_core::platform::*;
use overwatch_core::runway::RunwayTable;
use overwatch_core::scenario::{EntitySpawn, ObjectiveDef, ScenarioDef};
use overwatch_core::state::GameStateSnapshot;
use overwatch_core::task::*;
use overwatch_core::types::*;

use crate::engine::{SimConfig, SimulationEngine};
use crate::platforms::builtin_catalog;
use crate::scenario::BUILTIN_SCENARIOS;

/// Real seconds per frame; at 10x this is one game second per tick.
const FRAME: f64 = 0.1;
const ORIGIN: GeoPosition = GeoPosition { lat: 26.0, lon: 56.0 };

// ---- Fixtures ----

fn air(id: &str, health: f64, max_speed: f64) -> PlatformDef {
    PlatformDef {
        id: id.to_string(),
        name: id.to_string(),
        label: String::new(),
        category: PlatformCategory::Air,
        max_health: health,
        rcs: None,
        movement: Some(MovementSpec {
            max_speed,
            cruise_speed: max_speed * 0.75,
            acceleration: 10.0,
        }),
        sensor: None,
        weapon: None,
        fuel: None,
        base: None,
    }
}

fn omni(kind: SensorKind, range: f64) -> SensorSpec {
    SensorSpec {
        kind,
        range,
        field_of_view: 360.0,
        rotation_speed: 0.0,
    }
}

/// Stock platforms plus a few single-purpose airframes.
fn test_catalog() -> PlatformCatalog {
    let mut catalog = builtin_catalog().expect("stock catalog");
    let loiter = PlatformDef {
        sensor: Some(omni(SensorKind::Camera, 20_000.0)),
        weapon: Some(WeaponSpec {
            kind: WeaponKind::Suicide,
            range: 100.0,
            damage: 100.0,
            reload_time: 0.0,
            ammo_capacity: 1,
            missile_speed: 0.0,
            standoff_range: None,
        }),
        ..air("TEST_LOITER", 10.0, 200.0)
    };
    let standoff = PlatformDef {
        sensor: Some(omni(SensorKind::Radar, 100_000.0)),
        weapon: Some(WeaponSpec {
            kind: WeaponKind::CruiseMissile,
            range: 28_000.0,
            damage: 150.0,
            reload_time: 3.0,
            ammo_capacity: 4,
            missile_speed: 250.0,
            standoff_range: Some(20_000.0),
        }),
        ..air("TEST_STANDOFF", 80.0, 300.0)
    };
    let short_legs = PlatformDef {
        fuel: Some(FuelSpec {
            capacity: 100.0,
            burn_rate_cruise: 1.0,
            burn_rate_max: 2.0,
            bingo_percent: 0.5,
        }),
        ..air("TEST_SHORT_LEGS", 20.0, 100.0)
    };
    let spotter = PlatformDef {
        sensor: Some(omni(SensorKind::Camera, 20_000.0)),
        ..air("TEST_SPOTTER", 20.0, 100.0)
    };
    for def in [loiter, standoff, short_legs, spotter] {
        catalog.register(def).expect("unique test platform");
    }
    catalog
}

fn scenario(entities: Vec<EntitySpawn>, objectives: Vec<ObjectiveDef>) -> ScenarioDef {
    ScenarioDef {
        id: "test".to_string(),
        name: "Test".to_string(),
        description: String::new(),
        duration: None,
        entities,
        objectives,
        defeat_condition: DefeatCondition::AllBlueDead,
        runways: RunwayTable::new(),
    }
}

fn destroy(tag: &str) -> ObjectiveDef {
    ObjectiveDef {
        entity_tag: tag.to_string(),
        label: tag.to_string(),
        kind: ObjectiveKind::Destroy,
    }
}

/// Engine at 10x with `def` loaded.
fn engine_with(def: ScenarioDef) -> SimulationEngine {
    let mut engine = SimulationEngine::with_catalog(
        SimConfig {
            time_scale: 10.0,
            ..SimConfig::default()
        },
        test_catalog(),
    );
    engine.load_scenario_def(def).expect("scenario loads");
    engine
}

fn opening_strike() -> SimulationEngine {
    let mut engine = SimulationEngine::with_catalog(
        SimConfig {
            time_scale: 10.0,
            ..SimConfig::default()
        },
        test_catalog(),
    );
    engine.load_scenario("opening-strike").expect("builtin scenario");
    engine
}

fn assign(engine: &mut SimulationEngine, task: Task) {
    engine.queue_command(PlayerCommand::AssignTask { task });
}

fn ids(list: &[&str]) -> Vec<EntityId> {
    list.iter().map(|id| EntityId::new(*id)).collect()
}

fn weapons_free() -> TaskParams {
    TaskParams {
        roe: Roe::WeaponsFree,
        ..TaskParams::default()
    }
}

fn status(engine: &SimulationEngine, id: &str) -> Option<TaskStatus> {
    engine.board().status(&TaskId::new(id))
}

fn tasks_of_kind(engine: &SimulationEngine, name: &str) -> usize {
    engine.board().iter().filter(|t| t.kind.name() == name).count()
}

/// Every task moves forward only, and every current task is on the board
/// with the entity among its assignees.
fn check_task_invariants(snap: &GameStateSnapshot, seen: &mut HashMap<TaskId, TaskStatus>) {
    let rank = |s: TaskStatus| match s {
        TaskStatus::Queued => 0,
        TaskStatus::Active => 1,
        TaskStatus::Complete | TaskStatus::Failed => 2,
    };
    for task in &snap.tasks {
        if let Some(prev) = seen.insert(task.id.clone(), task.status) {
            assert!(rank(task.status) >= rank(prev), "{} regressed", task.id);
            if prev.is_terminal() {
                assert_eq!(prev, task.status, "{} left a terminal state", task.id);
            }
        }
    }
    for entity in &snap.entities {
        if let Some(current) = &entity.current_task {
            let task = snap
                .tasks
                .iter()
                .find(|t| &t.id == current)
                .unwrap_or_else(|| panic!("{} holds unknown task {current}", entity.id));
            assert!(task.assigned_ids.contains(&entity.id));
        }
    }
}

// ---- Loading ----

#[test]
fn test_every_builtin_scenario_loads() {
    let mut engine = SimulationEngine::new(SimConfig::default()).expect("stock catalog");
    for id in BUILTIN_SCENARIOS {
        engine.load_scenario(id).expect("builtin scenario loads");
        let snap = engine.tick(FRAME);
        assert_eq!(snap.scenario.as_deref(), Some(*id));
        assert!(!snap.entities.is_empty());
        assert_eq!(snap.result, MissionResult::Pending);
    }
}

#[test]
fn test_unknown_scenario_is_an_error() {
    let mut engine = SimulationEngine::new(SimConfig::default()).expect("stock catalog");
    let err = engine.load_scenario("gulf-of-nowhere").unwrap_err();
    assert!(matches!(err, ContentError::UnknownScenario(_)));
    assert!(engine.scenario().is_none());
}

#[test]
fn test_unknown_platform_is_an_error() {
    let mut engine = SimulationEngine::new(SimConfig::default()).expect("stock catalog");
    let def = scenario(
        vec![EntitySpawn::new("F35_LIGHTNING", Faction::Blue, ORIGIN)],
        vec![],
    );
    let err = engine.load_scenario_def(def).unwrap_err();
    assert!(matches!(err, ContentError::UnknownPlatform(_)));
}

#[test]
fn test_opening_strike_starts_parked() {
    let mut engine = opening_strike();
    let snap = engine.tick(FRAME);

    assert_eq!(snap.entities.len(), 9);
    for id in ["ghwk-1", "b2-j-2", "b2-m-3"] {
        let unit = engine.unit(id).expect("aircraft spawned");
        assert_eq!(unit.flight, FlightState::Parked);
        assert_eq!(unit.home_base, Some(EntityId::new("outpost-base")));
    }
    assert_eq!(snap.objectives.len(), 4);
    assert!(snap.objectives.iter().all(|o| !o.complete));
    assert!(snap.tasks.is_empty(), "parked aircraft get no automatic tasks");

    let json = serde_json::to_value(&snap).expect("snapshot serializes");
    assert_eq!(json["entities"].as_array().map(Vec::len), Some(9));
}

// ---- Clock ----

#[test]
fn test_pause_and_time_scale() {
    let mut engine = SimulationEngine::new(SimConfig::default()).expect("stock catalog");
    engine.load_scenario("opening-strike").expect("builtin scenario");

    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick(FRAME);
    assert_eq!(snap.time.elapsed_secs, 0.0);
    assert_eq!(snap.time.tick, 0);

    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick(FRAME);
    assert!((snap.time.elapsed_secs - 0.1).abs() < 1e-9);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 1_000.0 });
    let snap = engine.tick(5.0);
    assert_eq!(engine.clock().scale, 120.0);
    // The frame is capped at 0.1 s real time before scaling.
    assert!((snap.time.elapsed_secs - 12.1).abs() < 1e-9);
}

#[test]
fn test_time_limit_ends_in_defeat() {
    let mut def = scenario(
        vec![EntitySpawn::new("TEST_SPOTTER", Faction::Blue, ORIGIN).with_id("spotter")],
        vec![],
    );
    def.duration = Some(5.0);
    def.defeat_condition = DefeatCondition::TimeExpired;
    let mut engine = engine_with(def);

    for _ in 0..4 {
        assert_eq!(engine.tick(FRAME).result, MissionResult::Pending);
    }
    let snap = engine.tick(FRAME);
    assert_eq!(snap.result, MissionResult::Defeat);
    assert!(snap.events.contains(&SimEvent::MissionEnded {
        result: MissionResult::Defeat
    }));

    let snap = engine.tick(FRAME);
    assert_eq!(snap.time.elapsed_secs, 5.0, "clock stops at the duration");
    assert_eq!(snap.time.tick, 5);
}

// ---- Tasks ----

#[test]
fn test_duplicate_task_id_is_ignored() {
    let mut engine = opening_strike();
    let rearm = |entity: &str| {
        Task::new(
            "t-1",
            ids(&[entity]),
            TaskKind::Rearm {
                base_id: EntityId::new("outpost-base"),
            },
            CompletionCondition::Duration { seconds: 1_000.0 },
        )
    };
    assign(&mut engine, rearm("ghwk-1"));
    assign(&mut engine, rearm("b2-j-2"));
    engine.tick(FRAME);

    assert_eq!(engine.board().len(), 1);
    let task = engine.board().get(&TaskId::new("t-1")).expect("first task kept");
    assert_eq!(task.assigned_ids, ids(&["ghwk-1"]));
    assert_eq!(status(&engine, "t-1"), Some(TaskStatus::Active));
    assert_eq!(
        engine.unit("ghwk-1").and_then(|u| u.current_task),
        Some(TaskId::new("t-1"))
    );
    assert_eq!(engine.unit("b2-j-2").and_then(|u| u.current_task), None);
}

#[test]
fn test_idle_aircraft_get_one_automatic_recovery() {
    let def = scenario(
        vec![
            EntitySpawn::new("AIRBASE", Faction::Blue, ORIGIN).with_id("home"),
            EntitySpawn::new("TEST_SPOTTER", Faction::Blue, ORIGIN.moved(0.0, 10_000.0))
                .with_id("spotter"),
        ],
        vec![],
    );
    let mut engine = engine_with(def);
    let mut seen = HashMap::new();

    let snap = engine.tick(FRAME);
    check_task_invariants(&snap, &mut seen);
    assert_eq!(tasks_of_kind(&engine, "RTB"), 1);
    assert_eq!(tasks_of_kind(&engine, "LAND"), 1);
    let rtb = engine
        .board()
        .iter()
        .find(|t| t.kind.name() == "RTB")
        .map(|t| t.id.clone())
        .expect("rtb injected");
    assert_eq!(engine.board().status(&rtb), Some(TaskStatus::Active));
    assert_eq!(engine.unit("spotter").and_then(|u| u.current_task), Some(rtb));

    for _ in 0..400 {
        let snap = engine.tick(FRAME);
        check_task_invariants(&snap, &mut seen);
        assert_eq!(tasks_of_kind(&engine, "RTB"), 1, "auto RTB is issued once");
        if engine.unit("spotter").is_some_and(|u| u.flight == FlightState::Parked) {
            break;
        }
    }

    let spotter = engine.unit("spotter").expect("spotter");
    assert_eq!(spotter.flight, FlightState::Parked);
    assert!(engine
        .board()
        .iter()
        .all(|t| t.status == TaskStatus::Complete));
}

// ---- Flight ops ----

#[test]
fn test_takeoff_roll_rotates_at_seventy_percent() {
    let mut engine = opening_strike();
    assign(
        &mut engine,
        Task::new(
            "launch",
            ids(&["ghwk-1"]),
            TaskKind::Takeoff {
                base_id: EntityId::new("outpost-base"),
            },
            CompletionCondition::FlightState {
                target: FlightState::Airborne,
            },
        ),
    );
    let id = EntityId::new("ghwk-1");
    let mut saw_rotate = false;

    for _ in 0..120 {
        engine.tick(FRAME);
        if let Some(state) = engine.runway_ops().get(&id) {
            let length = state.runway_length_m;
            assert!((length - 3661.0).abs() < 10.0, "13R/31L is about 3661 m");
            match state.phase {
                RunwayPhase::TakeoffRoll => assert!(state.progress_m < length * 0.7),
                RunwayPhase::Rotate => {
                    saw_rotate = true;
                    assert!(state.progress_m >= length * 0.7 && state.progress_m < length);
                }
                RunwayPhase::DepartureClimb => assert!(state.progress_m >= length),
                other => panic!("unexpected phase {other:?} on departure"),
            }
        }
        if engine.unit("ghwk-1").is_some_and(|u| u.flight == FlightState::Airborne) {
            break;
        }
    }

    assert!(saw_rotate);
    assert_eq!(engine.unit("ghwk-1").map(|u| u.flight), Some(FlightState::Airborne));
    assert!(engine.runway_ops().get(&id).is_none());
    assert_eq!(status(&engine, "launch"), Some(TaskStatus::Complete));
}

#[test]
fn test_runway_holds_one_aircraft_at_a_time() {
    let mut engine = opening_strike();
    assign(
        &mut engine,
        Task::new(
            "launch-all",
            ids(&["ghwk-1", "b2-j-2", "b2-m-3"]),
            TaskKind::Takeoff {
                base_id: EntityId::new("outpost-base"),
            },
            CompletionCondition::FlightState {
                target: FlightState::Airborne,
            },
        ),
    );
    let base = EntityId::new("outpost-base");
    let mut seen = HashMap::new();
    let mut launches: Vec<(EntityId, f64)> = Vec::new();

    for _ in 0..400 {
        let snap = engine.tick(FRAME);
        check_task_invariants(&snap, &mut seen);
        assert!(engine.runway_ops().occupants(&base) <= 1);

        for event in &snap.events {
            if let SimEvent::FlightStateChanged {
                entity_id,
                state: FlightState::Launching,
            } = event
            {
                launches.push((entity_id.clone(), snap.time.elapsed_secs));
            }
        }
        if launches.len() == 1 {
            let queue = snap.launch_queues.iter().find(|q| q.base_id == base);
            assert_eq!(queue.map(|q| q.queue_length), Some(2));
        }
    }

    let order: Vec<&str> = launches.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, ["ghwk-1", "b2-j-2", "b2-m-3"]);
    for pair in launches.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= 15.0, "launch interval respected");
    }
    assert_eq!(status(&engine, "launch-all"), Some(TaskStatus::Complete));
}

#[test]
fn test_austere_strip_launches_without_runway() {
    let mut engine = opening_strike();
    engine
        .load_scenario("archipelago-sweep")
        .expect("builtin scenario");
    assign(
        &mut engine,
        Task::new(
            "launch",
            ids(&["ghwk-1"]),
            TaskKind::Takeoff {
                base_id: EntityId::new("paracel-base"),
            },
            CompletionCondition::FlightState {
                target: FlightState::Airborne,
            },
        ),
    );

    engine.tick(FRAME);
    assert_eq!(engine.unit("ghwk-1").map(|u| u.flight), Some(FlightState::Launching));

    for _ in 0..60 {
        engine.tick(FRAME);
        assert!(engine.runway_ops().is_empty());
    }
    assert_eq!(engine.unit("ghwk-1").map(|u| u.flight), Some(FlightState::Airborne));
    assert_eq!(status(&engine, "launch"), Some(TaskStatus::Complete));
}

// ---- Fuel ----

#[test]
fn test_bingo_sends_aircraft_home_once_then_fuel_runs_out() {
    let def = scenario(
        vec![
            EntitySpawn::new("AIRBASE", Faction::Blue, ORIGIN).with_id("home"),
            EntitySpawn::new("TEST_SHORT_LEGS", Faction::Blue, ORIGIN.moved(90.0, 20_000.0))
                .with_id("tanker"),
        ],
        vec![],
    );
    let mut engine = engine_with(def);
    assign(
        &mut engine,
        Task::new(
            "outbound",
            ids(&["tanker"]),
            TaskKind::MoveTo {
                destination: ORIGIN.moved(90.0, 220_000.0),
            },
            CompletionCondition::Arrival,
        ),
    );

    let outbound = TaskId::new("outbound");
    let mut bingo_events = 0;
    let mut exhausted = false;
    let mut outbound_failed = false;
    for _ in 0..200 {
        let snap = engine.tick(FRAME);
        for event in &snap.events {
            match event {
                SimEvent::BingoFuel { .. } => bingo_events += 1,
                SimEvent::FuelExhausted { .. } => exhausted = true,
                SimEvent::TaskFailed { task_id } if *task_id == outbound => outbound_failed = true,
                _ => {}
            }
        }
        assert!(tasks_of_kind(&engine, "RTB") <= 1);
        if snap.result != MissionResult::Pending {
            break;
        }
    }

    assert_eq!(bingo_events, 1);
    assert_eq!(tasks_of_kind(&engine, "RTB"), 1);
    assert!(exhausted);
    assert!(engine.unit("tanker").is_some_and(|u| !u.is_alive()));
    let rtb = engine
        .board()
        .iter()
        .find(|t| t.kind.name() == "RTB")
        .expect("bingo RTB");
    assert_eq!(rtb.status, TaskStatus::Failed);
    // The task the tanker was pulled off does not linger as ACTIVE.
    assert!(outbound_failed);
    assert_eq!(status(&engine, "outbound"), Some(TaskStatus::Failed));
    assert_eq!(engine.result(), MissionResult::Defeat);
}

// ---- Picture ----

#[test]
fn test_stale_contact_expires_after_thirty_seconds() {
    let def = scenario(
        vec![
            EntitySpawn::new("TEST_SPOTTER", Faction::Blue, ORIGIN).with_id("spotter"),
            EntitySpawn::new("COMMAND_POST", Faction::Red, ORIGIN.moved(0.0, 5_000.0))
                .with_id("cp"),
        ],
        vec![],
    );
    let mut engine = engine_with(def);

    let snap = engine.tick(FRAME);
    assert_eq!(snap.contacts.len(), 1);
    let contact = snap.contacts[0].clone();
    assert_eq!(contact.id.to_string(), "contact-1");
    assert_eq!(contact.entity_id, EntityId::new("cp"));
    assert!(contact.is_live);

    let handle = engine
        .index()
        .get(&EntityId::new("spotter"))
        .expect("spotter spawned");
    engine
        .world_mut()
        .get::<&mut Kinematics>(handle)
        .expect("kinematics")
        .position = ORIGIN.moved(180.0, 100_000.0);

    // Last seen at t=1; still held at t=31.
    for _ in 0..30 {
        engine.tick(FRAME);
    }
    assert_eq!(engine.clock().elapsed_secs, 31.0);
    let held = engine.contacts().get(contact.id).expect("contact held");
    assert!(!held.is_live);
    assert_eq!(held.last_seen, 1.0);

    let snap = engine.tick(FRAME);
    assert!(engine.contacts().is_empty());
    assert!(snap.events.contains(&SimEvent::ContactLost {
        contact_id: contact.id,
        entity_id: EntityId::new("cp"),
    }));
}

// ---- Weapons ----

#[test]
fn test_sam_fires_one_missile_per_target() {
    let tor = ORIGIN;
    let def = scenario(
        vec![
            EntitySpawn::new("RQ4_GLOBAL_HAWK", Faction::Blue, tor.moved(180.0, 10_000.0))
                .with_id("hawk"),
            EntitySpawn::new("TOR_M1", Faction::Red, tor).with_id("tor"),
        ],
        vec![],
    );
    let mut engine = engine_with(def);

    let mut launched = Vec::new();
    for _ in 0..60 {
        let snap = engine.tick(FRAME);
        for event in snap.events {
            if let SimEvent::MissileLaunched { guidance, launcher, .. } = event {
                launched.push((launcher, guidance));
            }
        }
        assert!(engine.missiles().len() <= 1);
        if snap.result != MissionResult::Pending {
            break;
        }
    }

    assert_eq!(launched, vec![(EntityId::new("tor"), GuidanceType::FireForget)]);
    assert!(engine.unit("hawk").is_some_and(|u| !u.is_alive()));
    assert_eq!(engine.result(), MissionResult::Defeat);
    // Unlimited magazine: no ammo component to draw down.
    assert_eq!(engine.unit("tor").and_then(|u| u.ammo), None);
}

#[test]
fn test_strike_on_detect_fires_networked_cruise_missiles() {
    let cp = ORIGIN;
    let def = scenario(
        vec![
            EntitySpawn::new("TEST_STANDOFF", Faction::Blue, cp.moved(180.0, 15_000.0))
                .with_id("bomber"),
            EntitySpawn::new("COMMAND_POST", Faction::Red, cp)
                .with_id("cp")
                .with_tag("obj-cp"),
        ],
        vec![destroy("obj-cp")],
    );
    let mut engine = engine_with(def);
    assign(
        &mut engine,
        Task::new(
            "strike",
            ids(&["bomber"]),
            TaskKind::StrikeOnDetect { watch_area: None },
            CompletionCondition::TargetDestroyed {
                entity_id: EntityId::new("cp"),
            },
        )
        .with_params(weapons_free()),
    );

    engine.tick(FRAME);
    let missiles: Vec<_> = engine.missiles().iter().cloned().collect();
    assert_eq!(missiles.len(), 1);
    assert_eq!(missiles[0].guidance, GuidanceType::LatticeNetworked);
    assert_eq!(missiles[0].target_contact, Some(ContactId(1)));
    assert_eq!(
        engine.unit("bomber").and_then(|u| u.ammo).map(|a| a.remaining),
        Some(3)
    );

    for _ in 0..120 {
        if engine.tick(FRAME).result != MissionResult::Pending {
            break;
        }
    }
    assert_eq!(engine.result(), MissionResult::Victory);
    assert!(engine.unit("cp").is_some_and(|u| !u.is_alive()));
    assert!(engine.unit("bomber").is_some_and(|u| u.is_alive()));
    assert_eq!(status(&engine, "strike"), Some(TaskStatus::Complete));
}

#[test]
fn test_one_way_attack_destroys_both_and_wins() {
    let cp = ORIGIN;
    let def = scenario(
        vec![
            EntitySpawn::new("TEST_LOITER", Faction::Blue, cp.moved(180.0, 5_000.0))
                .with_id("loiter"),
            EntitySpawn::new("COMMAND_POST", Faction::Red, cp)
                .with_id("cp")
                .with_tag("obj-cp"),
        ],
        vec![destroy("obj-cp")],
    );
    let mut engine = engine_with(def);
    assign(
        &mut engine,
        Task::new(
            "strike",
            ids(&["loiter"]),
            TaskKind::StrikeOnDetect { watch_area: None },
            CompletionCondition::TargetDestroyed {
                entity_id: EntityId::new("cp"),
            },
        )
        .with_params(weapons_free()),
    );

    engine.tick(FRAME);
    let loiter = engine.unit("loiter").expect("loiter");
    assert_eq!(loiter.state, EntityState::Attacking);
    assert_eq!(loiter.target, Some(EntityId::new("cp")));

    let mut struck = false;
    for _ in 0..60 {
        let snap = engine.tick(FRAME);
        struck |= snap.events.iter().any(|e| {
            matches!(e, SimEvent::SuicideStrike { attacker, target }
                if attacker.as_str() == "loiter" && target.as_str() == "cp")
        });
        if snap.result != MissionResult::Pending {
            break;
        }
    }

    assert!(struck);
    assert!(engine.unit("loiter").is_some_and(|u| !u.is_alive()));
    assert!(engine.unit("cp").is_some_and(|u| !u.is_alive()));
    // Objectives outrank the loss of the last aircraft.
    assert_eq!(engine.result(), MissionResult::Victory);
    assert_eq!(status(&engine, "strike"), Some(TaskStatus::Complete));
}

#[test]
fn test_weapons_hold_never_engages() {
    let cp = ORIGIN;
    let def = scenario(
        vec![
            EntitySpawn::new("TEST_LOITER", Faction::Blue, cp.moved(180.0, 5_000.0))
                .with_id("loiter"),
            EntitySpawn::new("COMMAND_POST", Faction::Red, cp).with_id("cp"),
        ],
        vec![],
    );
    let mut engine = engine_with(def);
    assign(
        &mut engine,
        Task::new(
            "hold",
            ids(&["loiter"]),
            TaskKind::StrikeOnDetect { watch_area: None },
            CompletionCondition::TargetDestroyed {
                entity_id: EntityId::new("cp"),
            },
        ),
    );

    for _ in 0..30 {
        engine.tick(FRAME);
    }
    assert_eq!(engine.contacts().live_count(), 1);
    assert_ne!(engine.unit("loiter").map(|u| u.state), Some(EntityState::Attacking));
    assert!(engine.unit("cp").is_some_and(|u| u.is_alive()));
    assert_eq!(status(&engine, "hold"), Some(TaskStatus::Active));
}

/// Loiter 5 km south of a command post, striking on detect under
/// WEAPONS_TIGHT with a watch area centred `offset_west` meters west of it.
fn tight_strike(offset_west: f64) -> SimulationEngine {
    let cp = ORIGIN;
    let def = scenario(
        vec![
            EntitySpawn::new("TEST_LOITER", Faction::Blue, cp.moved(180.0, 5_000.0))
                .with_id("loiter"),
            EntitySpawn::new("COMMAND_POST", Faction::Red, cp).with_id("cp"),
        ],
        vec![],
    );
    let mut engine = engine_with(def);
    assign(
        &mut engine,
        Task::new(
            "tight",
            ids(&["loiter"]),
            TaskKind::StrikeOnDetect {
                watch_area: Some(AreaDef {
                    center: cp.moved(270.0, offset_west),
                    radius: 2_000.0,
                }),
            },
            CompletionCondition::TargetDestroyed {
                entity_id: EntityId::new("cp"),
            },
        )
        .with_params(TaskParams {
            roe: Roe::WeaponsTight,
            ..TaskParams::default()
        }),
    );
    engine
}

#[test]
fn test_weapons_tight_engages_only_inside_the_watch_area() {
    let mut inside = tight_strike(1_000.0);
    for _ in 0..60 {
        if inside.tick(FRAME).result != MissionResult::Pending {
            break;
        }
    }
    assert!(inside.unit("cp").is_some_and(|u| !u.is_alive()));
    assert_eq!(status(&inside, "tight"), Some(TaskStatus::Complete));

    // 12 km out is beyond the area even with the strike margin.
    let mut outside = tight_strike(12_000.0);
    for _ in 0..30 {
        outside.tick(FRAME);
        assert_ne!(
            outside.unit("loiter").map(|u| u.state),
            Some(EntityState::Attacking)
        );
    }
    assert_eq!(outside.contacts().live_count(), 1);
    assert!(outside.unit("cp").is_some_and(|u| u.is_alive()));
    assert_eq!(status(&outside, "tight"), Some(TaskStatus::Active));
}

#[test]
fn test_strike_target_leaves_air_defence_batteries_free() {
    let cp = ORIGIN;
    let def = scenario(
        vec![
            EntitySpawn::new("TOR_M1", Faction::Blue, cp.moved(180.0, 3_000.0)).with_id("tor"),
            EntitySpawn::new("TEST_SPOTTER", Faction::Blue, cp.moved(180.0, 5_000.0))
                .with_id("spotter"),
            EntitySpawn::new("COMMAND_POST", Faction::Red, cp).with_id("cp"),
        ],
        vec![],
    );
    let mut engine = engine_with(def);
    assign(
        &mut engine,
        Task::new(
            "strike",
            ids(&["tor"]),
            TaskKind::StrikeTarget {
                contact_id: ContactId(1),
            },
            CompletionCondition::TargetDestroyed {
                entity_id: EntityId::new("cp"),
            },
        )
        .with_params(weapons_free()),
    );

    for _ in 0..20 {
        engine.tick(FRAME);
        let tor = engine.unit("tor").expect("tor");
        assert_ne!(tor.state, EntityState::Attacking);
        assert_eq!(tor.target, None);
    }
    assert_eq!(engine.contacts().live_count(), 1);
    assert!(engine.unit("cp").is_some_and(|u| u.is_alive()));
}
