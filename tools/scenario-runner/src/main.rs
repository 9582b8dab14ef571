//! scenario-runner: run a mission headless and dump the final snapshot.
//!
//! Usage:
//!   scenario-runner --scenario opening-strike --plan plan.json --seconds 900
//!   scenario-runner --scenario-file custom.json --platforms extra.json --output end.json

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use overwatch_core::commands::PlayerCommand;
use overwatch_core::enums::MissionResult;
use overwatch_core::platform::PlatformCatalog;
use overwatch_core::scenario::ScenarioDef;
use overwatch_core::state::GameStateSnapshot;
use overwatch_core::task::Task;
use overwatch_sim::platforms::builtin_catalog;
use overwatch_sim::scenario::BUILTIN_SCENARIOS;
use overwatch_sim::{SimConfig, SimulationEngine};

/// Real seconds fed to each tick.
const FRAME_SECS: f64 = 0.1;

struct Options {
    scenario: Option<String>,
    scenario_file: Option<PathBuf>,
    platforms: Option<PathBuf>,
    plan: Option<PathBuf>,
    seconds: f64,
    scale: f64,
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| matches!(a.as_str(), "help" | "--help" | "-h")) {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("Error: {msg}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(msg) = run(&options) {
        eprintln!("Error: {msg}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "scenario-runner: run an OVERWATCH mission headless\n\
         \n\
           --scenario <id>        Built-in scenario ({})\n\
           --scenario-file <path> Scenario definition JSON (instead of --scenario)\n\
           --platforms <path>     Extra platform definitions JSON array (optional)\n\
           --plan <path>          JSON array of tasks assigned at t=0 (optional)\n\
           --seconds <N>          Game seconds to run (default: 600)\n\
           --scale <S>            Time scale (default: 10)\n\
           --output <path>        Write the final snapshot here (default: stdout)\n",
        BUILTIN_SCENARIOS.join(", ")
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_number(args: &[String], flag: &str, default: f64) -> Result<f64, String> {
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("{flag} expects a number, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let options = Options {
        scenario: flag_value(args, "--scenario").map(str::to_string),
        scenario_file: flag_value(args, "--scenario-file").map(PathBuf::from),
        platforms: flag_value(args, "--platforms").map(PathBuf::from),
        plan: flag_value(args, "--plan").map(PathBuf::from),
        seconds: parse_number(args, "--seconds", 600.0)?,
        scale: parse_number(args, "--scale", 10.0)?,
        output: flag_value(args, "--output").map(PathBuf::from),
    };
    if options.scenario.is_none() == options.scenario_file.is_none() {
        return Err("give exactly one of --scenario or --scenario-file".to_string());
    }
    if options.seconds <= 0.0 || options.scale <= 0.0 {
        return Err("--seconds and --scale must be positive".to_string());
    }
    Ok(options)
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

fn load_catalog(extra: Option<&Path>) -> Result<PlatformCatalog, String> {
    let mut catalog = builtin_catalog().map_err(|e| e.to_string())?;
    if let Some(path) = extra {
        let defs = PlatformCatalog::from_json(&read(path)?).map_err(|e| e.to_string())?;
        for def in defs.iter() {
            catalog.register(def.clone()).map_err(|e| e.to_string())?;
        }
        log::info!("loaded {} extra platforms from {}", defs.len(), path.display());
    }
    Ok(catalog)
}

fn load_plan(path: &Path) -> Result<Vec<Task>, String> {
    serde_json::from_str(&read(path)?).map_err(|e| format!("bad plan {}: {e}", path.display()))
}

fn run(options: &Options) -> Result<(), String> {
    let config = SimConfig {
        time_scale: options.scale,
        ..SimConfig::default()
    };
    let mut engine = SimulationEngine::with_catalog(config, load_catalog(options.platforms.as_deref())?);

    if let Some(path) = &options.scenario_file {
        let def = ScenarioDef::from_json(&read(path)?).map_err(|e| e.to_string())?;
        engine.load_scenario_def(def).map_err(|e| e.to_string())?;
    } else if let Some(id) = &options.scenario {
        engine.load_scenario(id).map_err(|e| e.to_string())?;
    }

    if let Some(path) = &options.plan {
        let tasks = load_plan(path)?;
        log::info!("assigning {} tasks", tasks.len());
        engine.queue_commands(tasks.into_iter().map(|task| PlayerCommand::AssignTask { task }));
    }

    let mut snapshot = engine.tick(0.0);
    // A clock at its mission duration no longer advances.
    while snapshot.time.elapsed_secs < options.seconds
        && snapshot.result == MissionResult::Pending
        && !snapshot.time.is_expired()
    {
        snapshot = engine.tick(FRAME_SECS);
    }
    summarize(&snapshot);

    let json = serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?;
    match &options.output {
        Some(path) => fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn summarize(snapshot: &GameStateSnapshot) {
    let alive = snapshot
        .entities
        .iter()
        .filter(|e| e.health > 0.0)
        .count();
    let complete = snapshot.objectives.iter().filter(|o| o.complete).count();
    log::info!(
        "t={:.0}s result={:?} entities={}/{} objectives={}/{} contacts={} missiles={} tasks={}",
        snapshot.time.elapsed_secs,
        snapshot.result,
        alive,
        snapshot.entities.len(),
        complete,
        snapshot.objectives.len(),
        snapshot.contacts.len(),
        snapshot.missiles.len(),
        snapshot.tasks.len(),
    );
}
