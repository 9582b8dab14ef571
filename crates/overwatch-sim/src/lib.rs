//! Simulation engine for OVERWATCH.
//!
//! Owns the hecs ECS world, runs the ordered system pipeline each tick,
//! and produces `GameStateSnapshot`s for the frontend.

pub mod engine;
pub mod formations;
pub mod index;
pub mod platforms;
pub mod scenario;
pub mod systems;
pub mod unit;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use overwatch_core as core;

#[cfg(test)]
mod tests;
