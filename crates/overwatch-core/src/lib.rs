//! Core types and definitions for the OVERWATCH simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geo math, identifiers, components, platform and runway tables,
//! scenario and task definitions, commands, state snapshots, events,
//! and constants. It has no dependency on the ECS or any runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod geo;
pub mod platform;
pub mod runway;
pub mod scenario;
pub mod state;
pub mod task;
pub mod types;
