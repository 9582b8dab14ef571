//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus whatever shared
//! picture they read or write (contacts, missiles, tasks, runway state).
//! The engine calls them in a fixed order.

pub mod combat;
pub mod contacts;
pub mod detection;
pub mod flight_ops;
pub mod formation;
pub mod fuel;
pub mod missiles;
pub mod mission;
pub mod movement;
pub mod runway_ops;
pub mod snapshot;
pub mod tasks;
