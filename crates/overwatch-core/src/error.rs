//! Content loading errors.
//!
//! These surface only while building a simulation. Once a scenario is
//! running, systems degrade to inaction instead of failing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown platform id: {0}")]
    UnknownPlatform(String),

    #[error("platform already registered: {0}")]
    DuplicatePlatform(String),

    #[error("unknown scenario id: {0}")]
    UnknownScenario(String),

    #[error("duplicate entity id in scenario: {0}")]
    DuplicateEntity(String),

    #[error("invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),
}
