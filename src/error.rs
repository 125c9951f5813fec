//! Crate error type.

use crate::team::Conference;

/// Errors raised by seeding, aggregation and the loader/report layer.
///
/// None of these are retried: structural and configuration errors mean the
/// caller has to fix its inputs before calling again.
#[derive(Debug, thiserror::Error)]
pub enum OddsError {
    #[error("Could not build playoff field: {conference} has {found} qualifying teams, need 8")]
    InsufficientTeams { conference: Conference, found: usize },

    #[error("Invalid playoff field: {0}")]
    InvalidField(String),

    #[error("Simulation count must be greater than 0, got {0}")]
    InvalidSimulationCount(usize),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Aggregation cancelled before any trial completed")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OddsError>;
