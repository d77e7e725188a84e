//! Error taxonomy for the engine, the tier table and the progression layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Tier or board parameters that cannot produce a playable session.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("cell ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("no level with id {0}")]
    UnknownLevel(u32),

    #[error("level {0} is still locked")]
    LevelLocked(u32),

    #[error("level {level} has {count} sub-levels, index {index} does not exist")]
    SubLevelOutOfRange { level: u32, index: usize, count: usize },

    #[error("sub-level {index} of level {level} is locked ({completed} completed so far)")]
    SubLevelLocked {
        level: u32,
        index: usize,
        completed: usize,
    },

    #[error("puzzle {level} cannot be completed with {owned} of {total} pieces")]
    PuzzleIncomplete {
        level: u32,
        owned: usize,
        total: usize,
    },

    #[error("no sub-level is being played")]
    NoActiveSession,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
