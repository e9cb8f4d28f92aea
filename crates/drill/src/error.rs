//! Error types for puzzle sessions, datasets, storage and drills

use chess_core::RulesError;
use std::path::PathBuf;

/// Errors from the puzzle session state machine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("no puzzle is active")]
    NotActive,

    /// The opponent's reply has not been played yet
    #[error("not the player's turn")]
    NotPlayerTurn,

    #[error("puzzle has an empty solution")]
    EmptySolution,

    /// The player's move was rejected by the rules engine; nothing changed
    #[error(transparent)]
    IllegalMove(#[from] RulesError),

    /// A recorded solution move is illegal from the position it belongs to
    #[error("solution move {index} ({mv}) does not fit the position: {source}")]
    EngineDesync {
        index: usize,
        mv: String,
        #[source]
        source: RulesError,
    },
}

/// Errors while reading, converting or writing puzzle datasets
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {reason}")]
    Csv { line: usize, reason: String },
}

/// Errors from the key-value store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors while loading drill configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors surfaced by the drill engine
#[derive(Debug, thiserror::Error)]
pub enum DrillError {
    #[error("no drill is running")]
    NotActive,

    #[error("puzzles are still loading")]
    Loading,

    /// No puzzle left to load; the drill ends when this is hit
    #[error("puzzle queue is exhausted")]
    QueueExhausted,

    #[error(transparent)]
    IllegalMove(RulesError),

    #[error(transparent)]
    Puzzle(PuzzleError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PuzzleError> for DrillError {
    fn from(e: PuzzleError) -> Self {
        match e {
            PuzzleError::NotActive => DrillError::NotActive,
            PuzzleError::IllegalMove(e) => DrillError::IllegalMove(e),
            other => DrillError::Puzzle(other),
        }
    }
}

/// Result type alias for puzzle session operations
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Result type alias for drill operations
pub type DrillResult<T> = Result<T, DrillError>;
