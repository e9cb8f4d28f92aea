//! Errors reported by a rules engine.

/// Errors that can occur when consulting the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The move is not legal in the given position.
    #[error("illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },

    /// The FEN could not be parsed or describes an impossible position.
    #[error("invalid position {fen}: {reason}")]
    InvalidPosition { fen: String, reason: String },

    /// Move or square text that is not valid coordinate notation.
    #[error("invalid move notation: {0}")]
    InvalidNotation(String),
}

/// Result type alias for rules-engine operations
pub type RulesResult<T> = Result<T, RulesError>;
