//! Error types for the move tree and explorer session

use chess_core::RulesError;

use crate::tree::NodeId;

/// Errors that can occur while growing or navigating a move tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The rules engine rejected the move; the tree is unchanged
    #[error(transparent)]
    IllegalMove(#[from] RulesError),

    /// The id does not belong to this tree
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// A deserialized tree whose links do not form a tree
    #[error("invalid tree snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type alias for tree operations
pub type TreeResult<T> = Result<T, TreeError>;
