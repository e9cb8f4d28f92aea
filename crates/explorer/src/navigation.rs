//! Variation-aware navigation over a [`GameTree`].
//!
//! The cursor is a [`CurrentPath`]: the node ids from the root to the
//! current node. The "current line" is that path extended by the main-line
//! descendants of the current node, so inside a variation the commands walk
//! the variation's own moves, and stepping back past a variation's first
//! move lands on the line it branched from.
//!
//! Every command is a pure function from `(tree, path)` to a new path.
//! Requests that would leave the line are no-ops.

use crate::error::TreeResult;
use crate::tree::{GameTree, NodeId};

/// Root-to-current node ids. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPath(Vec<NodeId>);

impl CurrentPath {
    /// Path consisting of the root only.
    pub fn root(tree: &GameTree) -> Self {
        Self(vec![tree.root_id()])
    }

    pub fn to(tree: &GameTree, id: NodeId) -> TreeResult<Self> {
        tree.path_ids(id).map(Self)
    }

    pub fn current(&self) -> NodeId {
        self.0[self.0.len() - 1]
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    /// Index of the current move in the line, -1 at the starting position.
    pub fn move_index(&self) -> isize {
        self.0.len() as isize - 2
    }
}

pub fn go_to_start(tree: &GameTree, _path: &CurrentPath) -> CurrentPath {
    CurrentPath::root(tree)
}

pub fn go_backward(_tree: &GameTree, path: &CurrentPath) -> CurrentPath {
    let mut next = path.clone();
    if next.0.len() > 1 {
        next.0.pop();
    }
    next
}

pub fn go_forward(tree: &GameTree, path: &CurrentPath) -> CurrentPath {
    let mut next = path.clone();
    if let Some(child) = tree.node(path.current()).and_then(|n| n.main_child) {
        next.0.push(child);
    }
    next
}

pub fn go_to_end(tree: &GameTree, path: &CurrentPath) -> CurrentPath {
    let mut next = path.clone();
    let tail = tree.line_from(path.current());
    next.0.extend(tail.into_iter().skip(1));
    next
}

/// Ids of every move in the current line, in order.
pub fn line_moves(tree: &GameTree, path: &CurrentPath) -> Vec<NodeId> {
    let mut moves: Vec<NodeId> = path.0[1..].to_vec();
    moves.extend(tree.line_from(path.current()).into_iter().skip(1));
    moves
}

/// Notations of the current line; equals the main-line history as long as
/// no variation has been entered.
pub fn move_history(tree: &GameTree, path: &CurrentPath) -> Vec<String> {
    line_moves(tree, path)
        .into_iter()
        .filter_map(|id| tree.node(id).and_then(|n| n.notation.clone()))
        .collect()
}

/// True when the current line has no further move.
pub fn is_at_final_position(tree: &GameTree, path: &CurrentPath) -> bool {
    tree.node(path.current())
        .map_or(true, |n| n.main_child.is_none())
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod navigation_tests;
