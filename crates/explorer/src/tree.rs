//! Branching move tree.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]. The
//! tree only grows: the first move played from a node becomes its main-line
//! child, every later distinct move is appended to its variations, and a
//! move whose notation already exists among a node's children navigates to
//! that child instead of creating a duplicate.
//!
//! Ids are `first_id + arena index`. A tree that replaces another starts its
//! ids where the old one stopped, so ids from the old tree stay unknown.

use chess_core::{Color, Move, MoveRecord, Position, RulesEngine};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{TreeError, TreeResult};

/// Identifier of a node within one [`GameTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(NodeId)
    }
}

/// One position in the tree and the move that reached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameNode {
    pub id: NodeId,
    /// None only for the root
    pub mv: Option<Move>,
    /// SAN of `mv`; None only for the root
    pub notation: Option<String>,
    /// Position after `mv` (the starting position for the root)
    pub position: Position,
    pub parent: Option<NodeId>,
    /// Continuation of this node's line
    pub main_child: Option<NodeId>,
    /// Alternative continuations in creation order
    pub variations: Vec<NodeId>,
    /// Distance from the root
    pub depth: u32,
    /// Side that played `mv`
    pub mover: Option<Color>,
    /// Full-move number of `mv` (0 for the root)
    pub move_number: u32,
}

impl GameNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Zero-based half-move index of `mv`: even for White moves from the
    /// standard start, odd for Black.
    pub fn ply_index(&self) -> Option<u32> {
        self.depth.checked_sub(1)
    }

    pub fn is_white_move(&self) -> bool {
        self.mover == Some(Color::White)
    }

    pub fn has_variations(&self) -> bool {
        !self.variations.is_empty()
    }

    /// All continuations, main line first.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.main_child.into_iter().chain(self.variations.iter().copied())
    }
}

/// A continuation from some node, as listed by [`GameTree::variations_at`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    /// First node of the continuation
    pub head: NodeId,
    pub is_main_line: bool,
    /// `head` followed by its main-line descendants
    pub moves: Vec<NodeId>,
}

/// Arena of [`GameNode`]s plus the navigation cursor.
///
/// Deserializing checks that every id resolves and that the links form a
/// single tree under the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TreeSnapshot")]
pub struct GameTree {
    first_id: usize,
    nodes: Vec<GameNode>,
    root: NodeId,
    current: NodeId,
}

/// Unchecked serialized form of a [`GameTree`].
#[derive(Deserialize)]
struct TreeSnapshot {
    #[serde(default)]
    first_id: usize,
    nodes: Vec<GameNode>,
    root: NodeId,
    current: NodeId,
}

impl TryFrom<TreeSnapshot> for GameTree {
    type Error = TreeError;

    fn try_from(raw: TreeSnapshot) -> Result<Self, Self::Error> {
        let tree = GameTree {
            first_id: raw.first_id,
            nodes: raw.nodes,
            root: raw.root,
            current: raw.current,
        };
        tree.validate()?;
        Ok(tree)
    }
}

impl GameTree {
    /// Tree holding only a root at `start`, with the cursor on the root.
    pub fn new(start: Position) -> Self {
        Self::starting_at(start, NodeId(0))
    }

    /// Like [`new`](Self::new), with ids counting up from `first`.
    ///
    /// Pass the old tree's [`next_id`](Self::next_id) when replacing a tree
    /// so that ids are never reused.
    pub fn starting_at(start: Position, first: NodeId) -> Self {
        let move_number = start.fullmove_number();
        let root = GameNode {
            id: first,
            mv: None,
            notation: None,
            position: start,
            parent: None,
            main_child: None,
            variations: Vec::new(),
            depth: 0,
            mover: None,
            move_number: move_number.saturating_sub(1),
        };
        Self {
            first_id: first.0,
            nodes: vec![root],
            root: first,
            current: first,
        }
    }

    /// Id the next created node will get.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.first_id + self.nodes.len())
    }

    fn slot(&self, id: NodeId) -> Option<usize> {
        id.0.checked_sub(self.first_id).filter(|&i| i < self.nodes.len())
    }

    fn invalid(reason: String) -> TreeError {
        TreeError::InvalidSnapshot(reason)
    }

    /// Check the structural invariants a snapshot must satisfy.
    fn validate(&self) -> TreeResult<()> {
        if self.nodes.is_empty() {
            return Err(Self::invalid("no nodes".to_string()));
        }
        if self.first_id.checked_add(self.nodes.len()).is_none() {
            return Err(Self::invalid(format!("ids overflow from {}", self.first_id)));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id.0 != self.first_id + i {
                return Err(Self::invalid(format!("node at slot {i} has id {}", node.id)));
            }
        }
        for id in [self.root, self.current] {
            if self.slot(id).is_none() {
                return Err(Self::invalid(format!("unknown node {id}")));
            }
        }
        if self.root().parent.is_some() {
            return Err(Self::invalid("root has a parent".to_string()));
        }

        let mut claimed = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for child in node.children() {
                let Some(slot) = self.slot(child) else {
                    return Err(Self::invalid(format!("node {} links unknown node {child}", node.id)));
                };
                let linked = &self.nodes[slot];
                if claimed[slot]
                    || linked.parent != Some(node.id)
                    || node.depth.checked_add(1) != Some(linked.depth)
                {
                    return Err(Self::invalid(format!("node {child} is misplaced under {}", node.id)));
                }
                claimed[slot] = true;
            }
        }
        for (slot, node) in self.nodes.iter().enumerate() {
            if node.id != self.root && !claimed[slot] {
                return Err(Self::invalid(format!("node {} is detached", node.id)));
            }
        }
        Ok(())
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn current_id(&self) -> NodeId {
        self.current
    }

    pub fn root(&self) -> &GameNode {
        &self.nodes[self.root.0 - self.first_id]
    }

    pub fn current(&self) -> &GameNode {
        &self.nodes[self.current.0 - self.first_id]
    }

    pub fn node(&self, id: NodeId) -> Option<&GameNode> {
        self.slot(id).map(|i| &self.nodes[i])
    }

    pub fn get(&self, id: NodeId) -> TreeResult<&GameNode> {
        self.node(id).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no move has been played yet
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GameNode> {
        self.nodes.iter()
    }

    /// Play `mv` from `from`, consulting `rules` for legality and notation.
    ///
    /// On success the cursor moves to the resulting node, which is either an
    /// existing child with the same notation or a freshly created one. On
    /// failure the tree is unchanged.
    pub fn apply_move<R: RulesEngine>(&mut self, rules: &R, from: NodeId, mv: Move) -> TreeResult<NodeId> {
        let parent = self.get(from)?;
        let record = rules.apply_move(&parent.position, mv)?;
        self.add_record(from, record)
    }

    /// Attach an engine-produced [`MoveRecord`] below `from`.
    fn add_record(&mut self, from: NodeId, record: MoveRecord) -> TreeResult<NodeId> {
        let parent = self.get(from)?;

        if let Some(existing) = self.child_with_notation(parent, &record.san) {
            debug!(node = %existing, san = %record.san, "move already in tree");
            self.current = existing;
            return Ok(existing);
        }

        let id = self.next_id();
        let mover = parent.position.side_to_move();
        let move_number = parent.position.fullmove_number();
        let node = GameNode {
            id,
            mv: Some(record.mv),
            notation: Some(record.san),
            position: record.position,
            parent: Some(from),
            main_child: None,
            variations: Vec::new(),
            depth: parent.depth + 1,
            mover,
            move_number,
        };

        let slot = self.slot(from).ok_or(TreeError::NodeNotFound(from))?;
        let parent = &mut self.nodes[slot];
        let is_main_line = parent.main_child.is_none();
        if is_main_line {
            parent.main_child = Some(id);
        } else {
            parent.variations.push(id);
        }
        debug!(node = %id, parent = %from, is_main_line, "node created");

        self.nodes.push(node);
        self.current = id;
        Ok(id)
    }

    fn child_with_notation(&self, parent: &GameNode, san: &str) -> Option<NodeId> {
        parent
            .children()
            .find(|&child| self.node(child).and_then(|n| n.notation.as_deref()) == Some(san))
    }

    /// Move the cursor. Structure is untouched.
    pub fn navigate_to(&mut self, id: NodeId) -> TreeResult<()> {
        self.get(id)?;
        self.current = id;
        Ok(())
    }

    /// Nodes from the root to `id`, both inclusive.
    pub fn path_to(&self, id: NodeId) -> TreeResult<Vec<&GameNode>> {
        let mut path = Vec::new();
        let mut cursor = Some(self.get(id)?);
        while let Some(node) = cursor {
            path.push(node);
            cursor = node.parent.and_then(|p| self.node(p));
        }
        path.reverse();
        Ok(path)
    }

    /// Ids from the root to `id`, both inclusive.
    pub fn path_ids(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        Ok(self.path_to(id)?.into_iter().map(|n| n.id).collect())
    }

    /// Moves to replay from the root's position to reach `id`.
    pub fn moves_to(&self, id: NodeId) -> TreeResult<Vec<Move>> {
        Ok(self.path_to(id)?.into_iter().filter_map(|n| n.mv).collect())
    }

    /// The primary game: main-line children from the root, root excluded.
    pub fn main_line(&self) -> Vec<&GameNode> {
        self.line_from(self.root)
            .into_iter()
            .skip(1)
            .filter_map(|id| self.node(id))
            .collect()
    }

    /// `id` followed by its main-line descendants. Empty for unknown ids.
    pub fn line_from(&self, id: NodeId) -> Vec<NodeId> {
        let mut line = Vec::new();
        let mut cursor = self.node(id);
        while let Some(node) = cursor {
            line.push(node.id);
            cursor = node.main_child.and_then(|c| self.node(c));
        }
        line
    }

    /// Every direct continuation from `id`: the main-line child first (if
    /// any), then the variations in the order they were created.
    pub fn variations_at(&self, id: NodeId) -> TreeResult<Vec<Continuation>> {
        let node = self.get(id)?;
        Ok(node
            .children()
            .map(|head| Continuation {
                head,
                is_main_line: Some(head) == node.main_child,
                moves: self.line_from(head),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
