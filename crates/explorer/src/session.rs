//! Free-exploration session: a rules engine, a move tree and a cursor path.

use chess_core::{parse_uci_move, Color, Move, Position, RulesEngine, RulesResult, Square};
use tracing::debug;

use crate::error::TreeResult;
use crate::movetext;
use crate::navigation::{self, CurrentPath};
use crate::tree::{Continuation, GameTree, NodeId};

/// Interactive board state for exploring lines.
///
/// The tree's cursor and [`CurrentPath`] always point at the same node.
pub struct Explorer<R: RulesEngine> {
    rules: R,
    tree: GameTree,
    path: CurrentPath,
}

impl<R: RulesEngine> Explorer<R> {
    /// Session at the standard initial position.
    pub fn new(rules: R) -> Self {
        let tree = GameTree::new(rules.start_position());
        let path = CurrentPath::root(&tree);
        Self { rules, tree, path }
    }

    pub fn from_fen(rules: R, fen: &str) -> TreeResult<Self> {
        let mut explorer = Self::new(rules);
        explorer.load_fen(fen)?;
        Ok(explorer)
    }

    /// Replace the whole tree with one rooted at `fen`.
    ///
    /// An invalid FEN leaves the session untouched. Ids of the replaced tree
    /// are not reused.
    pub fn load_fen(&mut self, fen: &str) -> TreeResult<()> {
        let start = self.rules.load_position(fen)?;
        debug!(fen = %start, "loading new tree");
        self.tree = GameTree::starting_at(start, self.tree.next_id());
        self.path = CurrentPath::root(&self.tree);
        Ok(())
    }

    /// Play `mv` from the current node.
    pub fn make_move(&mut self, mv: Move) -> TreeResult<NodeId> {
        let id = self.tree.apply_move(&self.rules, self.path.current(), mv)?;
        self.path = CurrentPath::to(&self.tree, id)?;
        Ok(id)
    }

    /// [`make_move`](Self::make_move) with a move in UCI text form.
    pub fn make_uci_move(&mut self, txt: &str) -> TreeResult<NodeId> {
        let mv = parse_uci_move(txt)?;
        self.make_move(mv)
    }

    /// Move the cursor to any node, entering its line.
    pub fn jump_to(&mut self, id: NodeId) -> TreeResult<()> {
        let path = CurrentPath::to(&self.tree, id)?;
        self.tree.navigate_to(id)?;
        self.path = path;
        Ok(())
    }

    pub fn go_to_start(&mut self) -> bool {
        self.step(navigation::go_to_start)
    }

    pub fn go_backward(&mut self) -> bool {
        self.step(navigation::go_backward)
    }

    pub fn go_forward(&mut self) -> bool {
        self.step(navigation::go_forward)
    }

    pub fn go_to_end(&mut self) -> bool {
        self.step(navigation::go_to_end)
    }

    /// Apply a navigation command; false when it was a no-op.
    fn step(&mut self, cmd: fn(&GameTree, &CurrentPath) -> CurrentPath) -> bool {
        let next = cmd(&self.tree, &self.path);
        if next == self.path || self.tree.navigate_to(next.current()).is_err() {
            return false;
        }
        self.path = next;
        true
    }

    /// Displayed position.
    pub fn position(&self) -> &Position {
        &self.tree.current().position
    }

    pub fn move_history(&self) -> Vec<String> {
        navigation::move_history(&self.tree, &self.path)
    }

    /// -1 at the starting position.
    pub fn current_move_index(&self) -> isize {
        self.path.move_index()
    }

    pub fn is_at_final_position(&self) -> bool {
        navigation::is_at_final_position(&self.tree, &self.path)
    }

    /// The move that reached the displayed position, for highlighting.
    pub fn last_move(&self) -> Option<Move> {
        self.tree.current().mv
    }

    /// Continuations from the current node.
    pub fn continuations(&self) -> Vec<Continuation> {
        self.tree
            .variations_at(self.path.current())
            .unwrap_or_default()
    }

    pub fn attackers(&self, square: Square, side: Color) -> RulesResult<Vec<Square>> {
        self.rules.attackers(self.position(), square, side)
    }

    pub fn movetext(&self) -> String {
        movetext::render(&self.tree)
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn path(&self) -> &CurrentPath {
        &self.path
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
