//! Puzzle session state machine.
//!
//! A session walks a fixed solution sequence that alternates opponent and
//! player moves. Opponent moves are played automatically by [`advance`],
//! which is called once after every transition and guarded so it can never
//! play the same solution entry twice. Player moves go through [`submit`]
//! and are compared against the expected entry by their standard notation,
//! so `e1g1` and a castling move given any other way compare equal.
//!
//! A wrong move is never committed. In drill mode it fails the puzzle and
//! fires the wrong-move hook; in explore mode the player may try again.
//!
//! [`advance`]: PuzzleSession::advance
//! [`submit`]: PuzzleSession::submit

use chess_core::{move_to_uci, Move, MoveRecord, Position, RulesEngine};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{PuzzleError, PuzzleResult};

/// How a puzzle is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleMode {
    /// The setup move was already applied; the player moves first and a
    /// wrong move ends the puzzle.
    Drill,
    /// The first solution entry is the opponent's; wrong moves may be retried.
    Explore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzlePhase {
    Inactive,
    OpponentTurn,
    PlayerTurn,
    Completed,
    Failed,
}

/// Observable session flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSessionState {
    pub active: bool,
    pub solution_index: usize,
    pub is_player_turn: bool,
    pub completed: bool,
    pub failed: bool,
}

/// Details handed to the wrong-move hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongMove {
    pub solution_index: usize,
    pub expected: Move,
    pub played: Move,
}

/// Called once when a drill-mode move misses the solution, before
/// [`PuzzleSession::submit`] returns.
pub type WrongMoveHook = Box<dyn FnMut(&WrongMove)>;

/// Outcome of a legal player move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveVerdict {
    /// Right move, more to come; `reply` is the opponent's automatic answer
    Correct { reply: Option<MoveRecord> },
    /// Right move and the solution is exhausted
    Solved,
    /// Not the expected move; the position was left as it was
    Wrong { expected: Move, played: Move },
}

pub struct PuzzleSession {
    mode: PuzzleMode,
    solution: Vec<Move>,
    state: PuzzleSessionState,
    position: Position,
    played: Vec<MoveRecord>,
    on_wrong_move: Option<WrongMoveHook>,
    /// Solution index most recently auto-played
    replied_at: Option<usize>,
}

impl Default for PuzzleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleSession {
    pub fn new() -> Self {
        Self {
            mode: PuzzleMode::Drill,
            solution: Vec::new(),
            state: PuzzleSessionState::default(),
            position: Position::from_fen(""),
            played: Vec::new(),
            on_wrong_move: None,
            replied_at: None,
        }
    }

    /// Begin a puzzle at `position`.
    ///
    /// In explore mode the opponent's first move is played immediately and
    /// returned.
    pub fn start<R: RulesEngine>(
        &mut self,
        rules: &R,
        position: Position,
        solution: Vec<Move>,
        mode: PuzzleMode,
        on_wrong_move: Option<WrongMoveHook>,
    ) -> PuzzleResult<Option<MoveRecord>> {
        if solution.is_empty() {
            return Err(PuzzleError::EmptySolution);
        }
        self.exit();
        debug!(?mode, len = solution.len(), fen = %position, "puzzle started");

        self.mode = mode;
        self.solution = solution;
        self.position = position;
        self.on_wrong_move = on_wrong_move;
        self.state = PuzzleSessionState {
            active: true,
            solution_index: 0,
            is_player_turn: mode == PuzzleMode::Drill,
            completed: false,
            failed: false,
        };
        self.advance(rules)
    }

    /// Play the opponent's solution move if it is the opponent's turn.
    ///
    /// Returns `Ok(None)` when there is nothing to do, including when the
    /// current solution entry has already been played. An engine rejection
    /// abandons the puzzle and reports [`PuzzleError::EngineDesync`].
    pub fn advance<R: RulesEngine>(&mut self, rules: &R) -> PuzzleResult<Option<MoveRecord>> {
        let s = self.state;
        if !s.active || s.is_player_turn || s.completed || s.failed {
            return Ok(None);
        }
        let index = s.solution_index;
        if self.replied_at == Some(index) {
            return Ok(None);
        }
        let Some(&mv) = self.solution.get(index) else {
            return Ok(None);
        };

        let record = match rules.apply_move(&self.position, mv) {
            Ok(record) => record,
            Err(source) => {
                warn!(index, mv = %mv, "solution move rejected by rules engine");
                self.exit();
                return Err(PuzzleError::EngineDesync {
                    index,
                    mv: move_to_uci(mv),
                    source,
                });
            }
        };
        debug!(index, san = %record.san, "opponent replied");

        self.replied_at = Some(index);
        self.position = record.position.clone();
        self.played.push(record.clone());
        self.state.solution_index += 1;
        if self.state.solution_index >= self.solution.len() {
            self.state.completed = true;
        } else {
            self.state.is_player_turn = true;
        }
        Ok(Some(record))
    }

    /// Check a player move against the expected solution entry.
    pub fn submit<R: RulesEngine>(&mut self, rules: &R, mv: Move) -> PuzzleResult<MoveVerdict> {
        let s = self.state;
        if !s.active || s.completed || s.failed {
            return Err(PuzzleError::NotActive);
        }
        if !s.is_player_turn {
            return Err(PuzzleError::NotPlayerTurn);
        }

        let record = rules.apply_move(&self.position, mv)?;
        let index = s.solution_index;
        let expected = self.solution[index];
        let wanted = rules
            .apply_move(&self.position, expected)
            .map_err(|source| PuzzleError::EngineDesync {
                index,
                mv: move_to_uci(expected),
                source,
            })?;

        if record.san != wanted.san {
            debug!(index, played = %record.san, expected = %wanted.san, "wrong move");
            let wrong = WrongMove {
                solution_index: index,
                expected: wanted.mv,
                played: record.mv,
            };
            if self.mode == PuzzleMode::Drill {
                self.state.failed = true;
                self.state.is_player_turn = false;
                if let Some(hook) = self.on_wrong_move.as_mut() {
                    hook(&wrong);
                }
            }
            return Ok(MoveVerdict::Wrong {
                expected: wrong.expected,
                played: wrong.played,
            });
        }

        self.position = record.position.clone();
        self.played.push(record);
        self.state.is_player_turn = false;
        if index + 1 >= self.solution.len() {
            self.state.completed = true;
            debug!("puzzle solved");
            return Ok(MoveVerdict::Solved);
        }

        self.state.solution_index += 1;
        let reply = self.advance(rules)?;
        if self.state.completed {
            return Ok(MoveVerdict::Solved);
        }
        Ok(MoveVerdict::Correct { reply })
    }

    /// Abandon the puzzle. Always succeeds.
    pub fn exit(&mut self) {
        self.state = PuzzleSessionState::default();
        self.solution.clear();
        self.played.clear();
        self.on_wrong_move = None;
        self.replied_at = None;
    }

    pub fn phase(&self) -> PuzzlePhase {
        let s = self.state;
        if s.completed {
            PuzzlePhase::Completed
        } else if s.failed {
            PuzzlePhase::Failed
        } else if !s.active {
            PuzzlePhase::Inactive
        } else if s.is_player_turn {
            PuzzlePhase::PlayerTurn
        } else {
            PuzzlePhase::OpponentTurn
        }
    }

    pub fn state(&self) -> PuzzleSessionState {
        self.state
    }

    pub fn mode(&self) -> PuzzleMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    pub fn is_failed(&self) -> bool {
        self.state.failed
    }

    /// Current puzzle position; only meaningful while active.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn solution(&self) -> &[Move] {
        &self.solution
    }

    /// Moves played in this puzzle so far, both sides.
    pub fn played(&self) -> &[MoveRecord] {
        &self.played
    }

    /// The move the player is expected to find next.
    pub fn expected_move(&self) -> Option<Move> {
        if self.phase() == PuzzlePhase::PlayerTurn {
            self.solution.get(self.state.solution_index).copied()
        } else {
            None
        }
    }
}

impl fmt::Debug for PuzzleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleSession")
            .field("mode", &self.mode)
            .field("solution", &self.solution)
            .field("state", &self.state)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "puzzle_tests.rs"]
mod puzzle_tests;
