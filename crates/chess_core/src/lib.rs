pub mod error;
pub mod rules;
pub mod time_control;
pub mod types;
pub mod uci;

pub use error::*;
pub use rules::ShakmatyRules;
pub use time_control::*;
pub use types::*;
pub use uci::*;

// =============================================================================
// Rules engine trait: the only source of legality, positions and notation
// =============================================================================

/// Chess rules consumed by the tree explorer and the puzzle drills.
///
/// Implementations decide legality, derive resulting positions and produce
/// standard notation. Callers never construct positions themselves beyond
/// wrapping FEN text they intend to hand to [`load_position`].
///
/// [`load_position`]: RulesEngine::load_position
pub trait RulesEngine {
    /// Validate a FEN and return it in the engine's canonical form.
    fn load_position(&self, fen: &str) -> RulesResult<Position>;

    /// Apply `mv` to `position`.
    ///
    /// # Returns
    /// The move as the engine interpreted it, the resulting position and the
    /// SAN string, or [`RulesError::IllegalMove`].
    fn apply_move(&self, position: &Position, mv: Move) -> RulesResult<MoveRecord>;

    /// Squares holding pieces of `side` that attack `square`.
    fn attackers(&self, position: &Position, square: Square, side: Color) -> RulesResult<Vec<Square>>;

    /// The standard initial position.
    fn start_position(&self) -> Position {
        Position::from_fen(STARTPOS_FEN)
    }

    /// Replay `moves` from `start`, failing on the first illegal one.
    fn position_from_moves(&self, start: &Position, moves: &[Move]) -> RulesResult<Position> {
        moves
            .iter()
            .try_fold(start.clone(), |pos, &mv| Ok(self.apply_move(&pos, mv)?.position))
    }
}

impl<R: RulesEngine + ?Sized> RulesEngine for &R {
    fn load_position(&self, fen: &str) -> RulesResult<Position> {
        (**self).load_position(fen)
    }

    fn apply_move(&self, position: &Position, mv: Move) -> RulesResult<MoveRecord> {
        (**self).apply_move(position, mv)
    }

    fn attackers(&self, position: &Position, square: Square, side: Color) -> RulesResult<Vec<Square>> {
        (**self).attackers(position, square, side)
    }

    fn start_position(&self) -> Position {
        (**self).start_position()
    }
}
