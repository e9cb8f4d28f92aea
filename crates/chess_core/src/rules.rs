//! Rules engine backed by shakmaty.
//!
//! Positions cross this boundary as FEN text; each call parses the FEN,
//! consults shakmaty and serialises the result back.

use shakmaty::{
    fen::Fen, san::SanPlus, uci::UciMove, CastlingMode, Chess, EnPassantMode, Position as _,
};
use tracing::trace;

use crate::error::{RulesError, RulesResult};
use crate::types::{Color, Move, MoveRecord, PieceKind, Position, Square};
use crate::uci::{move_to_uci, parse_uci_move};
use crate::RulesEngine;

/// Standard chess rules via the `shakmaty` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, fen: &str) -> RulesResult<Chess> {
        let invalid = |reason: String| RulesError::InvalidPosition {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))
    }

    fn to_position(chess: &Chess) -> Position {
        Position::from_fen(Fen::from_position(chess.clone(), EnPassantMode::Legal).to_string())
    }

    fn resolve(&self, chess: &Chess, mv: Move) -> Option<shakmaty::Move> {
        let uci: UciMove = move_to_uci(mv).parse().ok()?;
        uci.to_move(chess).ok()
    }
}

impl RulesEngine for ShakmatyRules {
    fn load_position(&self, fen: &str) -> RulesResult<Position> {
        let chess = self.parse(fen)?;
        Ok(Self::to_position(&chess))
    }

    fn apply_move(&self, position: &Position, mv: Move) -> RulesResult<MoveRecord> {
        let chess = self.parse(position.as_fen())?;

        // Bare pawn moves onto the last rank are promoted to a queen.
        let resolved = self.resolve(&chess, mv).or_else(|| match mv.promo {
            None => self.resolve(&chess, Move::with_promo(mv.from, mv.to, PieceKind::Queen)),
            Some(_) => None,
        });
        let m = resolved.ok_or_else(|| RulesError::IllegalMove {
            mv: move_to_uci(mv),
            fen: position.as_fen().to_string(),
        })?;

        let played = UciMove::from_move(&m, CastlingMode::Standard).to_string();
        let normalised = parse_uci_move(&played)?;

        let mut next = chess;
        let san = SanPlus::from_move_and_play_unchecked(&mut next, &m).to_string();
        trace!(uci = %played, %san, "move applied");

        Ok(MoveRecord {
            mv: normalised,
            position: Self::to_position(&next),
            san,
        })
    }

    fn attackers(&self, position: &Position, square: Square, side: Color) -> RulesResult<Vec<Square>> {
        if square >= 64 {
            return Err(RulesError::InvalidNotation(format!("square index {square}")));
        }
        let chess = self.parse(position.as_fen())?;
        let board = chess.board();
        let target = shakmaty::Square::new(u32::from(square));
        let attacker = match side {
            Color::White => shakmaty::Color::White,
            Color::Black => shakmaty::Color::Black,
        };
        let mut squares: Vec<Square> = board
            .attacks_to(target, attacker, board.occupied())
            .into_iter()
            .map(|s| u32::from(s) as Square)
            .collect();
        squares.sort_unstable();
        Ok(squares)
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
