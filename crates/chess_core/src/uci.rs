use crate::{error::RulesError, types::*};
use std::fmt;
use std::str::FromStr;

pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::new();
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.promo {
        s.push(p.to_char());
    }
    s
}

/// Parse coordinate notation (`e2e4`, `e7e8q`).
///
/// This is purely syntactic; legality is the rules engine's business.
pub fn parse_uci_move(txt: &str) -> Result<Move, RulesError> {
    let txt = txt.trim();
    let invalid = || RulesError::InvalidNotation(txt.to_string());
    if !txt.is_ascii() || txt.len() < 4 || txt.len() > 5 {
        return Err(invalid());
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(invalid)?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(invalid)?;
    let promo = match txt[4..].chars().next() {
        Some(c) => Some(PieceKind::promotion_from_char(c).ok_or_else(invalid)?),
        None => None,
    };
    if from == to {
        return Err(invalid());
    }
    Ok(Move { from, to, promo })
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&move_to_uci(*self))
    }
}

impl FromStr for Move {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uci_move(s)
    }
}

/// Parse a whitespace separated list of UCI moves.
pub fn parse_uci_line(txt: &str) -> Result<Vec<Move>, RulesError> {
    txt.split_whitespace().map(parse_uci_move).collect()
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
