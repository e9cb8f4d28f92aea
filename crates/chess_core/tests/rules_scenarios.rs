//! Scenario tests for the shakmaty-backed rules engine
//!
//! These exercise the engine only through the `RulesEngine` trait, the
//! same way the explorer and drill crates consume it.

use chess_core::{parse_uci_line, parse_uci_move, Color, RulesEngine, RulesError, ShakmatyRules};

fn ranks(placement: &str) -> Vec<String> {
    placement.split('/').map(str::to_string).collect()
}

// =============================================================================
// Initial position
// =============================================================================

#[test]
fn test_e2e4_only_moves_the_e_pawn() {
    let rules = ShakmatyRules::new();
    let start = rules
        .load_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap();
    let after = rules.apply_move(&start, parse_uci_move("e2e4").unwrap()).unwrap();

    let before = ranks(start.placement());
    let now = ranks(after.position.placement());

    // FEN lists rank 8 first: index 7 is rank 1, index 6 rank 2, index 4 rank 4
    assert_eq!(before[7], now[7], "first rank is untouched");
    assert_eq!(now[6], "PPPP1PPP");
    assert_eq!(now[4], "4P3");
    for rank in [0, 1, 2, 3, 5] {
        assert_eq!(before[rank], now[rank]);
    }
    assert_eq!(after.position.side_to_move(), Some(Color::Black));
}

#[test]
fn test_replay_matches_stepwise_application() {
    let rules = ShakmatyRules::new();
    let start = rules.start_position();
    let line = parse_uci_line("d2d4 d7d5 c2c4 e7e6 b1c3 g8f6 c1g5 f8e7").unwrap();

    let mut pos = start.clone();
    let mut sans = Vec::new();
    for &mv in &line {
        let record = rules.apply_move(&pos, mv).unwrap();
        sans.push(record.san);
        pos = record.position;
    }

    assert_eq!(rules.position_from_moves(&start, &line).unwrap(), pos);
    assert_eq!(sans, ["d4", "d5", "c4", "e6", "Nc3", "Nf6", "Bg5", "Be7"]);
    assert_eq!(pos.fullmove_number(), 5);
}

// =============================================================================
// Rejections leave nothing behind
// =============================================================================

#[test]
fn test_illegal_moves_do_not_touch_the_input() {
    let rules = ShakmatyRules::new();
    let start = rules.start_position();
    let snapshot = start.clone();

    for txt in ["e2e5", "g1g3", "e1e2", "a7a6"] {
        let err = rules.apply_move(&start, parse_uci_move(txt).unwrap()).unwrap_err();
        assert!(matches!(err, RulesError::IllegalMove { .. }), "{txt}");
    }
    assert_eq!(start, snapshot);
}

#[test]
fn test_moving_into_check_is_illegal() {
    let rules = ShakmatyRules::new();
    // White king e1, black rook on e8 pins nothing but covers the e-file
    let pos = rules.load_position("4r1k1/8/8/8/8/8/8/3K4 w - - 0 1").unwrap();
    assert!(rules.apply_move(&pos, parse_uci_move("d1e1").unwrap()).is_err());
    assert!(rules.apply_move(&pos, parse_uci_move("d1c1").unwrap()).is_ok());
}
