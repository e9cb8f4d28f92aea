use super::*;

#[test]
fn test_coord_conversion() {
    assert_eq!(coord_to_sq("a1"), Some(0));
    assert_eq!(coord_to_sq("h8"), Some(63));
    assert_eq!(coord_to_sq("e4"), Some(28));
    assert_eq!(coord_to_sq("E4"), Some(28));
    assert_eq!(coord_to_sq("i1"), None);
    assert_eq!(coord_to_sq("e9"), None);
    assert_eq!(coord_to_sq("e"), None);

    assert_eq!(sq_to_coord(28), "e4");
    assert_eq!(sq(4, 3), Some(28));
    assert_eq!(sq(8, 0), None);
    assert_eq!(file_of(28), 4);
    assert_eq!(rank_of(28), 3);
}

#[test]
fn test_position_fields() {
    let pos = Position::from_fen(STARTPOS_FEN);
    assert_eq!(pos.placement(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    assert_eq!(pos.side_to_move(), Some(Color::White));
    assert_eq!(pos.fullmove_number(), 1);

    let black = Position::from_fen("8/8/8/4k3/8/4K3/8/8 b - - 12 40");
    assert_eq!(black.side_to_move(), Some(Color::Black));
    assert_eq!(black.fullmove_number(), 40);
}

#[test]
fn test_position_equality_is_textual() {
    let a = Position::from_fen(STARTPOS_FEN);
    let b = Position::from_fen(STARTPOS_FEN.to_string());
    let c = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 2");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_color_parsing() {
    assert_eq!("white".parse::<Color>(), Ok(Color::White));
    assert_eq!("B".parse::<Color>(), Ok(Color::Black));
    assert!("red".parse::<Color>().is_err());
    assert_eq!(Color::White.other(), Color::Black);
    assert_eq!(Color::Black.to_string(), "black");
}

#[test]
fn test_promotion_chars() {
    assert_eq!(PieceKind::promotion_from_char('Q'), Some(PieceKind::Queen));
    assert_eq!(PieceKind::promotion_from_char('n'), Some(PieceKind::Knight));
    assert_eq!(PieceKind::promotion_from_char('k'), None);
    assert_eq!(PieceKind::Rook.to_char(), 'r');
}
