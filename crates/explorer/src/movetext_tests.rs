use super::*;
use chess_core::{parse_uci_move, RulesEngine, ShakmatyRules};

fn play(tree: &mut GameTree, from: NodeId, txt: &str) -> NodeId {
    let rules = ShakmatyRules::new();
    tree.apply_move(&rules, from, parse_uci_move(txt).unwrap()).unwrap()
}

fn fresh() -> GameTree {
    GameTree::new(ShakmatyRules::new().start_position())
}

#[test]
fn test_empty_tree_renders_nothing() {
    let tree = fresh();
    assert_eq!(render(&tree), "");
    assert!(main_line_view(&tree).moves.is_empty());
}

#[test]
fn test_main_line_only() {
    let mut tree = fresh();
    let mut at = tree.root_id();
    for txt in ["e2e4", "e7e5", "g1f3"] {
        at = play(&mut tree, at, txt);
    }
    assert_eq!(render(&tree), "1.e4 e5 2.Nf3");
}

#[test]
fn test_black_variation_restarts_numbering() {
    let mut tree = fresh();
    let root = tree.root_id();
    let e4 = play(&mut tree, root, "e2e4");
    let e5 = play(&mut tree, e4, "e7e5");
    let nf3 = play(&mut tree, e5, "g1f3");
    play(&mut tree, nf3, "b8c6");
    let d5 = play(&mut tree, e4, "d7d5");
    play(&mut tree, d5, "e4d5");

    assert_eq!(render(&tree), "1.e4 e5 (1...d5 2.exd5) 2.Nf3 Nc6");
}

#[test]
fn test_white_variation_then_black_reply_gets_number() {
    let mut tree = fresh();
    let root = tree.root_id();
    let e4 = play(&mut tree, root, "e2e4");
    play(&mut tree, e4, "e7e5");
    play(&mut tree, root, "d2d4");

    assert_eq!(render(&tree), "1.e4 (1.d4) 1...e5");
}

#[test]
fn test_nested_variations_alternate_brackets() {
    let mut tree = fresh();
    let root = tree.root_id();
    let e4 = play(&mut tree, root, "e2e4");
    play(&mut tree, e4, "e7e5");
    let c5 = play(&mut tree, e4, "c7c5");
    play(&mut tree, c5, "g1f3");
    let c3 = play(&mut tree, c5, "c2c3");
    play(&mut tree, c3, "d7d5");
    play(&mut tree, c3, "g8f6");

    assert_eq!(
        render(&tree),
        "1.e4 e5 (1...c5 2.Nf3 [2.c3 d5 (2...Nf6)])"
    );

    let view = main_line_view(&tree);
    let first_var = &view.moves[1].alternatives[0];
    assert_eq!(first_var.depth, 1);
    let second = &first_var.moves[1].alternatives[0];
    assert_eq!(second.depth, 2);
    assert_eq!(second.moves[1].alternatives[0].depth, 3);
}

#[test]
fn test_line_view_lists_alternatives_in_creation_order() {
    let mut tree = fresh();
    let root = tree.root_id();
    play(&mut tree, root, "e2e4");
    let d4 = play(&mut tree, root, "d2d4");
    let c4 = play(&mut tree, root, "c2c4");

    let view = main_line_view(&tree);
    assert_eq!(view.moves.len(), 1);
    let heads: Vec<NodeId> = view.moves[0]
        .alternatives
        .iter()
        .map(|line| line.moves[0].node)
        .collect();
    assert_eq!(heads, vec![d4, c4]);
}

#[test]
fn test_format_helpers() {
    let mut tree = fresh();
    let root = tree.root_id();
    let e4 = play(&mut tree, root, "e2e4");
    play(&mut tree, e4, "e7e5");

    let line = main_line_view(&tree);
    let [e4, e5] = line.moves.as_slice() else {
        panic!("expected two moves, got {:?}", line.moves);
    };
    assert_eq!(format_move(e4), "1.e4");
    assert_eq!(format_move(e5), "e5");
    assert_eq!(format_variation_start(e4), "1.e4");
    assert_eq!(format_variation_start(e5), "1...e5");

    assert_eq!(brackets(1), ("(", ")"));
    assert_eq!(brackets(2), ("[", "]"));
    assert_eq!(brackets(3), ("(", ")"));
}
