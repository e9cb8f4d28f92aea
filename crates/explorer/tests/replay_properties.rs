//! Tree properties checked over many insertion orders of a fixed opening set.
//!
//! Each run shuffles the lines with a seeded RNG, grows a tree from them and
//! then checks the branching and replay guarantees against the rules engine.

use std::collections::HashSet;

use chess_core::{parse_uci_line, Move, RulesEngine, ShakmatyRules};
use explorer::navigation::{go_forward, go_to_start, CurrentPath};
use explorer::{GameTree, NodeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const LINES: &[&str] = &[
    "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6",
    "e2e4 c7c5 g1f3 d7d6 d2d4 c5d4",
    "d2d4 d7d5 c2c4 e7e6 b1c3 g8f6",
    "e2e4 e7e5 g1f3 g8f6",
    "c2c4 e7e5 b1c3 g8f6",
    "e2e4 e7e6 d2d4 d7d5",
    "d2d4 g8f6 c2c4 e7e6 b1c3 f8b4",
];

fn lines() -> Vec<Vec<Move>> {
    LINES.iter().map(|l| parse_uci_line(l).unwrap()).collect()
}

fn grow(rules: &ShakmatyRules, order: &[Vec<Move>]) -> GameTree {
    let mut tree = GameTree::new(rules.start_position());
    for line in order {
        let mut at = tree.root_id();
        for &mv in line {
            at = tree.apply_move(rules, at, mv).unwrap();
        }
    }
    tree
}

fn shuffled(seed: u64) -> Vec<Vec<Move>> {
    let mut order = lines();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    order
}

#[test]
fn test_every_node_matches_independent_replay() {
    let rules = ShakmatyRules::new();
    for seed in 0..8 {
        let tree = grow(&rules, &shuffled(seed));
        for node in tree.nodes() {
            let moves = tree.moves_to(node.id).unwrap();
            let replayed = rules.position_from_moves(&tree.root().position, &moves).unwrap();
            assert_eq!(replayed, node.position, "seed {seed}, node {}", node.id);
        }
    }
}

#[test]
fn test_node_count_equals_distinct_prefixes() {
    let rules = ShakmatyRules::new();
    let mut prefixes = HashSet::new();
    for line in lines() {
        for len in 1..=line.len() {
            prefixes.insert(line[..len].to_vec());
        }
    }
    for seed in 0..8 {
        let tree = grow(&rules, &shuffled(seed));
        assert_eq!(tree.len(), prefixes.len() + 1, "seed {seed}");
    }
}

#[test]
fn test_regrowing_is_idempotent() {
    let rules = ShakmatyRules::new();
    for seed in 0..4 {
        let order = shuffled(seed);
        let once = grow(&rules, &order);

        let mut twice = once.clone();
        for line in shuffled(seed + 100) {
            let mut at = twice.root_id();
            for mv in line {
                at = twice.apply_move(&rules, at, mv).unwrap();
            }
        }
        let ids_once: Vec<NodeId> = once.nodes().map(|n| n.id).collect();
        let ids_twice: Vec<NodeId> = twice.nodes().map(|n| n.id).collect();
        assert_eq!(ids_once, ids_twice, "seed {seed}");
        assert_eq!(once.main_line(), twice.main_line());
    }
}

#[test]
fn test_first_line_played_is_the_main_line() {
    let rules = ShakmatyRules::new();
    for seed in 0..8 {
        let order = shuffled(seed);
        let tree = grow(&rules, &order);
        let main: Vec<Move> = tree.main_line().iter().filter_map(|n| n.mv).collect();
        assert_eq!(main, order[0], "seed {seed}");
    }
}

#[test]
fn test_root_variations_follow_first_appearance() {
    let rules = ShakmatyRules::new();
    for seed in 0..8 {
        let order = shuffled(seed);
        let tree = grow(&rules, &order);

        let mut expected: Vec<Move> = Vec::new();
        for line in &order {
            if !expected.contains(&line[0]) {
                expected.push(line[0]);
            }
        }
        let actual: Vec<Move> = tree
            .variations_at(tree.root_id())
            .unwrap()
            .iter()
            .filter_map(|c| tree.node(c.head).and_then(|n| n.mv))
            .collect();
        assert_eq!(actual, expected, "seed {seed}");
    }
}

#[test]
fn test_start_then_forward_walks_main_line() {
    let rules = ShakmatyRules::new();
    for seed in 0..8 {
        let tree = grow(&rules, &shuffled(seed));
        // Begin deep inside whatever line was played last
        let mut path = go_to_start(&tree, &CurrentPath::to(&tree, tree.current_id()).unwrap());

        let mut walked = Vec::new();
        loop {
            let next = go_forward(&tree, &path);
            if next == path {
                break;
            }
            walked.push(next.current());
            path = next;
        }
        let main: Vec<NodeId> = tree.main_line().iter().map(|n| n.id).collect();
        assert_eq!(walked, main, "seed {seed}");
    }
}
