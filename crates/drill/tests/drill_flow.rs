//! End-to-end drill runs against the real rules engine

use std::time::Duration;

use chess_core::{parse_uci_move, Color, ManualClock, RulesEngine, ShakmatyRules};
use drill::{
    DrillConfig, DrillEngine, DrillEvent, DrillLog, EndReason, MemorySource, MemoryStore,
    MoveVerdict, PuzzleMode, PuzzleRecord, PuzzleSession,
};

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn record(id: &str, fen: &str, setup: &str, solution: &str) -> PuzzleRecord {
    PuzzleRecord {
        id: id.to_string(),
        fen: fen.to_string(),
        setup_move: setup.to_string(),
        solution: vec![solution.to_string()],
        rating: 1500,
        themes: vec!["mateIn1".to_string()],
        game_url: "https://lichess.org/training".to_string(),
    }
}

/// Mate-in-one puzzles for both sides
fn source() -> MemorySource {
    MemorySource::new([
        // Player is White: 1.e4 e5 2.Bc4 Nc6 3.Qh5, setup ...Nf6, then Qxf7#
        record(
            "scholar",
            "r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 3 3",
            "g8f6",
            "h5f7",
        ),
        // Player is Black: setup 3.g4, then ...Qh4#
        record(
            "fools",
            "rnbqkbnr/pppp1ppp/8/4p3/8/5P2/PPPPP1PP/RNBQKBNR w KQkq - 0 2",
            "g2g4",
            "d8h4",
        ),
    ])
}

#[test]
fn test_single_move_puzzle_completes_on_first_player_move() {
    let rules = ShakmatyRules::new();
    let after_e4 = rules
        .apply_move(&rules.load_position(START).unwrap(), parse_uci_move("e2e4").unwrap())
        .unwrap()
        .position;

    let mut session = PuzzleSession::new();
    session
        .start(&rules, after_e4, vec![parse_uci_move("e7e5").unwrap()], PuzzleMode::Drill, None)
        .unwrap();
    let verdict = session.submit(&rules, parse_uci_move("e7e5").unwrap()).unwrap();
    assert_eq!(verdict, MoveVerdict::Solved);
    assert!(session.state().completed);
}

#[test]
fn test_mate_in_one_drill_for_either_side() {
    for seed in 0..6 {
        let clock = ManualClock::new(0);
        let mut engine = DrillEngine::new(
            ShakmatyRules::new(),
            clock.clone(),
            MemoryStore::new(),
            DrillConfig::default(),
            seed,
        );
        engine.start(&source()).unwrap();

        let answer = match engine.player_side() {
            Color::White => "h5f7",
            Color::Black => "d8h4",
        };
        clock.advance(Duration::from_secs(3));
        let events = engine.submit_move(parse_uci_move(answer).unwrap()).unwrap();

        match events.as_slice() {
            [DrillEvent::Solved { time_ms, rating, .. }, DrillEvent::Ended { reason, results }] => {
                assert_eq!(*time_ms, 3_000);
                assert_eq!(*rating, 301);
                assert_eq!(*reason, EndReason::QueueExhausted);
                assert_eq!(results.len(), 1);
            }
            other => panic!("seed {seed}: unexpected events {other:?}"),
        }
        assert_eq!(DrillLog::load(engine.store()).unwrap().len(), 1);
    }
}

#[test]
fn test_results_length_matches_attempts() {
    let puzzles: Vec<PuzzleRecord> = (0..20)
        .map(|i| record(&format!("p{i}"), START, "e2e4", "e7e5"))
        .collect();
    let clock = ManualClock::new(0);
    let mut engine = DrillEngine::new(
        ShakmatyRules::new(),
        clock.clone(),
        MemoryStore::new(),
        DrillConfig::default(),
        9,
    );
    let ticket = engine.begin();
    engine.populate(ticket, puzzles).unwrap();

    let right = parse_uci_move("e7e5").unwrap();
    let wrong = parse_uci_move("c7c5").unwrap();
    let plan = [true, true, false, true, false, false, true];
    for &ok in &plan {
        clock.advance(Duration::from_secs(2));
        engine.submit_move(if ok { right } else { wrong }).unwrap();
    }

    let successes = plan.iter().filter(|&&ok| ok).count() as i64;
    let failures = plan.len() as i64 - successes;
    assert_eq!(engine.results().len(), plan.len());
    assert_eq!(engine.rating(), 300 + successes - failures);

    clock.advance(Duration::from_secs(180));
    let events = engine.tick();
    assert!(matches!(
        events.as_slice(),
        [DrillEvent::Ended { reason: EndReason::TimeUp, results }] if results.len() == plan.len()
    ));
    let log = DrillLog::load(engine.store()).unwrap();
    assert_eq!(log.entries[0].results.len(), plan.len());
}
