use super::*;
use chess_core::{parse_uci_line, parse_uci_move, ShakmatyRules};
use std::cell::RefCell;
use std::rc::Rc;

const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

fn mv(txt: &str) -> Move {
    parse_uci_move(txt).unwrap()
}

fn pos(rules: &ShakmatyRules, fen: &str) -> Position {
    rules.load_position(fen).unwrap()
}

#[test]
fn test_new_session_is_inactive() {
    let session = PuzzleSession::new();
    assert_eq!(session.phase(), PuzzlePhase::Inactive);
    assert_eq!(session.state(), PuzzleSessionState::default());
    assert!(session.expected_move().is_none());
}

#[test]
fn test_single_move_drill_completes_on_first_move() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let reply = session
        .start(&rules, pos(&rules, AFTER_E4), vec![mv("e7e5")], PuzzleMode::Drill, None)
        .unwrap();
    assert!(reply.is_none());
    assert_eq!(session.phase(), PuzzlePhase::PlayerTurn);
    assert_eq!(session.expected_move(), Some(mv("e7e5")));

    let verdict = session.submit(&rules, mv("e7e5")).unwrap();
    assert_eq!(verdict, MoveVerdict::Solved);
    let state = session.state();
    assert!(state.completed);
    assert!(!state.is_player_turn);
    assert_eq!(session.phase(), PuzzlePhase::Completed);
}

#[test]
fn test_explore_mode_plays_opponent_first() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let solution = parse_uci_line("e2e4 e7e5 g1f3 b8c6").unwrap();
    let reply = session
        .start(&rules, rules.start_position(), solution, PuzzleMode::Explore, None)
        .unwrap();
    assert_eq!(reply.map(|r| r.san), Some("e4".to_string()));
    assert_eq!(session.state().solution_index, 1);
    assert_eq!(session.phase(), PuzzlePhase::PlayerTurn);

    match session.submit(&rules, mv("e7e5")).unwrap() {
        MoveVerdict::Correct { reply: Some(r) } => assert_eq!(r.san, "Nf3"),
        other => panic!("unexpected verdict {other:?}"),
    }
    assert_eq!(session.state().solution_index, 3);

    assert_eq!(session.submit(&rules, mv("b8c6")).unwrap(), MoveVerdict::Solved);
    let sans: Vec<&str> = session.played().iter().map(|r| r.san.as_str()).collect();
    assert_eq!(sans, ["e4", "e5", "Nf3", "Nc6"]);
}

#[test]
fn test_feeding_full_solution_in_drill_mode() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let solution = parse_uci_line("e2e4 e7e5 g1f3 b8c6 f1b5").unwrap();
    session
        .start(&rules, rules.start_position(), solution.clone(), PuzzleMode::Drill, None)
        .unwrap();

    // Player owns the even entries; the odd ones are auto-played
    for (i, &m) in solution.iter().enumerate().step_by(2) {
        let verdict = session.submit(&rules, m).unwrap();
        if i + 1 == solution.len() {
            assert_eq!(verdict, MoveVerdict::Solved);
        } else {
            assert!(matches!(verdict, MoveVerdict::Correct { reply: Some(_) }));
        }
    }
    assert!(session.is_completed());
    assert_eq!(session.played().len(), solution.len());
}

#[test]
fn test_solution_ending_with_opponent_move_completes() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let solution = parse_uci_line("e2e4 e7e5").unwrap();
    session
        .start(&rules, rules.start_position(), solution, PuzzleMode::Drill, None)
        .unwrap();
    assert_eq!(session.submit(&rules, mv("e2e4")).unwrap(), MoveVerdict::Solved);
    assert!(session.is_completed());
}

#[test]
fn test_wrong_move_in_drill_fails_and_fires_hook() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let seen: Rc<RefCell<Vec<WrongMove>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let hook: WrongMoveHook = Box::new(move |w: &WrongMove| sink.borrow_mut().push(*w));

    let start = pos(&rules, AFTER_E4);
    session
        .start(&rules, start.clone(), vec![mv("e7e5")], PuzzleMode::Drill, Some(hook))
        .unwrap();

    let verdict = session.submit(&rules, mv("c7c5")).unwrap();
    assert_eq!(
        verdict,
        MoveVerdict::Wrong {
            expected: mv("e7e5"),
            played: mv("c7c5"),
        }
    );
    assert_eq!(session.position(), &start);
    assert_eq!(session.phase(), PuzzlePhase::Failed);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].solution_index, 0);

    // No retry in drill mode
    assert_eq!(session.submit(&rules, mv("e7e5")), Err(PuzzleError::NotActive));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_wrong_move_in_explore_allows_retry() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let fired = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);
    let solution = parse_uci_line("e2e4 e7e5").unwrap();
    session
        .start(
            &rules,
            rules.start_position(),
            solution,
            PuzzleMode::Explore,
            Some(Box::new(move |_: &WrongMove| *counter.borrow_mut() += 1)),
        )
        .unwrap();
    let before = session.position().clone();

    assert!(matches!(
        session.submit(&rules, mv("d7d5")).unwrap(),
        MoveVerdict::Wrong { .. }
    ));
    assert_eq!(session.position(), &before);
    assert_eq!(session.phase(), PuzzlePhase::PlayerTurn);
    assert_eq!(*fired.borrow(), 0);

    assert_eq!(session.submit(&rules, mv("e7e5")).unwrap(), MoveVerdict::Solved);
}

#[test]
fn test_illegal_move_changes_nothing() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    session
        .start(&rules, pos(&rules, AFTER_E4), vec![mv("e7e5")], PuzzleMode::Drill, None)
        .unwrap();
    let state = session.state();

    let err = session.submit(&rules, mv("e7e2")).unwrap_err();
    assert!(matches!(err, PuzzleError::IllegalMove(_)));
    assert_eq!(session.state(), state);
    assert_eq!(session.phase(), PuzzlePhase::PlayerTurn);
}

#[test]
fn test_empty_solution_is_rejected() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let err = session
        .start(&rules, rules.start_position(), Vec::new(), PuzzleMode::Drill, None)
        .unwrap_err();
    assert_eq!(err, PuzzleError::EmptySolution);
    assert_eq!(session.phase(), PuzzlePhase::Inactive);
}

#[test]
fn test_illegal_opponent_move_is_engine_desync() {
    let rules = ShakmatyRules::new();

    let mut session = PuzzleSession::new();
    let err = session
        .start(&rules, rules.start_position(), vec![mv("e7e5")], PuzzleMode::Explore, None)
        .unwrap_err();
    assert!(matches!(err, PuzzleError::EngineDesync { index: 0, .. }));
    assert_eq!(session.phase(), PuzzlePhase::Inactive);

    // Reply that cannot be played after a correct player move
    let solution = parse_uci_line("e2e4 e2e4 g1f3").unwrap();
    session
        .start(&rules, rules.start_position(), solution, PuzzleMode::Drill, None)
        .unwrap();
    let err = session.submit(&rules, mv("e2e4")).unwrap_err();
    assert!(matches!(err, PuzzleError::EngineDesync { index: 1, .. }));
    assert!(!session.is_active());
}

#[test]
fn test_advance_never_replays_an_entry() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let solution = parse_uci_line("e2e4 e7e5 g1f3 b8c6").unwrap();
    session
        .start(&rules, rules.start_position(), solution, PuzzleMode::Explore, None)
        .unwrap();

    for _ in 0..3 {
        assert_eq!(session.advance(&rules).unwrap(), None);
    }
    assert_eq!(session.played().len(), 1);
    assert_eq!(session.state().solution_index, 1);
}

#[test]
fn test_not_player_turn_before_reply() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let solution = parse_uci_line("e2e4 e7e5").unwrap();
    session
        .start(&rules, rules.start_position(), solution, PuzzleMode::Drill, None)
        .unwrap();
    // Force the opponent's turn by hand: the reply has been played already
    session.state.is_player_turn = false;
    assert_eq!(session.submit(&rules, mv("e2e4")), Err(PuzzleError::NotPlayerTurn));
}

#[test]
fn test_bare_promotion_matches_queen_solution() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    let start = pos(&rules, "8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
    session
        .start(&rules, start, vec![mv("e7e8q")], PuzzleMode::Drill, None)
        .unwrap();
    assert_eq!(session.submit(&rules, mv("e7e8")).unwrap(), MoveVerdict::Solved);
}

#[test]
fn test_exit_resets_from_any_state() {
    let rules = ShakmatyRules::new();
    let mut session = PuzzleSession::new();
    session
        .start(&rules, pos(&rules, AFTER_E4), vec![mv("e7e5")], PuzzleMode::Drill, None)
        .unwrap();
    session.exit();
    assert_eq!(session.phase(), PuzzlePhase::Inactive);
    assert!(session.solution().is_empty());
    assert_eq!(session.submit(&rules, mv("e7e5")), Err(PuzzleError::NotActive));

    session.exit();
    assert_eq!(session.phase(), PuzzlePhase::Inactive);
}
