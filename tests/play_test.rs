//! Tests for the interactive play loop.

use std::io::Cursor;

use quantum_games::{SessionManager, run_play};
use quantum_tictactoe::{Player, Rules};

fn play(input: &str) -> (SessionManager, String) {
    let manager = SessionManager::new(Rules::default());
    manager.create_session("p".to_string()).unwrap();
    let mut output = Vec::new();
    run_play(&manager, "p", Cursor::new(input), &mut output).expect("Play loop failed");
    (manager, String::from_utf8(output).unwrap())
}

#[test]
fn test_moves_alternate_players() {
    let (manager, output) = play("q 0 4\nq 4 8\n");
    let moves = manager.get_moves("p").unwrap();
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[0].player(), Player::X);
    assert_eq!(moves[1].player(), Player::O);
    assert!(output.contains("\"cycleDetected\": false"));
}

#[test]
fn test_cycle_then_collapse() {
    let (manager, output) = play("q 0 4\nq 4 8\nq 8 0\nc 0\n");
    assert!(output.contains("O chooses a collapse"));
    assert!(output.contains("collapseResults"));
    assert_eq!(manager.get_state("p").unwrap().board.non_classical_count(), 6);
}

#[test]
fn test_errors_do_not_end_the_loop() {
    let (manager, output) = play("q 4 4\nbogus\nq 0 4\n");
    assert!(output.contains("duplicate_squares"));
    assert!(output.contains("Unrecognized command"));
    assert_eq!(manager.get_state("p").unwrap().move_count, 1);
}

#[test]
fn test_quit_stops_reading() {
    let (manager, _) = play("q 0 4\nquit\nq 4 8\n");
    assert_eq!(manager.get_state("p").unwrap().move_count, 1);
}

#[test]
fn test_chooser_moves_after_collapse() {
    let (manager, _) = play("q 0 4\nq 4 8\nq 8 0\nc 0\nq 1 2\n");
    let moves = manager.get_moves("p").unwrap();
    assert_eq!(moves.len(), 4);
    assert_eq!(moves[3].player(), Player::O);
    assert_eq!(manager.get_state("p").unwrap().current_player, Player::X);
}
