//! Tests for scripted game replay.

use std::fs;
use tempfile::TempDir;

use quantum_games::{ReplayScript, ReplayStep, SessionError, SessionManager, StepOutput};
use quantum_tictactoe::{ReasonCode, Rules, Winner};

const TOP_ROW_WIN: &str = r#"{ "steps": [
    { "type": "quantum_move", "player": "X", "squares": [0, 1] },
    { "type": "quantum_move", "player": "O", "squares": [3, 6] },
    { "type": "quantum_move", "player": "X", "squares": [1, 2] },
    { "type": "quantum_move", "player": "O", "squares": [4, 7] },
    { "type": "quantum_move", "player": "X", "squares": [2, 0] },
    { "type": "collapse", "index": 0 }
] }"#;

fn session() -> SessionManager {
    let manager = SessionManager::new(Rules::default());
    manager.create_session("replay".to_string()).unwrap();
    manager
}

#[test]
fn test_script_runs_to_a_win() {
    let script = ReplayScript::from_json(TOP_ROW_WIN).unwrap();
    let manager = session();

    let mut seen = Vec::new();
    let report = script
        .run(&manager, "replay", |step, output| {
            seen.push((step, matches!(output, StepOutput::Collapse(_))))
        })
        .expect("Script failed");

    assert_eq!(seen.len(), 6);
    assert_eq!(seen.last(), Some(&(5, true)));
    assert_eq!(report.winner, Some(Winner::X));
    assert_eq!(report.x_score, 1.0);
    assert_eq!(report.o_score, 0.0);
}

#[test]
fn test_step_output_json_shape() {
    let script = ReplayScript::from_json(TOP_ROW_WIN).unwrap();
    let manager = session();

    let mut outputs = Vec::new();
    script
        .run(&manager, "replay", |_, output| {
            outputs.push(serde_json::to_value(output).unwrap())
        })
        .unwrap();

    assert_eq!(outputs[0]["move"]["id"], "X1");
    assert_eq!(outputs[0]["cycleDetected"], false);
    assert_eq!(outputs[4]["cycleDetected"], true);
    assert_eq!(outputs[4]["collapseChooser"], "O");
    assert_eq!(outputs[5]["winner"]["winner"], "X");
    assert_eq!(outputs[5]["gameState"]["status"], "finished");
}

#[test]
fn test_failure_names_the_step() {
    let script = ReplayScript::from_json(
        r#"{ "steps": [
            { "type": "quantum_move", "player": "X", "squares": [0, 1] },
            { "type": "quantum_move", "player": "X", "squares": [2, 3] }
        ] }"#,
    )
    .unwrap();
    let manager = session();

    let failure = script.run(&manager, "replay", |_, _| {}).unwrap_err();
    assert_eq!(failure.step, 1);
    let report = failure.error.engine_report().expect("engine error");
    assert_eq!(report.reason, ReasonCode::NotYourTurn);
    assert!(failure.to_string().starts_with("Step 1 failed"));
}

#[test]
fn test_unknown_session_fails_first_step() {
    let script = ReplayScript::from_json(TOP_ROW_WIN).unwrap();
    let manager = SessionManager::default();
    let failure = script.run(&manager, "nobody", |_, _| {}).unwrap_err();
    assert_eq!(failure.step, 0);
    assert_eq!(failure.error, SessionError::NotFound("nobody".to_string()));
}

#[test]
fn test_undo_and_new_game_steps() {
    let script = ReplayScript::from_json(
        r#"{ "steps": [
            { "type": "quantum_move", "player": "X", "squares": [0, 1] },
            { "type": "quantum_move", "player": "O", "squares": [1, 2] },
            { "type": "undo" },
            { "type": "quantum_move", "player": "O", "squares": [7, 8] },
            { "type": "new_game" }
        ] }"#,
    )
    .unwrap();
    assert_eq!(script.steps[2], ReplayStep::Undo);

    let manager = session();
    let mut move_counts = Vec::new();
    script
        .run(&manager, "replay", |_, output| {
            if let StepOutput::State(snapshot) = output {
                move_counts.push(snapshot.move_count);
            }
        })
        .unwrap();
    assert_eq!(move_counts, vec![1, 0]);
}

#[test]
fn test_collapse_step_needs_one_selector() {
    let both_missing = r#"{ "steps": [ { "type": "collapse" } ] }"#;
    let err = ReplayScript::from_json(both_missing).unwrap_err();
    assert!(err.message.contains("exactly one"));
}

#[test]
fn test_from_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("game.json");
    fs::write(&path, TOP_ROW_WIN).expect("Failed to write script");

    let script = ReplayScript::from_file(&path).unwrap();
    assert_eq!(script.steps.len(), 6);
    assert!(ReplayScript::from_file(dir.path().join("absent.json")).is_err());
}

#[test]
fn test_schema_describes_steps() {
    let schema = serde_json::to_string(&ReplayScript::schema()).unwrap();
    assert!(schema.contains("ReplayStep"));
    assert!(schema.contains("quantum_move"));
    assert!(schema.contains("squares"));
}
