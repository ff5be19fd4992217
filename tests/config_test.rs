//! Tests for loading engine configuration from disk.

use std::fs;
use tempfile::TempDir;

use quantum_games::{EngineConfig, SessionManager};
use quantum_tictactoe::Player;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("quantum.toml");
    fs::write(&path, content).expect("Failed to write TOML");
    path
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"
[rules]
max_collapse_options = 1
allow_duplicate_pairs = true

[logging]
filter = "quantum_tictactoe=debug"
"#,
    );

    let config = EngineConfig::load(Some(&path)).expect("Load failed");
    assert_eq!(config.rules().max_collapse_options, 1);
    assert!(config.rules().allow_duplicate_pairs);
    assert_eq!(config.logging().filter(), "quantum_tictactoe=debug");
}

#[test]
fn test_no_path_gives_defaults() {
    let config = EngineConfig::load(None).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_missing_file_is_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = EngineConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read"));
}

#[test]
fn test_malformed_file_is_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "[rules]\nmax_collapse_options = \"many\"\n");
    let err = EngineConfig::from_file(&path).unwrap_err();
    assert!(err.message.contains("Failed to parse"));
}

#[test]
fn test_loaded_rules_reach_games() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "[rules]\nmax_collapse_options = 1\n");
    let config = EngineConfig::from_file(&path).unwrap();

    let manager = SessionManager::new(*config.rules());
    manager.create_session("s".to_string()).unwrap();
    manager.make_quantum_move("s", 0, 4, Player::X).unwrap();
    manager.make_quantum_move("s", 4, 8, Player::O).unwrap();
    let response = manager.make_quantum_move("s", 8, 0, Player::X).unwrap();
    assert_eq!(response.collapse_options.map(|o| o.len()), Some(1));
}
