//! Quantum Games - session host for the quantum tic-tac-toe engine
//!
//! Wraps [`quantum_tictactoe`] with everything needed to run games outside
//! a test harness.
//!
//! # Architecture
//!
//! - **Session**: named games behind per-session locks
//! - **Config**: TOML rule and logging settings
//! - **Script**: JSON game scripts replayed against a session
//! - **Play**: a line-oriented interactive loop
//!
//! # Example
//!
//! ```
//! use quantum_games::SessionManager;
//! use quantum_tictactoe::{Player, Rules};
//!
//! let manager = SessionManager::new(Rules::default());
//! manager.create_session("demo".to_string()).unwrap();
//! manager.make_quantum_move("demo", 0, 4, Player::X).unwrap();
//! manager.make_quantum_move("demo", 4, 8, Player::O).unwrap();
//! let response = manager.make_quantum_move("demo", 8, 0, Player::X).unwrap();
//! assert!(response.cycle_detected);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod play;
mod script;
mod session;

// Crate-level exports - Command line
pub use cli::{Cli, Command};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig, LoggingConfig};

// Crate-level exports - Interactive play
pub use play::{ParseCommandError, PlayCommand, error_json, run as run_play};

// Crate-level exports - Scripts
pub use script::{ReplayScript, ReplayStep, ScriptError, StepFailure, StepOutput};

// Crate-level exports - Session management
pub use session::{GameSession, SessionError, SessionId, SessionManager};
