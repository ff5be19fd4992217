//! Scripted games: a JSON list of steps replayed against one session.

use std::path::Path;

use derive_more::{Display, Error};
use quantum_tictactoe::{
    CollapseOption, CollapseResponse, GameSnapshot, MoveResponse, Player, WinReport,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::session::{SessionError, SessionManager};

/// A game script.
///
/// ```json
/// { "steps": [
///     { "type": "quantum_move", "player": "X", "squares": [0, 4] },
///     { "type": "quantum_move", "player": "O", "squares": [4, 8] },
///     { "type": "quantum_move", "player": "X", "squares": [8, 0] },
///     { "type": "collapse", "index": 0 }
/// ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReplayScript {
    /// Steps, in order.
    pub steps: Vec<ReplayStep>,
}

/// One scripted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Reset the board.
    NewGame,
    /// Place a quantum move.
    QuantumMove {
        /// The moving player.
        player: Player,
        /// Exactly two cell indices.
        squares: Vec<u8>,
    },
    /// Choose a collapse, either spelled out or by its index among the offered options.
    Collapse {
        /// The full option.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        option: Option<CollapseOption>,
        /// Position in the offered list.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    /// Take back the last accepted step.
    Undo,
}

/// Output of one successful step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepOutput {
    /// Result of `new_game` or `undo`.
    State(GameSnapshot),
    /// Result of `quantum_move`.
    Move(Box<MoveResponse>),
    /// Result of `collapse`.
    Collapse(Box<CollapseResponse>),
}

/// A step that failed, and why.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Step {} failed: {}", step, error)]
pub struct StepFailure {
    /// Zero-based index of the failing step.
    pub step: usize,
    /// The underlying error.
    #[error(source)]
    pub error: SessionError,
}

/// Script loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Script error: {} at {}:{}", message, file, line)]
pub struct ScriptError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScriptError {
    /// Creates a new script error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl ReplayScript {
    /// Loads a script from a JSON file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScriptError::new(format!("Failed to read script: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses a script from JSON text.
    pub fn from_json(content: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(content)
            .map_err(|e| ScriptError::new(format!("Failed to parse script: {}", e)))?;
        for (idx, step) in script.steps.iter().enumerate() {
            let ambiguous = matches!(
                step,
                ReplayStep::Collapse { option, index } if option.is_some() == index.is_some()
            );
            if ambiguous {
                return Err(ScriptError::new(format!(
                    "Step {}: collapse needs exactly one of `option` or `index`",
                    idx
                )));
            }
        }
        debug!(steps = script.steps.len(), "Script parsed");
        Ok(script)
    }

    /// JSON schema of the script format.
    pub fn schema() -> schemars::Schema {
        schemars::schema_for!(ReplayScript)
    }

    /// Runs every step against session `session_id`, handing each result to
    /// `on_step`. Stops at the first failure; on success returns the final
    /// win evaluation.
    #[instrument(skip(self, manager, on_step), fields(steps = self.steps.len()))]
    pub fn run(
        &self,
        manager: &SessionManager,
        session_id: &str,
        mut on_step: impl FnMut(usize, &StepOutput),
    ) -> Result<WinReport, StepFailure> {
        for (step, action) in self.steps.iter().enumerate() {
            let output = run_step(manager, session_id, action)
                .map_err(|error| StepFailure { step, error })?;
            on_step(step, &output);
        }

        let report = manager
            .get_winner(session_id)
            .map_err(|error| StepFailure {
                step: self.steps.len(),
                error,
            })?;
        info!(winner = ?report.winner, "Script finished");
        Ok(report)
    }
}

fn run_step(
    manager: &SessionManager,
    session_id: &str,
    step: &ReplayStep,
) -> Result<StepOutput, SessionError> {
    Ok(match step {
        ReplayStep::NewGame => StepOutput::State(manager.new_game(session_id)?),
        ReplayStep::Undo => StepOutput::State(manager.undo(session_id)?),
        ReplayStep::QuantumMove { player, squares } => StepOutput::Move(Box::new(
            manager.play_quantum(session_id, *player, squares.clone())?,
        )),
        ReplayStep::Collapse {
            option: Some(option),
            ..
        } => StepOutput::Collapse(Box::new(manager.choose_collapse(session_id, option)?)),
        ReplayStep::Collapse { index, .. } => StepOutput::Collapse(Box::new(
            manager.choose_collapse_index(session_id, index.unwrap_or_default())?,
        )),
    })
}
