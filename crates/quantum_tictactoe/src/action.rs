//! First-class actions and the events they produce.
//!
//! Actions are the player's intent. They serialize, so a game can be
//! recorded and replayed.

use serde::{Deserialize, Serialize};

use super::collapse::{CollapseOption, CollapseResults};
use super::rules::WinReport;
use super::state::{GameState, PendingCollapse};
use super::types::{Player, QuantumMove};

/// Something a player asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Throw the board away and start over.
    NewGame,
    /// Place a quantum mark on two cells.
    QuantumMove {
        /// The moving player.
        player: Player,
        /// Cell indices; exactly two are accepted.
        squares: Vec<u8>,
    },
    /// Resolve the pending cycle with one of the offered options.
    ChooseCollapse {
        /// The chosen option.
        option: CollapseOption,
    },
}

impl Action {
    /// Quantum move on `a` and `b`.
    pub fn quantum(player: Player, a: u8, b: u8) -> Self {
        Action::QuantumMove {
            player,
            squares: vec![a, b],
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::NewGame => write!(f, "new game"),
            Action::QuantumMove { player, squares } => write!(f, "{} -> {:?}", player, squares),
            Action::ChooseCollapse { option } => write!(f, "collapse {} moves", option.len()),
        }
    }
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The game was reset.
    Reset,
    /// A quantum move was recorded.
    MovePlaced {
        /// The recorded move.
        #[serde(rename = "move")]
        placed: QuantumMove,
        /// The collapse it forced, if it closed a cycle.
        pending: Option<PendingCollapse>,
    },
    /// A collapse was committed.
    Collapsed {
        /// Resolved moves and new classical marks.
        results: CollapseResults,
        /// Board evaluation after the collapse.
        report: WinReport,
    },
}

/// Result of a successful [`reduce`](super::reduce).
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The state after the action.
    pub state: GameState,
    /// What happened.
    pub event: Event,
}
