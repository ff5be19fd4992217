//! Game state and its serializable snapshot.

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::collapse::CollapseOption;
use super::cycle::Cycle;
use super::graph::Entanglement;
use super::ledger::MoveLedger;
use super::types::{Player, QuantumMove};

/// Default cap on how many collapse options are offered.
pub const DEFAULT_MAX_COLLAPSE_OPTIONS: usize = 8;

/// Tunable rule settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Rules {
    /// Most collapse options offered for a single cycle (at least 1).
    pub max_collapse_options: usize,
    /// Accept a second unresolved move on the same two cells.
    pub allow_duplicate_pairs: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_collapse_options: DEFAULT_MAX_COLLAPSE_OPTIONS,
            allow_duplicate_pairs: false,
        }
    }
}

impl Rules {
    /// Clamps settings into their valid range.
    pub fn normalized(mut self) -> Self {
        self.max_collapse_options = self.max_collapse_options.max(1);
        self
    }
}

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Waiting for a quantum move.
    InProgress,
    /// A cycle closed; waiting for the chooser to pick a collapse.
    AwaitingCollapse,
    /// Someone won or the board is blocked.
    Finished,
}

/// A cycle waiting for its collapse choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCollapse {
    /// The cycle that closed.
    pub cycle: Cycle,
    /// Player whose move closed it.
    pub creator: Player,
    /// Player who picks the resolution.
    pub chooser: Player,
    /// The resolutions on offer.
    pub options: Vec<CollapseOption>,
}

/// Complete engine state for one game.
///
/// Transitions go through [`reduce`](super::reduce), which never mutates
/// its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) ledger: MoveLedger,
    pub(crate) current_player: Player,
    pub(crate) status: GameStatus,
    pub(crate) pending: Option<PendingCollapse>,
    pub(crate) rules: Rules,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl GameState {
    /// Fresh game, X to move.
    pub fn new(rules: Rules) -> Self {
        Self {
            ledger: MoveLedger::new(),
            current_player: Player::X,
            status: GameStatus::InProgress,
            pending: None,
            rules: rules.normalized(),
        }
    }

    /// The move ledger.
    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    /// Player to act next (the chooser while a collapse is pending).
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The cycle awaiting a collapse choice, if any.
    pub fn pending(&self) -> Option<&PendingCollapse> {
        self.pending.as_ref()
    }

    /// Rule settings in force.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Builds the serializable snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.ledger.board(),
            moves: self.ledger.moves().to_vec(),
            entanglements: self.ledger.entanglements(),
            move_count: self.ledger.move_count(),
            current_player: self.current_player,
            pending: self.pending.clone(),
            status: self.status,
        }
    }
}

/// Read-only view of a game, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// The 3x3 projection.
    pub board: Board,
    /// Every quantum move, resolved ones included.
    pub moves: Vec<QuantumMove>,
    /// Entanglements among unresolved moves.
    pub entanglements: Vec<Entanglement>,
    /// Number of quantum moves played.
    pub move_count: usize,
    /// Player to act next.
    pub current_player: Player,
    /// Collapse awaiting a choice.
    pub pending: Option<PendingCollapse>,
    /// Where the game stands.
    pub status: GameStatus,
}
