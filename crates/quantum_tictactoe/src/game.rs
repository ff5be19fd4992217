//! Stateful game wrapper exposing the engine's operations.

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::action::{Action, Event};
use super::collapse::{CollapseOption, CollapseResults};
use super::error::{EngineError, InternalInvariantError, StateError};
use super::graph::Entanglement;
use super::reducer::reduce;
use super::rules::{self, WinReport};
use super::state::{GameSnapshot, GameState, Rules};
use super::types::{Player, QuantumMove};

/// Result of [`Game::make_quantum_move`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    /// The recorded move.
    #[serde(rename = "move")]
    pub placed: QuantumMove,
    /// Whether the move closed a cycle.
    pub cycle_detected: bool,
    /// Player whose move closed the cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_creator: Option<Player>,
    /// Player who must choose the collapse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse_chooser: Option<Player>,
    /// Resolutions on offer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse_options: Option<Vec<CollapseOption>>,
    /// State after the move.
    pub game_state: GameSnapshot,
}

/// Result of [`Game::choose_collapse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapseResponse {
    /// Resolved moves and new classical marks.
    pub collapse_results: CollapseResults,
    /// Board evaluation after the collapse.
    pub winner: WinReport,
    /// State after the collapse.
    pub game_state: GameSnapshot,
}

/// One game: the current state plus every action accepted since the
/// last reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    state: GameState,
    history: Vec<Action>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Game {
    /// Creates an empty game under `rules`.
    #[instrument]
    pub fn new(rules: Rules) -> Self {
        Self {
            state: GameState::new(rules),
            history: Vec::new(),
        }
    }

    /// Rebuilds a game by applying `actions` to a fresh state.
    #[instrument(skip(actions), fields(actions = actions.len()))]
    pub fn replay(rules: Rules, actions: &[Action]) -> Result<Self, EngineError> {
        let mut game = Self::new(rules);
        for action in actions {
            game.dispatch(action.clone())?;
        }
        debug!(history = game.history.len(), "Replayed");
        Ok(game)
    }

    /// Current engine state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Actions accepted since the last reset.
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Applies any action and records it.
    ///
    /// A reset clears the history instead of joining it.
    pub fn dispatch(&mut self, action: Action) -> Result<Event, EngineError> {
        let transition = reduce(&self.state, &action)?;
        self.state = transition.state;
        match action {
            Action::NewGame => self.history.clear(),
            other => self.history.push(other),
        }
        Ok(transition.event)
    }

    /// Resets to an empty board with X to move.
    pub fn new_game(&mut self) -> Result<GameSnapshot, EngineError> {
        self.dispatch(Action::NewGame)?;
        Ok(self.get_state())
    }

    /// Places a quantum mark for `player` on two cells.
    pub fn make_quantum_move(
        &mut self,
        square1: u8,
        square2: u8,
        player: Player,
    ) -> Result<MoveResponse, EngineError> {
        self.play_quantum(player, vec![square1, square2])
    }

    /// Places a quantum mark from a raw square list; anything but two
    /// squares is rejected.
    #[instrument(skip(self))]
    pub fn play_quantum(&mut self, player: Player, squares: Vec<u8>) -> Result<MoveResponse, EngineError> {
        let event = self.dispatch(Action::QuantumMove { player, squares })?;
        let Event::MovePlaced { placed, pending } = event else {
            return Err(InternalInvariantError::new("quantum move produced no placement").into());
        };

        Ok(MoveResponse {
            placed,
            cycle_detected: pending.is_some(),
            cycle_creator: pending.as_ref().map(|p| p.creator),
            collapse_chooser: pending.as_ref().map(|p| p.chooser),
            collapse_options: pending.map(|p| p.options),
            game_state: self.get_state(),
        })
    }

    /// Commits one of the offered collapse options.
    #[instrument(skip(self, option), fields(moves = option.len()))]
    pub fn choose_collapse(&mut self, option: &CollapseOption) -> Result<CollapseResponse, EngineError> {
        let event = self.dispatch(Action::ChooseCollapse {
            option: option.clone(),
        })?;
        let Event::Collapsed { results, report } = event else {
            return Err(InternalInvariantError::new("collapse produced no results").into());
        };

        Ok(CollapseResponse {
            collapse_results: results,
            winner: report,
            game_state: self.get_state(),
        })
    }

    /// Commits the offered option at `index`.
    pub fn choose_collapse_index(&mut self, index: usize) -> Result<CollapseResponse, EngineError> {
        let pending = self.state.pending().ok_or(StateError::NoPendingCycle)?;
        let option = pending
            .options
            .get(index)
            .cloned()
            .ok_or(StateError::UnknownOption)?;
        self.choose_collapse(&option)
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// Evaluates the board.
    pub fn get_winner(&self) -> WinReport {
        rules::evaluate(&self.state.ledger().board())
    }

    /// Entanglements among unresolved moves.
    pub fn get_entanglements(&self) -> Vec<Entanglement> {
        self.state.ledger().entanglements()
    }

    /// Every quantum move, resolved ones included.
    pub fn get_moves(&self) -> Vec<QuantumMove> {
        self.state.ledger().moves().to_vec()
    }

    /// Takes back the last accepted action.
    #[instrument(skip(self), fields(history = self.history.len()))]
    pub fn undo(&mut self) -> Result<GameSnapshot, EngineError> {
        let Some((undone, kept)) = self.history.split_last() else {
            return Err(StateError::NothingToUndo.into());
        };
        info!(%undone, "Undoing");
        let previous = Self::replay(self.state.rules(), kept)?;
        *self = previous;
        Ok(self.get_state())
    }
}
