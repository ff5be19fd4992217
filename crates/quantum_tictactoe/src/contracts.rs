//! Contract-based validation for engine transitions.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P(state, action)} transition {Q(before, after)}.

use tracing::{instrument, warn};

use super::collapse::CollapseOption;
use super::error::{EngineError, InternalInvariantError, StateError};
use super::invariants::{InvariantSet, QuantumInvariants};
use super::state::{GameState, GameStatus};
use super::types::Player;

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A: ?Sized> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), EngineError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), EngineError>;
}

/// Precondition: the game is not finished.
pub struct GameNotOver;

impl GameNotOver {
    /// Rejects any action on a finished game.
    pub fn check(state: &GameState) -> Result<(), StateError> {
        if state.status() == GameStatus::Finished {
            Err(StateError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: no collapse choice is outstanding.
pub struct NoCollapsePending;

impl NoCollapsePending {
    /// Rejects a move while a cycle waits for its collapse.
    pub fn check(state: &GameState) -> Result<(), StateError> {
        match state.pending() {
            Some(pending) => Err(StateError::CollapsePending(pending.chooser)),
            None => Ok(()),
        }
    }
}

/// Precondition: it must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Rejects a move by the player not to act.
    pub fn check(state: &GameState, player: Player) -> Result<(), StateError> {
        if player != state.current_player() {
            Err(StateError::NotYourTurn(player))
        } else {
            Ok(())
        }
    }
}

/// Contract for quantum moves.
///
/// Preconditions: game not over, no pending collapse, player's turn.
/// Square validation belongs to the ledger. Postconditions: every state
/// invariant.
pub struct QuantumMoveContract;

impl Contract<GameState, Player> for QuantumMoveContract {
    #[instrument(skip(state))]
    fn pre(state: &GameState, player: &Player) -> Result<(), EngineError> {
        GameNotOver::check(state)?;
        NoCollapsePending::check(state)?;
        PlayersTurn::check(state, *player)?;
        Ok(())
    }

    fn post(_before: &GameState, after: &GameState) -> Result<(), EngineError> {
        check_invariants(after)
    }
}

/// Contract for collapse choices.
///
/// Preconditions: a cycle is pending and the option is one of those
/// offered. Postconditions: every state invariant, and nothing pending.
pub struct CollapseContract;

impl Contract<GameState, CollapseOption> for CollapseContract {
    #[instrument(skip(state, option))]
    fn pre(state: &GameState, option: &CollapseOption) -> Result<(), EngineError> {
        let pending = state.pending().ok_or(StateError::NoPendingCycle)?;
        if !pending.options.contains(option) {
            return Err(StateError::UnknownOption.into());
        }
        Ok(())
    }

    fn post(_before: &GameState, after: &GameState) -> Result<(), EngineError> {
        if after.pending().is_some() {
            return Err(InternalInvariantError::new("collapse left a cycle pending").into());
        }
        check_invariants(after)
    }
}

/// Checks every state invariant, folding violations into one error.
#[instrument(skip(state))]
pub fn check_invariants(state: &GameState) -> Result<(), EngineError> {
    QuantumInvariants::check_all(state).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%descriptions, "Postcondition failed");
        InternalInvariantError::new(format!("Postcondition failed: {}", descriptions)).into()
    })
}
