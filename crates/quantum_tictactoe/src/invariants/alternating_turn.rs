//! Alternating turn invariant: quantum moves go X, O, X, O, ...

use super::Invariant;
use crate::state::GameState;
use crate::types::Player;

/// Invariant: players alternate quantum moves, X first.
///
/// The collapse chooser is always the opponent of the player who closed
/// the cycle, so the player to act is X exactly when both have made the
/// same number of moves.
pub struct AlternatingTurnInvariant;

impl Invariant<GameState> for AlternatingTurnInvariant {
    fn holds(state: &GameState) -> bool {
        let moves = state.ledger().moves();

        if moves.first().is_some_and(|m| m.player() != Player::X) {
            return false;
        }
        if moves.windows(2).any(|w| w[0].player() == w[1].player()) {
            return false;
        }

        let expected = if moves.len() % 2 == 0 {
            Player::X
        } else {
            Player::O
        };
        state.current_player() == expected
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...)"
    }
}
