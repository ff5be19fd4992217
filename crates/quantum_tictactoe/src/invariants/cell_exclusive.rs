//! Cell exclusivity: a cell is quantum or classical, never both.

use super::Invariant;
use crate::position::Position;
use crate::state::GameState;

/// Invariant: no unresolved move spans a classical cell.
///
/// Each classical occupant also sits in the cell it names.
pub struct CellExclusiveInvariant;

impl Invariant<GameState> for CellExclusiveInvariant {
    fn holds(state: &GameState) -> bool {
        let ledger = state.ledger();
        Position::ALL.iter().all(|pos| match ledger.classical_at(*pos) {
            Some(occupant) => {
                occupant.position == *pos && !ledger.unresolved().any(|m| m.touches(*pos))
            }
            None => true,
        })
    }

    fn description() -> &'static str {
        "Each cell holds unresolved moves or one classical mark, never both"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;

    #[test]
    fn test_empty_game_holds() {
        assert!(CellExclusiveInvariant::holds(&GameState::default()));
    }

    #[test]
    fn test_stranded_move_violates() {
        let mut state = GameState::default();
        let x1 = state.ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        state.ledger.register_quantum(Player::O, &[4, 8], false).unwrap();
        assert!(CellExclusiveInvariant::holds(&state));

        state.ledger.resolve(x1, Position::Center).unwrap();
        assert!(!CellExclusiveInvariant::holds(&state));
    }
}
