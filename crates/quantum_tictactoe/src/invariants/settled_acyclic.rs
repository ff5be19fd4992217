//! Pending-collapse bookkeeping and acyclicity of settled states.

use super::Invariant;
use crate::cycle::detect_cycle;
use crate::graph::EntanglementGraph;
use crate::state::{GameState, GameStatus};

/// Invariant: a collapse is pending exactly while the game awaits one.
///
/// While pending, the chooser is the player to act and every cycle member
/// is still unresolved. Otherwise the unresolved moves contain no cycle.
pub struct SettledAcyclicInvariant;

impl Invariant<GameState> for SettledAcyclicInvariant {
    fn holds(state: &GameState) -> bool {
        let ledger = state.ledger();
        match state.pending() {
            Some(pending) => {
                state.status() == GameStatus::AwaitingCollapse
                    && pending.chooser == state.current_player()
                    && pending.chooser == pending.creator.opponent()
                    && !pending.options.is_empty()
                    && pending
                        .cycle
                        .moves
                        .iter()
                        .all(|id| ledger.get(*id).is_some_and(|m| !m.is_resolved()))
            }
            None => {
                let graph = EntanglementGraph::new(ledger.moves());
                state.status() != GameStatus::AwaitingCollapse
                    && ledger.unresolved().all(|m| detect_cycle(&graph, m.id()).is_none())
            }
        }
    }

    fn description() -> &'static str {
        "Cycles exist only while a collapse is pending"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;

    #[test]
    fn test_chain_holds() {
        let mut state = GameState::default();
        state.ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        state.ledger.register_quantum(Player::O, &[4, 8], false).unwrap();
        assert!(SettledAcyclicInvariant::holds(&state));
    }

    #[test]
    fn test_unreported_cycle_violates() {
        let mut state = GameState::default();
        state.ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        state.ledger.register_quantum(Player::O, &[4, 8], false).unwrap();
        state.ledger.register_quantum(Player::X, &[8, 0], false).unwrap();
        assert!(!SettledAcyclicInvariant::holds(&state));
    }

    #[test]
    fn test_unreported_shared_cell_cycle_violates() {
        let mut state = GameState::default();
        state.ledger.register_quantum(Player::X, &[4, 0], false).unwrap();
        state.ledger.register_quantum(Player::O, &[4, 1], false).unwrap();
        assert!(SettledAcyclicInvariant::holds(&state));
        state.ledger.register_quantum(Player::X, &[4, 2], false).unwrap();
        assert!(!SettledAcyclicInvariant::holds(&state));
    }

    #[test]
    fn test_status_without_pending_violates() {
        let mut state = GameState::default();
        state.status = GameStatus::AwaitingCollapse;
        assert!(!SettledAcyclicInvariant::holds(&state));
    }
}
