//! Move shape: two distinct squares, and a final square only once resolved.

use super::Invariant;
use crate::state::GameState;

/// Invariant: every move spans two distinct, ascending squares.
///
/// A resolved move's final square is one of them and holds the classical
/// mark it produced; an unresolved move has no final square. Sequence
/// numbers strictly increase in play order.
pub struct MoveSquaresInvariant;

impl Invariant<GameState> for MoveSquaresInvariant {
    fn holds(state: &GameState) -> bool {
        let ledger = state.ledger();
        let ordered = ledger
            .moves()
            .windows(2)
            .all(|w| w[0].sequence() < w[1].sequence());

        ordered
            && ledger.moves().iter().all(|mv| {
                let [a, b] = mv.squares();
                if a >= b {
                    return false;
                }
                match mv.final_square() {
                    None => !mv.is_resolved(),
                    Some(pos) => {
                        mv.is_resolved()
                            && mv.touches(pos)
                            && ledger.classical_at(pos).is_some_and(|c| {
                                c.origin == Some(mv.id()) && c.player == mv.player()
                            })
                    }
                }
            })
    }

    fn description() -> &'static str {
        "Moves span two distinct squares and resolve onto one of them"
    }
}
