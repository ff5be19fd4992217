//! Cycle detection in the entanglement graph.
//!
//! Nodes are unresolved moves and every shared cell is an edge, so two
//! moves on the same pair of cells are joined twice. A cycle is a closed
//! walk that never reuses the edge it just arrived by.
//!
//! Before a move is inserted the unresolved moves never contain a cycle
//! (any cycle is collapsed before play continues), so every new cycle runs
//! through the inserted move and a depth-first search from it suffices.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::graph::{Entanglement, EntanglementGraph};
use super::ledger::MoveLedger;
use super::position::Position;
use super::types::{MoveId, Player};

/// A closed chain of entanglements that forces a collapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    /// Moves in walk order, starting with the trigger.
    pub moves: Vec<MoveId>,
    /// Entanglements along the walk; entry `i` joins `moves[i]` to the next move,
    /// the last one closes back to the trigger.
    pub entanglements: Vec<Entanglement>,
    /// The move whose insertion closed the loop.
    pub trigger: MoveId,
    /// The player who made the trigger move.
    pub trigger_player: Player,
}

impl Cycle {
    /// Number of moves in the loop.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the loop has no moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Whether `id` is on the loop.
    pub fn contains(&self, id: MoveId) -> bool {
        self.moves.contains(&id)
    }

    /// Shared cell of each entanglement, in walk order. A cell repeats
    /// when several loop moves meet in it.
    pub fn cells(&self) -> Vec<Position> {
        self.entanglements.iter().map(|e| e.shared_square).collect()
    }
}

/// Runs cycle detection for the just-inserted move `id`.
#[instrument(skip(ledger))]
pub fn on_move_inserted(ledger: &MoveLedger, id: MoveId) -> Option<Cycle> {
    let graph = EntanglementGraph::new(ledger.moves());
    detect_cycle(&graph, id)
}

/// Searches for a closed walk through `trigger`.
///
/// Edges are tried in play order of the neighbor, so the answer is
/// deterministic. Loops that miss `trigger` are not reported.
#[instrument(skip(graph))]
pub fn detect_cycle(graph: &EntanglementGraph<'_>, trigger: MoveId) -> Option<Cycle> {
    let start = graph.index_of(trigger)?;
    let mut search = Search {
        graph,
        start,
        path: vec![start],
        links: Vec::new(),
    };
    let Some(close) = search.extend() else {
        debug!(%trigger, "No cycle");
        return None;
    };

    let moves: Vec<MoveId> = search.path.iter().map(|idx| graph.node(*idx).id()).collect();
    let mut entanglements: Vec<Entanglement> = search
        .links
        .iter()
        .enumerate()
        .map(|(i, cell)| Entanglement::new(moves[i], moves[i + 1], *cell))
        .collect();
    if let Some(last) = moves.last() {
        entanglements.push(Entanglement::new(*last, trigger, close));
    }

    let cycle = Cycle {
        moves,
        entanglements,
        trigger,
        trigger_player: trigger.player(),
    };
    let members: Vec<String> = cycle.moves.iter().map(ToString::to_string).collect();
    info!(%trigger, length = cycle.len(), ?members, "Cycle detected");
    Some(cycle)
}

/// Depth-first walk state.
struct Search<'g, 'a> {
    graph: &'g EntanglementGraph<'a>,
    start: usize,
    /// Moves on the current path, starting with the trigger.
    path: Vec<usize>,
    /// `links[i]` is the cell joining `path[i]` to `path[i + 1]`.
    links: Vec<Position>,
}

impl Search<'_, '_> {
    /// Extends the path from its last move. Returns the cell that closes
    /// the loop back to the trigger.
    fn extend(&mut self) -> Option<Position> {
        let node = *self.path.last()?;
        let arrived_by = match self.path.len() {
            0 | 1 => None,
            n => Some((self.path[n - 2], self.links[n - 2])),
        };

        for (next, cell) in self.graph.neighbors(node) {
            if arrived_by == Some((next, cell)) {
                continue;
            }
            if next == self.start {
                return Some(cell);
            }
            if self.path.contains(&next) {
                continue;
            }

            self.path.push(next);
            self.links.push(cell);
            if let Some(close) = self.extend() {
                return Some(close);
            }
            self.path.pop();
            self.links.pop();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cycle: &Cycle) -> Vec<String> {
        cycle.moves.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_triangle_cycle() {
        let mut ledger = MoveLedger::new();
        ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        let o1 = ledger.register_quantum(Player::O, &[4, 8], false).unwrap();
        assert!(on_move_inserted(&ledger, o1).is_none());

        let x2 = ledger.register_quantum(Player::X, &[8, 0], false).unwrap();
        let cycle = on_move_inserted(&ledger, x2).expect("cycle");

        let mut members = ids(&cycle);
        members.sort();
        assert_eq!(members, ["O1", "X1", "X2"]);
        assert_eq!(cycle.trigger, x2);
        assert_eq!(cycle.trigger_player, Player::X);
        assert_eq!(cycle.entanglements.len(), 3);
        assert!(cycle.entanglements.iter().all(|e| cycle.contains(e.first) && cycle.contains(e.second)));

        let mut cells = cycle.cells();
        cells.sort();
        assert_eq!(cells, [Position::TopLeft, Position::Center, Position::BottomRight]);
    }

    #[test]
    fn test_three_moves_in_one_cell_form_a_cycle() {
        let mut ledger = MoveLedger::new();
        ledger.register_quantum(Player::X, &[4, 0], false).unwrap();
        let o1 = ledger.register_quantum(Player::O, &[4, 1], false).unwrap();
        assert!(on_move_inserted(&ledger, o1).is_none());
        let x2 = ledger.register_quantum(Player::X, &[4, 2], false).unwrap();

        let cycle = on_move_inserted(&ledger, x2).expect("cycle");
        assert_eq!(ids(&cycle), ["X2", "X1", "O1"]);
        assert_eq!(cycle.cells(), [Position::Center; 3]);
        let x1 = "X1".parse::<MoveId>().unwrap();
        assert_eq!(
            cycle.entanglements,
            [
                Entanglement::new(x2, x1, Position::Center),
                Entanglement::new(x1, o1, Position::Center),
                Entanglement::new(o1, x2, Position::Center),
            ]
        );
    }

    #[test]
    fn test_chain_is_not_a_cycle() {
        let mut ledger = MoveLedger::new();
        ledger.register_quantum(Player::X, &[0, 1], false).unwrap();
        ledger.register_quantum(Player::O, &[1, 2], false).unwrap();
        let x2 = ledger.register_quantum(Player::X, &[2, 5], false).unwrap();
        assert!(on_move_inserted(&ledger, x2).is_none());
    }

    #[test]
    fn test_walk_backtracks_out_of_side_loop() {
        // X1, O1 and X2 already meet in cell 1; only the loop through X3 counts.
        let mut ledger = MoveLedger::new();
        ledger.register_quantum(Player::X, &[0, 1], false).unwrap();
        ledger.register_quantum(Player::O, &[1, 2], false).unwrap();
        ledger.register_quantum(Player::X, &[1, 7], false).unwrap();
        ledger.register_quantum(Player::O, &[2, 5], false).unwrap();
        let x3 = ledger.register_quantum(Player::X, &[5, 0], false).unwrap();

        let cycle = on_move_inserted(&ledger, x3).expect("cycle");
        let mut members = ids(&cycle);
        members.sort();
        assert_eq!(members, ["O1", "O2", "X1", "X3"]);
        assert_eq!(cycle.moves[0], x3);
    }

    #[test]
    fn test_duplicate_pair_closes_two_cycle() {
        let mut ledger = MoveLedger::new();
        ledger.register_quantum(Player::X, &[3, 5], true).unwrap();
        let o1 = ledger.register_quantum(Player::O, &[3, 5], true).unwrap();

        let cycle = on_move_inserted(&ledger, o1).expect("cycle");
        assert_eq!(ids(&cycle), ["O1", "X1"]);
    }

    #[test]
    fn test_resolved_trigger_has_no_cycle() {
        let mut ledger = MoveLedger::new();
        let x1 = ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        ledger.resolve(x1, Position::Center).unwrap();
        assert!(on_move_inserted(&ledger, x1).is_none());
    }
}
