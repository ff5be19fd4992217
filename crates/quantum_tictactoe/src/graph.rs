//! Entanglement graph over unresolved moves.
//!
//! Nodes are indices into the ledger's move arena and edges are derived
//! on demand from cell membership, so the graph never holds references
//! between moves.

use serde::{Deserialize, Serialize};

use super::position::Position;
use super::types::{MoveId, QuantumMove};

/// Two unresolved moves sharing a cell.
///
/// `first` is always the earlier move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entanglement {
    /// Earlier move of the pair.
    pub first: MoveId,
    /// Later move of the pair.
    pub second: MoveId,
    /// The cell both moves span.
    pub shared_square: Position,
}

impl Entanglement {
    /// Creates an entanglement, ordering the pair chronologically.
    pub fn new(a: MoveId, b: MoveId, shared_square: Position) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            shared_square,
        }
    }

    /// Whether `id` is one end of this entanglement.
    pub fn involves(&self, id: MoveId) -> bool {
        self.first == id || self.second == id
    }
}

/// Lists every entanglement among the unresolved moves of `moves`.
///
/// Pairs come out in play order; a pair spanning the same two cells
/// yields one entanglement per shared cell.
pub fn entanglements(moves: &[QuantumMove]) -> Vec<Entanglement> {
    let unresolved: Vec<&QuantumMove> = moves.iter().filter(|m| !m.is_resolved()).collect();
    let mut out = Vec::new();
    for (i, a) in unresolved.iter().enumerate() {
        for b in &unresolved[i + 1..] {
            for cell in a.squares() {
                if b.touches(cell) {
                    out.push(Entanglement::new(a.id(), b.id(), cell));
                }
            }
        }
    }
    out
}

/// Adjacency view over the unresolved moves of a ledger.
#[derive(Debug, Clone)]
pub struct EntanglementGraph<'a> {
    moves: &'a [QuantumMove],
    by_cell: [Vec<usize>; 9],
}

impl<'a> EntanglementGraph<'a> {
    /// Indexes the unresolved moves of `moves` by cell.
    pub fn new(moves: &'a [QuantumMove]) -> Self {
        let mut by_cell: [Vec<usize>; 9] = Default::default();
        for (idx, mv) in moves.iter().enumerate() {
            if mv.is_resolved() {
                continue;
            }
            for cell in mv.squares() {
                by_cell[cell.to_index()].push(idx);
            }
        }
        for bucket in &mut by_cell {
            bucket.sort_by_key(|idx| moves[*idx].sequence());
        }
        Self { moves, by_cell }
    }

    /// The move stored at arena index `idx`.
    pub fn node(&self, idx: usize) -> &'a QuantumMove {
        &self.moves[idx]
    }

    /// Arena index of the unresolved move `id`.
    pub fn index_of(&self, id: MoveId) -> Option<usize> {
        self.moves
            .iter()
            .position(|m| m.id() == id && !m.is_resolved())
    }

    /// Unresolved moves in `cell`, in play order.
    pub fn in_cell(&self, cell: Position) -> &[usize] {
        &self.by_cell[cell.to_index()]
    }

    /// Moves other than `idx` entangled with it through `cell`.
    pub fn neighbors_via(&self, idx: usize, cell: Position) -> impl Iterator<Item = usize> + '_ {
        self.in_cell(cell).iter().copied().filter(move |n| *n != idx)
    }

    /// Every entanglement edge of `idx` as `(neighbor, shared cell)`, in
    /// play order of the neighbor. A neighbor on the same two cells shows
    /// up once per cell.
    pub fn neighbors(&self, idx: usize) -> Vec<(usize, Position)> {
        let mut edges: Vec<(usize, Position)> = self
            .node(idx)
            .squares()
            .into_iter()
            .flat_map(|cell| self.neighbors_via(idx, cell).map(move |n| (n, cell)))
            .collect();
        edges.sort_by_key(|(n, cell)| (self.moves[*n].sequence(), *cell));
        edges
    }

    /// Unresolved move count.
    pub fn node_count(&self) -> usize {
        self.moves.iter().filter(|m| !m.is_resolved()).count()
    }
}
