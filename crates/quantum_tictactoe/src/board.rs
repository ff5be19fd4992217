//! Read-only 3x3 projection of the move ledger.

use serde::{Deserialize, Serialize};

use super::position::Position;
use super::types::{ClassicalMove, MoveId, Player};

/// Contents of a single cell.
///
/// A cell is either quantum (zero or more unresolved moves) or classical
/// (exactly one occupant); the enum makes "both" unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cell {
    /// Unresolved moves spanning this cell (ascending ids, possibly empty).
    Quantum {
        /// Ids of the unresolved moves in this cell.
        moves: Vec<MoveId>,
    },
    /// A single collapsed or assigned occupant.
    Classical {
        /// The occupancy.
        #[serde(flatten)]
        occupant: ClassicalMove,
    },
}

impl Cell {
    /// Returns the classical occupant, if any.
    pub fn classical(&self) -> Option<&ClassicalMove> {
        match self {
            Cell::Classical { occupant } => Some(occupant),
            Cell::Quantum { .. } => None,
        }
    }

    /// Returns the unresolved move ids in this cell (empty for classical cells).
    pub fn quantum_moves(&self) -> &[MoveId] {
        match self {
            Cell::Quantum { moves } => moves,
            Cell::Classical { .. } => &[],
        }
    }

    /// Whether a classical mark sits here.
    pub fn is_classical(&self) -> bool {
        matches!(self, Cell::Classical { .. })
    }
}

/// 3x3 board projection, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from nine cells. Callers pass exactly one cell per position.
    pub(crate) fn from_cells(cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), 9);
        Self { cells }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> &Cell {
        &self.cells[pos.to_index()]
    }

    /// All cells, indexed by position.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Classical occupant of `pos`, if any.
    pub fn occupant(&self, pos: Position) -> Option<Player> {
        self.get(pos).classical().map(|c| c.player)
    }

    /// Number of cells without a classical mark.
    pub fn non_classical_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_classical()).count()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Classical cells show their mark; quantum cells list their move ids,
    /// or the cell index when empty.
    pub fn display(&self) -> String {
        let labels: Vec<String> = Position::ALL
            .iter()
            .map(|pos| match self.get(*pos) {
                Cell::Classical { occupant } => format!("[{}]", occupant.player),
                Cell::Quantum { moves } if moves.is_empty() => pos.to_string(),
                Cell::Quantum { moves } => moves
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            })
            .collect();
        let width = labels.iter().map(String::len).max().unwrap_or(1);

        let mut result = String::new();
        for row in 0..3 {
            let line: Vec<String> = (0..3)
                .map(|col| format!("{:^width$}", labels[row * 3 + col], width = width))
                .collect();
            result.push_str(&line.join("|"));
            if row < 2 {
                result.push('\n');
                result.push_str(&vec!["-".repeat(width); 3].join("+"));
                result.push('\n');
            }
        }
        result
    }
}
