//! The move ledger: authoritative record of every move and classical mark.
//!
//! Moves live in a flat arena in the order they were played and are never
//! removed. Everything else (board, entanglements, cycles) is derived from
//! this record.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::board::{Board, Cell};
use super::error::{InternalInvariantError, ValidationError};
use super::graph::{self, Entanglement};
use super::position::Position;
use super::types::{ClassicalMove, MoveId, Player, QuantumMove};

/// Move history plus classical occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveLedger {
    /// Quantum moves in play order.
    moves: Vec<QuantumMove>,
    /// Classical occupant per cell.
    classical: [Option<ClassicalMove>; 9],
    /// Last global sequence number handed out.
    sequence: u32,
}

impl MoveLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// All quantum moves in play order, resolved ones included.
    pub fn moves(&self) -> &[QuantumMove] {
        &self.moves
    }

    /// Number of quantum moves played.
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Looks up a move by id.
    pub fn get(&self, id: MoveId) -> Option<&QuantumMove> {
        self.moves.iter().find(|m| m.id() == id)
    }

    /// Unresolved moves in play order.
    pub fn unresolved(&self) -> impl Iterator<Item = &QuantumMove> {
        self.moves.iter().filter(|m| !m.is_resolved())
    }

    /// Classical occupant of `pos`, if any.
    pub fn classical_at(&self, pos: Position) -> Option<&ClassicalMove> {
        self.classical[pos.to_index()].as_ref()
    }

    /// Whether `pos` holds a classical mark.
    pub fn is_classical(&self, pos: Position) -> bool {
        self.classical_at(pos).is_some()
    }

    /// Number of cells without a classical mark.
    pub fn open_cell_count(&self) -> usize {
        self.classical.iter().filter(|c| c.is_none()).count()
    }

    /// Current entanglements among unresolved moves.
    pub fn entanglements(&self) -> Vec<Entanglement> {
        graph::entanglements(&self.moves)
    }

    /// Projects the ledger onto the 3x3 board.
    pub fn board(&self) -> Board {
        let cells = Position::ALL
            .iter()
            .map(|pos| match self.classical_at(*pos) {
                Some(occupant) => Cell::Classical {
                    occupant: *occupant,
                },
                None => {
                    let mut moves: Vec<MoveId> = self
                        .unresolved()
                        .filter(|m| m.touches(*pos))
                        .map(QuantumMove::id)
                        .collect();
                    moves.sort();
                    Cell::Quantum { moves }
                }
            })
            .collect();
        Board::from_cells(cells)
    }

    /// Checks a quantum move request without recording it.
    ///
    /// Returns the two parsed cells on success.
    #[instrument(skip(self))]
    pub fn validate_quantum(
        &self,
        squares: &[u8],
        allow_duplicate_pairs: bool,
    ) -> Result<(Position, Position), ValidationError> {
        let [raw_a, raw_b] = squares else {
            return Err(ValidationError::WrongSquareCount(squares.len()));
        };
        let a = Position::parse(*raw_a)?;
        let b = Position::parse(*raw_b)?;

        if a == b {
            return Err(ValidationError::DuplicateSquares(a));
        }
        for pos in [a, b] {
            if self.is_classical(pos) {
                return Err(ValidationError::CellClassical(pos));
            }
        }

        // With only these two cells left open the repeat is the last legal
        // move, and it closes a two-move cycle.
        if !allow_duplicate_pairs && self.open_cell_count() > 2 {
            let pair = if a < b { [a, b] } else { [b, a] };
            if let Some(existing) = self.unresolved().find(|m| m.squares() == pair) {
                return Err(ValidationError::DuplicatePair(existing.id()));
            }
        }

        Ok((a, b))
    }

    /// Validates and records a quantum move for `player`.
    #[instrument(skip(self))]
    pub fn register_quantum(
        &mut self,
        player: Player,
        squares: &[u8],
        allow_duplicate_pairs: bool,
    ) -> Result<MoveId, ValidationError> {
        let (a, b) = self.validate_quantum(squares, allow_duplicate_pairs)?;

        let number = self.moves.iter().filter(|m| m.player() == player).count() as u32 + 1;
        let id = MoveId::new(player, number);
        self.sequence += 1;
        self.moves.push(QuantumMove::new(id, self.sequence, a, b));

        debug!(%id, sequence = self.sequence, %a, %b, "Registered quantum move");
        Ok(id)
    }

    /// Places a classical mark directly on an empty cell.
    ///
    /// Used to seed positions; regular play only produces classical marks
    /// through collapse.
    #[instrument(skip(self))]
    pub fn assign_classical(
        &mut self,
        pos: Position,
        player: Player,
    ) -> Result<ClassicalMove, ValidationError> {
        if self.is_classical(pos) {
            return Err(ValidationError::CellClassical(pos));
        }
        if self.unresolved().any(|m| m.touches(pos)) {
            return Err(ValidationError::CellEntangled(pos));
        }

        self.sequence += 1;
        let occupant = ClassicalMove {
            position: pos,
            player,
            sequence: self.sequence,
            origin: None,
        };
        self.classical[pos.to_index()] = Some(occupant);
        debug!(%pos, %player, sequence = self.sequence, "Assigned classical mark");
        Ok(occupant)
    }

    /// Collapses an unresolved move onto `pos` and records the classical mark.
    #[instrument(skip(self))]
    pub(crate) fn resolve(
        &mut self,
        id: MoveId,
        pos: Position,
    ) -> Result<ClassicalMove, InternalInvariantError> {
        if self.is_classical(pos) {
            return Err(InternalInvariantError::new(format!(
                "cell {} already classical while resolving {}",
                pos, id
            )));
        }
        let mv = self
            .moves
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or_else(|| InternalInvariantError::new(format!("unknown move {}", id)))?;
        mv.resolve(pos)?;

        let occupant = ClassicalMove {
            position: pos,
            player: mv.player(),
            sequence: mv.sequence(),
            origin: Some(id),
        };
        self.classical[pos.to_index()] = Some(occupant);
        Ok(occupant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_per_player_ids() {
        let mut ledger = MoveLedger::new();
        let x1 = ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        let o1 = ledger.register_quantum(Player::O, &[4, 8], false).unwrap();
        let x2 = ledger.register_quantum(Player::X, &[8, 0], false).unwrap();

        assert_eq!([x1, o1, x2].map(|id| id.to_string()), ["X1", "O1", "X2"]);
        assert_eq!(ledger.get(x2).unwrap().sequence(), 3);
        assert_eq!(ledger.move_count(), 3);
    }

    #[test]
    fn test_validation_errors() {
        let mut ledger = MoveLedger::new();
        assert_eq!(
            ledger.register_quantum(Player::X, &[1], false),
            Err(ValidationError::WrongSquareCount(1))
        );
        assert_eq!(
            ledger.register_quantum(Player::X, &[1, 2, 3], false),
            Err(ValidationError::WrongSquareCount(3))
        );
        assert_eq!(
            ledger.register_quantum(Player::X, &[1, 9], false),
            Err(ValidationError::OutOfRange(9))
        );
        assert_eq!(
            ledger.register_quantum(Player::X, &[3, 3], false),
            Err(ValidationError::DuplicateSquares(Position::MiddleLeft))
        );
        assert_eq!(ledger.move_count(), 0);
    }

    #[test]
    fn test_classical_cell_rejected() {
        let mut ledger = MoveLedger::new();
        ledger.assign_classical(Position::Center, Player::O).unwrap();
        assert_eq!(
            ledger.register_quantum(Player::X, &[4, 5], false),
            Err(ValidationError::CellClassical(Position::Center))
        );
    }

    #[test]
    fn test_duplicate_pair_policy() {
        let mut ledger = MoveLedger::new();
        let x1 = ledger.register_quantum(Player::X, &[2, 6], false).unwrap();
        assert_eq!(
            ledger.register_quantum(Player::O, &[6, 2], false),
            Err(ValidationError::DuplicatePair(x1))
        );
        assert!(ledger.register_quantum(Player::O, &[6, 2], true).is_ok());
    }

    #[test]
    fn test_duplicate_pair_allowed_on_last_two_cells() {
        let mut ledger = MoveLedger::new();
        for (idx, pos) in Position::ALL.iter().take(7).enumerate() {
            let player = if idx % 2 == 0 { Player::X } else { Player::O };
            ledger.assign_classical(*pos, player).unwrap();
        }
        assert_eq!(ledger.open_cell_count(), 2);
        ledger.register_quantum(Player::X, &[7, 8], false).unwrap();
        assert!(ledger.register_quantum(Player::O, &[8, 7], false).is_ok());
    }

    #[test]
    fn test_assign_classical_requires_empty_cell() {
        let mut ledger = MoveLedger::new();
        ledger.register_quantum(Player::X, &[0, 1], false).unwrap();
        assert_eq!(
            ledger.assign_classical(Position::TopLeft, Player::O),
            Err(ValidationError::CellEntangled(Position::TopLeft))
        );
        assert!(ledger.assign_classical(Position::TopRight, Player::O).is_ok());
        assert_eq!(
            ledger.assign_classical(Position::TopRight, Player::X),
            Err(ValidationError::CellClassical(Position::TopRight))
        );
    }

    #[test]
    fn test_board_projection() {
        let mut ledger = MoveLedger::new();
        let x1 = ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        let o1 = ledger.register_quantum(Player::O, &[4, 8], false).unwrap();
        ledger.resolve(x1, Position::TopLeft).unwrap();

        let board = ledger.board();
        assert_eq!(board.occupant(Position::TopLeft), Some(Player::X));
        assert_eq!(board.get(Position::Center).quantum_moves(), &[o1]);
        assert_eq!(board.get(Position::BottomRight).quantum_moves(), &[o1]);
        assert_eq!(board.non_classical_count(), 8);
    }

    #[test]
    fn test_resolve_rejects_classical_target() {
        let mut ledger = MoveLedger::new();
        let x1 = ledger.register_quantum(Player::X, &[0, 4], false).unwrap();
        let o1 = ledger.register_quantum(Player::O, &[4, 8], false).unwrap();
        ledger.resolve(x1, Position::Center).unwrap();
        assert!(ledger.resolve(o1, Position::Center).is_err());
        assert!(!ledger.get(o1).unwrap().is_resolved());
    }
}
