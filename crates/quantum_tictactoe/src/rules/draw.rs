//! Draw detection.

use tracing::instrument;

use super::super::board::Board;

/// Whether fewer than two cells remain open.
///
/// A quantum move needs two free cells, so once only one is left nothing
/// can ever be placed again.
#[instrument(skip(board))]
pub fn is_blocked(board: &Board) -> bool {
    board.non_classical_count() < 2
}

/// A blocked board is a draw when nobody holds a line.
///
/// Callers that already know there is no line can use this directly;
/// [`evaluate`](super::evaluate) checks lines first.
pub fn is_draw(board: &Board) -> bool {
    is_blocked(board) && !super::win::LINES.iter().any(|line| {
        let Some(first) = board.occupant(line[0]) else {
            return false;
        };
        line.iter().all(|pos| board.occupant(*pos) == Some(first))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MoveLedger;
    use crate::position::Position;
    use crate::types::Player;

    #[test]
    fn test_empty_board_not_blocked() {
        assert!(!is_blocked(&MoveLedger::new().board()));
    }

    #[test]
    fn test_full_winning_board_not_draw() {
        let mut ledger = MoveLedger::new();
        for pos in Position::ALL {
            ledger.assign_classical(pos, Player::X).unwrap();
        }
        let board = ledger.board();
        assert!(is_blocked(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_quantum_marks_keep_cells_open() {
        let mut ledger = MoveLedger::new();
        let marks = [
            (Position::TopLeft, Player::X),
            (Position::TopCenter, Player::O),
            (Position::TopRight, Player::X),
            (Position::MiddleLeft, Player::X),
            (Position::Center, Player::O),
            (Position::MiddleRight, Player::O),
            (Position::BottomLeft, Player::O),
        ];
        for (pos, player) in marks {
            ledger.assign_classical(pos, player).unwrap();
        }
        ledger.register_quantum(Player::X, &[7, 8], false).unwrap();
        assert!(!is_draw(&ledger.board()));
    }
}
