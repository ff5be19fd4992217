//! Win evaluation over classical marks, with the simultaneous-win tie-break.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::super::board::Board;
use super::super::position::Position;
use super::super::types::Player;
use super::draw::is_draw;

/// Three cells in a row.
pub type Line = [Position; 3];

/// Every winning line: rows, then columns, then diagonals.
pub const LINES: [Line; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Who completed a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// Only X.
    X,
    /// Only O.
    O,
    /// Both players, in the same collapse.
    #[serde(rename = "both")]
    Both,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Winner::X,
            Player::O => Winner::O,
        }
    }
}

/// Outcome of scanning the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinReport {
    /// Who has a line, if anyone.
    pub winner: Option<Winner>,
    /// The line that earned the full point.
    pub winning_line: Option<Line>,
    /// No line and fewer than two open cells.
    pub is_draw: bool,
    /// Both players completed lines.
    pub is_simultaneous: bool,
    /// X's score: 1.0, 0.5 or 0.0.
    pub x_score: f64,
    /// O's score: 1.0, 0.5 or 0.0.
    pub o_score: f64,
    /// X's earliest completed line.
    pub x_winning_line: Option<Line>,
    /// O's earliest completed line.
    pub o_winning_line: Option<Line>,
}

impl WinReport {
    /// Report for a board with no line and no draw.
    pub fn undecided() -> Self {
        Self {
            winner: None,
            winning_line: None,
            is_draw: false,
            is_simultaneous: false,
            x_score: 0.0,
            o_score: 0.0,
            x_winning_line: None,
            o_winning_line: None,
        }
    }

    /// Whether the game is finished.
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }
}

/// A completed line and the sequence number that completed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Completed {
    line: Line,
    at: u32,
}

/// Earliest line completed by `player`; ties go to the lower line index.
fn best_line(board: &Board, player: Player) -> Option<Completed> {
    LINES
        .iter()
        .filter_map(|line| {
            let mut at = 0;
            for pos in line {
                let occupant = board.get(*pos).classical()?;
                if occupant.player != player {
                    return None;
                }
                at = at.max(occupant.sequence);
            }
            Some(Completed { line: *line, at })
        })
        // min_by_key keeps the first of equal keys.
        .min_by_key(|c| c.at)
}

/// Scans the classical marks on `board` for completed lines.
///
/// When both players have a line, the one whose best line was completed
/// by an earlier move gets the full point and the other gets half.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> WinReport {
    let x = best_line(board, Player::X);
    let o = best_line(board, Player::O);

    let mut report = WinReport::undecided();
    report.x_winning_line = x.map(|c| c.line);
    report.o_winning_line = o.map(|c| c.line);

    match (x, o) {
        (Some(x), Some(o)) => {
            report.winner = Some(Winner::Both);
            report.is_simultaneous = true;
            if x.at <= o.at {
                report.x_score = 1.0;
                report.o_score = 0.5;
                report.winning_line = Some(x.line);
            } else {
                report.x_score = 0.5;
                report.o_score = 1.0;
                report.winning_line = Some(o.line);
            }
        }
        (Some(x), None) => {
            report.winner = Some(Winner::X);
            report.x_score = 1.0;
            report.winning_line = Some(x.line);
        }
        (None, Some(o)) => {
            report.winner = Some(Winner::O);
            report.o_score = 1.0;
            report.winning_line = Some(o.line);
        }
        (None, None) => {
            report.is_draw = is_draw(board);
        }
    }

    debug!(winner = ?report.winner, is_draw = report.is_draw, "Board evaluated");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::types::ClassicalMove;

    fn board(marks: &[(usize, Player, u32)]) -> Board {
        let mut cells: Vec<Cell> = (0..9).map(|_| Cell::Quantum { moves: Vec::new() }).collect();
        for (idx, player, sequence) in marks {
            let position = Position::from_index(*idx).unwrap();
            cells[*idx] = Cell::Classical {
                occupant: ClassicalMove {
                    position,
                    player: *player,
                    sequence: *sequence,
                    origin: None,
                },
            };
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_empty_board_undecided() {
        let report = evaluate(&board(&[]));
        assert_eq!(report, WinReport::undecided());
        assert!(!report.is_over());
    }

    #[test]
    fn test_single_winner_diagonal() {
        let report = evaluate(&board(&[
            (0, Player::O, 2),
            (4, Player::O, 4),
            (8, Player::O, 6),
            (1, Player::X, 1),
        ]));
        assert_eq!(report.winner, Some(Winner::O));
        assert_eq!(report.o_score, 1.0);
        assert_eq!(report.x_score, 0.0);
        assert_eq!(
            report.winning_line,
            Some([Position::TopLeft, Position::Center, Position::BottomRight])
        );
        assert!(!report.is_simultaneous);
    }

    #[test]
    fn test_simultaneous_win_tie_break() {
        // X's row completes at sequence 3, O's at 4.
        let report = evaluate(&board(&[
            (0, Player::X, 1),
            (1, Player::X, 3),
            (2, Player::X, 2),
            (6, Player::O, 4),
            (7, Player::O, 2),
            (8, Player::O, 1),
        ]));
        assert_eq!(report.winner, Some(Winner::Both));
        assert!(report.is_simultaneous);
        assert_eq!(report.x_score, 1.0);
        assert_eq!(report.o_score, 0.5);
        assert_eq!(report.winning_line, report.x_winning_line);
        assert_eq!(
            report.o_winning_line,
            Some([Position::BottomLeft, Position::BottomCenter, Position::BottomRight])
        );
    }

    #[test]
    fn test_earliest_line_is_best() {
        // Two X lines; the column completed first is reported.
        let report = evaluate(&board(&[
            (0, Player::X, 1),
            (1, Player::X, 9),
            (2, Player::X, 3),
            (5, Player::X, 5),
            (8, Player::X, 7),
        ]));
        assert_eq!(
            report.x_winning_line,
            Some([Position::TopRight, Position::MiddleRight, Position::BottomRight])
        );
    }

    #[test]
    fn test_draw_with_one_free_cell() {
        // X O X / X O O / O X _
        let report = evaluate(&board(&[
            (0, Player::X, 1),
            (1, Player::O, 2),
            (2, Player::X, 3),
            (3, Player::X, 5),
            (4, Player::O, 4),
            (5, Player::O, 6),
            (6, Player::O, 8),
            (7, Player::X, 7),
        ]));
        assert!(report.is_draw);
        assert_eq!(report.winner, None);
        assert!(report.is_over());
    }

    #[test]
    fn test_two_free_cells_is_not_draw() {
        let report = evaluate(&board(&[
            (0, Player::X, 1),
            (1, Player::O, 2),
            (2, Player::X, 3),
            (3, Player::X, 5),
            (4, Player::O, 4),
            (5, Player::O, 6),
            (7, Player::X, 7),
        ]));
        assert!(!report.is_draw);
    }

    #[test]
    fn test_report_json_shape() {
        let report = evaluate(&board(&[(0, Player::X, 1), (1, Player::X, 2), (2, Player::X, 3)]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["winner"], "X");
        assert_eq!(json["winningLine"], serde_json::json!([0, 1, 2]));
        assert_eq!(json["xScore"], 1.0);
        assert_eq!(json["oWinningLine"], serde_json::Value::Null);
    }
}
