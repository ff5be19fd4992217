//! Core domain types for quantum tic-tac-toe.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::InternalInvariantError;
use super::position::Position;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Single-letter symbol used in move ids and board text.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Stable identity of a quantum move: player plus that player's move count.
///
/// Ordered chronologically (`X1 < O1 < X2 < ...`) and serialized as the
/// familiar string form `"X1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveId {
    player: Player,
    number: u32,
}

impl MoveId {
    /// Creates a move id.
    pub fn new(player: Player, number: u32) -> Self {
        Self { player, number }
    }

    /// Returns the player who owns this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the per-player move number (1-based).
    pub fn number(&self) -> u32 {
        self.number
    }
}

impl Ord for MoveId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then(self.player.cmp(&other.player))
    }
}

impl PartialOrd for MoveId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for MoveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.player.symbol(), self.number)
    }
}

/// Error returned when a string is not a valid move id.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid move id: {:?}", _0)]
pub struct ParseMoveIdError(pub String);

impl std::error::Error for ParseMoveIdError {}

impl FromStr for MoveId {
    type Err = ParseMoveIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let player = match chars.next() {
            Some('X') | Some('x') => Player::X,
            Some('O') | Some('o') => Player::O,
            _ => return Err(ParseMoveIdError(s.to_string())),
        };
        let number = chars
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ParseMoveIdError(s.to_string()))?;
        Ok(Self { player, number })
    }
}

impl TryFrom<String> for MoveId {
    type Error = ParseMoveIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl schemars::JsonSchema for MoveId {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "MoveId".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "pattern": "^[XO][1-9][0-9]*$"
        })
    }
}

impl From<MoveId> for String {
    fn from(id: MoveId) -> Self {
        id.to_string()
    }
}

/// A move that occupies two cells until it collapses.
///
/// While unresolved it sits in both `squares`; once resolved it sits in
/// `final_square` only and never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumMove {
    id: MoveId,
    player: Player,
    /// Global turn number (1-based, both players share the counter).
    sequence: u32,
    /// The two cells, stored ascending.
    squares: [Position; 2],
    resolved: bool,
    final_square: Option<Position>,
}

impl QuantumMove {
    /// Creates an unresolved move. The caller guarantees `a != b`.
    pub(crate) fn new(id: MoveId, sequence: u32, a: Position, b: Position) -> Self {
        let squares = if a <= b { [a, b] } else { [b, a] };
        Self {
            id,
            player: id.player(),
            sequence,
            squares,
            resolved: false,
            final_square: None,
        }
    }

    /// Returns the move id.
    pub fn id(&self) -> MoveId {
        self.id
    }

    /// Returns the player who made the move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the global turn number of the move.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the two candidate cells (ascending).
    pub fn squares(&self) -> [Position; 2] {
        self.squares
    }

    /// Whether the move has collapsed.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// The collapsed cell, if resolved.
    pub fn final_square(&self) -> Option<Position> {
        self.final_square
    }

    /// Whether `pos` is one of the move's two cells.
    pub fn touches(&self, pos: Position) -> bool {
        self.squares.contains(&pos)
    }

    /// Given one of the move's cells, returns the other one.
    pub fn other_square(&self, pos: Position) -> Option<Position> {
        match self.squares {
            [a, b] if a == pos => Some(b),
            [a, b] if b == pos => Some(a),
            _ => None,
        }
    }

    /// Cells the move currently occupies.
    pub fn occupied(&self) -> Vec<Position> {
        match self.final_square {
            Some(pos) => vec![pos],
            None => self.squares.to_vec(),
        }
    }

    /// Collapses the move onto `pos`.
    #[instrument(skip(self), fields(move_id = %self.id))]
    pub(crate) fn resolve(&mut self, pos: Position) -> Result<(), InternalInvariantError> {
        if self.resolved {
            return Err(InternalInvariantError::new(format!(
                "move {} is already resolved",
                self.id
            )));
        }
        if !self.touches(pos) {
            return Err(InternalInvariantError::new(format!(
                "move {} cannot collapse to cell {}",
                self.id, pos
            )));
        }
        self.resolved = true;
        self.final_square = Some(pos);
        Ok(())
    }
}

/// A resolved occupancy of exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicalMove {
    /// The occupied cell.
    pub position: Position,
    /// The occupant.
    pub player: Player,
    /// Global turn number of the move that produced this occupancy.
    pub sequence: u32,
    /// The quantum move this occupancy collapsed from, if any.
    pub origin: Option<MoveId>,
}
