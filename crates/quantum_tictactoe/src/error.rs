//! Engine error taxonomy.
//!
//! Every error is a plain value: rejected requests never mutate state,
//! and each error maps to a stable [`ReasonCode`] so an outer transport
//! can report it uniformly.

use derive_more::{Display, Error, From};
use serde::Serialize;
use tracing::instrument;

use super::position::Position;
use super::types::{MoveId, Player};

/// Stable, machine-readable reason attached to every engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// A quantum move named something other than two squares.
    WrongSquareCount,
    /// A square index was outside 0-8.
    OutOfRange,
    /// Both squares of a quantum move were the same cell.
    DuplicateSquares,
    /// A target cell already holds a classical mark.
    CellClassical,
    /// A classical mark was assigned to a cell that still holds quantum marks.
    CellEntangled,
    /// Another unresolved move already spans the same two cells.
    DuplicatePair,
    /// A collapse was chosen while no cycle is waiting.
    NoPendingCycle,
    /// The chosen collapse is not one of the offered options.
    UnknownOption,
    /// A move was attempted while a collapse choice is outstanding.
    CollapsePending,
    /// The player is not the one to move.
    NotYourTurn,
    /// The game has already finished.
    GameOver,
    /// There is no accepted action to take back.
    NothingToUndo,
    /// The engine detected an inconsistency in its own state.
    InternalInvariant,
}

/// Malformed move request.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ValidationError {
    /// A quantum move must name exactly two squares.
    #[display("Expected 2 squares, got {}", _0)]
    WrongSquareCount(usize),

    /// Square index outside the board.
    #[display("Square {} is out of range (must be 0-8)", _0)]
    OutOfRange(u8),

    /// Both squares are the same cell.
    #[display("Squares must be different (both are {})", _0)]
    DuplicateSquares(Position),

    /// The cell already holds a classical mark.
    #[display("Square {} already holds a classical mark", _0)]
    CellClassical(Position),

    /// A classical assignment targeted a cell that still holds quantum marks.
    #[display("Square {} still holds unresolved moves", _0)]
    CellEntangled(Position),

    /// An unresolved move already spans exactly these two cells.
    #[display("Move {} already spans the same two squares", _0)]
    DuplicatePair(MoveId),
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Returns the reason code for this error.
    pub fn reason(&self) -> ReasonCode {
        match self {
            ValidationError::WrongSquareCount(_) => ReasonCode::WrongSquareCount,
            ValidationError::OutOfRange(_) => ReasonCode::OutOfRange,
            ValidationError::DuplicateSquares(_) => ReasonCode::DuplicateSquares,
            ValidationError::CellClassical(_) => ReasonCode::CellClassical,
            ValidationError::CellEntangled(_) => ReasonCode::CellEntangled,
            ValidationError::DuplicatePair(_) => ReasonCode::DuplicatePair,
        }
    }
}

/// Request that is well formed but not allowed in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StateError {
    /// No cycle is waiting for a collapse choice.
    #[display("No collapse is pending")]
    NoPendingCycle,

    /// The submitted option is not among those offered.
    #[display("Collapse option is not among the offered options")]
    UnknownOption,

    /// A collapse must be chosen before play continues.
    #[display("A collapse must be chosen by {} before play continues", _0)]
    CollapsePending(Player),

    /// It is not this player's turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Player),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// Nothing has been played since the last reset.
    #[display("Nothing to undo")]
    NothingToUndo,
}

impl std::error::Error for StateError {}

impl StateError {
    /// Returns the reason code for this error.
    pub fn reason(&self) -> ReasonCode {
        match self {
            StateError::NoPendingCycle => ReasonCode::NoPendingCycle,
            StateError::UnknownOption => ReasonCode::UnknownOption,
            StateError::CollapsePending(_) => ReasonCode::CollapsePending,
            StateError::NotYourTurn(_) => ReasonCode::NotYourTurn,
            StateError::GameOver => ReasonCode::GameOver,
            StateError::NothingToUndo => ReasonCode::NothingToUndo,
        }
    }
}

/// Engine logic bug: live state disagrees with what the engine computed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Internal invariant violated: {} at {}:{}", message, file, line)]
pub struct InternalInvariantError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl InternalInvariantError {
    /// Creates a new invariant error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        tracing::error!(%message, file = loc.file(), line = loc.line(), "Internal invariant violated");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Any error the engine can return.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum EngineError {
    /// Malformed request.
    #[display("{}", _0)]
    Validation(ValidationError),
    /// Request not allowed now.
    #[display("{}", _0)]
    State(StateError),
    /// Engine bug; the operation was aborted.
    #[display("{}", _0)]
    Internal(InternalInvariantError),
}

/// Error category, for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ValidationError`].
    Validation,
    /// See [`StateError`].
    State,
    /// See [`InternalInvariantError`].
    Internal,
}

impl EngineError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::State(_) => ErrorKind::State,
            EngineError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the reason code.
    pub fn reason(&self) -> ReasonCode {
        match self {
            EngineError::Validation(e) => e.reason(),
            EngineError::State(e) => e.reason(),
            EngineError::Internal(_) => ReasonCode::InternalInvariant,
        }
    }

    /// Whether this error signals an engine bug rather than a bad request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Internal(_))
    }

    /// Builds the serializable report for this error.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            reason: self.reason(),
            message: self.to_string(),
        }
    }
}

/// Serializable summary of an [`EngineError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error category.
    pub kind: ErrorKind,
    /// Stable reason code.
    pub reason: ReasonCode,
    /// Human-readable message.
    pub message: String,
}
