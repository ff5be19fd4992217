//! Quantum tic-tac-toe rules engine.
//!
//! Each quantum move marks two cells at once. Moves sharing a cell are
//! entangled; once entanglements close a loop, the opponent of the player
//! who closed it picks how the loop collapses, and every move dragged along
//! by that choice becomes a classical mark. Only classical marks win lines.
//!
//! # Architecture
//!
//! - **Ledger**: authoritative move record and board projection
//! - **Graph / Cycle**: entanglements and loop detection
//! - **Collapse**: option enumeration and atomic application
//! - **Rules**: win evaluation with the simultaneous-win tie-break
//! - **Reducer / Game**: the pure transition function and a stateful wrapper
//!
//! # Example
//!
//! ```
//! use quantum_tictactoe::{Game, Player, Rules};
//!
//! let mut game = Game::new(Rules::default());
//! game.make_quantum_move(0, 4, Player::X)?;
//! game.make_quantum_move(4, 8, Player::O)?;
//! let response = game.make_quantum_move(8, 0, Player::X)?;
//! assert!(response.cycle_detected);
//!
//! game.choose_collapse_index(0)?;
//! assert!(game.get_entanglements().is_empty());
//! # Ok::<(), quantum_tictactoe::EngineError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
pub mod collapse;
mod contracts;
mod cycle;
mod error;
mod game;
mod graph;
pub mod invariants;
mod ledger;
mod position;
mod reducer;
pub mod rules;
mod state;
mod types;

pub use action::{Action, Event, Transition};
pub use board::{Board, Cell};
pub use collapse::{CollapseOption, CollapseResults};
pub use contracts::{
    CollapseContract, Contract, GameNotOver, NoCollapsePending, PlayersTurn, QuantumMoveContract,
    check_invariants,
};
pub use cycle::{Cycle, detect_cycle, on_move_inserted};
pub use error::{
    EngineError, ErrorKind, ErrorReport, InternalInvariantError, ReasonCode, StateError,
    ValidationError,
};
pub use game::{CollapseResponse, Game, MoveResponse};
pub use graph::{Entanglement, EntanglementGraph, entanglements};
pub use ledger::MoveLedger;
pub use position::Position;
pub use reducer::reduce;
pub use rules::{Line, WinReport, Winner};
pub use state::{
    DEFAULT_MAX_COLLAPSE_OPTIONS, GameSnapshot, GameState, GameStatus, PendingCollapse, Rules,
};
pub use types::{ClassicalMove, MoveId, ParseMoveIdError, Player, QuantumMove};
