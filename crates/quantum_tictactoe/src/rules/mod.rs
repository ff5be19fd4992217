//! Game rules for quantum tic-tac-toe.
//!
//! Only classical marks count towards lines. Rules are pure functions over
//! the [`Board`](super::board::Board) projection.

pub mod draw;
pub mod win;

pub use draw::{is_blocked, is_draw};
pub use win::{LINES, Line, WinReport, Winner, evaluate};
