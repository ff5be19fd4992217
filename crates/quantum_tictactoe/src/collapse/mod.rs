//! Collapse: enumerating and committing resolutions of a cycle.
//!
//! [`generate`] lists every consistent way to resolve a cycle and the stem
//! moves it drags along; [`apply`] commits one of them atomically.

mod apply;
mod options;

pub use apply::{CollapseResults, apply};
pub use options::{CollapseOption, generate, select_diverse};
