//! First-class invariants for quantum tic-tac-toe.
//!
//! Each invariant is a property of [`GameState`](crate::GameState) that holds
//! after every transition. They are testable on their own and are checked
//! together as post-conditions in debug builds.

mod alternating_turn;
mod cell_exclusive;
mod move_squares;
mod settled_acyclic;

pub use alternating_turn::AlternatingTurnInvariant;
pub use cell_exclusive::CellExclusiveInvariant;
pub use move_squares::MoveSquaresInvariant;
pub use settled_acyclic::SettledAcyclicInvariant;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks every invariant in the set, collecting all violations.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

/// All game invariants as a composable set.
pub type QuantumInvariants = (
    CellExclusiveInvariant,
    MoveSquaresInvariant,
    SettledAcyclicInvariant,
    AlternatingTurnInvariant,
);
