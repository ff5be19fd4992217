//! Committing a chosen collapse option.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::options::CollapseOption;
use crate::error::InternalInvariantError;
use crate::ledger::MoveLedger;
use crate::position::Position;
use crate::types::ClassicalMove;

/// What a collapse changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapseResults {
    /// Every move that resolved, with its final square.
    pub resolved_moves: CollapseOption,
    /// The classical marks created, in move order.
    pub new_classical: Vec<ClassicalMove>,
}

/// Resolves every move in `option` and records the classical marks.
///
/// All-or-nothing: the option is checked against the live ledger first
/// and committed on a staged copy, so on error `ledger` is untouched.
/// An error here means the option was computed against different state,
/// which is an engine bug.
#[instrument(skip(ledger, option), fields(moves = option.len()))]
pub fn apply(
    ledger: &mut MoveLedger,
    option: &CollapseOption,
) -> Result<CollapseResults, InternalInvariantError> {
    check(ledger, option)?;

    let mut staged = ledger.clone();
    let mut new_classical = Vec::with_capacity(option.len());
    for (id, pos) in option.iter() {
        new_classical.push(staged.resolve(id, pos)?);
    }

    if let Some(stranded) = staged
        .unresolved()
        .find(|m| m.squares().iter().any(|p| staged.is_classical(*p)))
    {
        return Err(InternalInvariantError::new(format!(
            "move {} left unresolved on a classical cell",
            stranded.id()
        )));
    }

    *ledger = staged;
    info!(resolved = new_classical.len(), "Collapse applied");
    Ok(CollapseResults {
        resolved_moves: option.clone(),
        new_classical,
    })
}

fn check(ledger: &MoveLedger, option: &CollapseOption) -> Result<(), InternalInvariantError> {
    if option.is_empty() {
        return Err(InternalInvariantError::new("empty collapse option"));
    }

    let mut used: BTreeSet<Position> = BTreeSet::new();
    for (id, pos) in option.iter() {
        let mv = ledger
            .get(id)
            .ok_or_else(|| InternalInvariantError::new(format!("unknown move {}", id)))?;
        if mv.is_resolved() {
            return Err(InternalInvariantError::new(format!("move {} already resolved", id)));
        }
        if !mv.touches(pos) {
            return Err(InternalInvariantError::new(format!(
                "move {} cannot collapse to cell {}",
                id, pos
            )));
        }
        if ledger.is_classical(pos) {
            return Err(InternalInvariantError::new(format!("cell {} already classical", pos)));
        }
        if !used.insert(pos) {
            return Err(InternalInvariantError::new(format!("cell {} assigned twice", pos)));
        }
    }
    Ok(())
}
