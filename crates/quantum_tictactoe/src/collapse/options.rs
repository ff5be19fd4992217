//! Collapse option generation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cycle::Cycle;
use crate::position::Position;
use crate::types::{MoveId, QuantumMove};

/// One complete resolution: every involved move mapped to one of its squares.
///
/// Serialized as a JSON object such as `{"X1": 4, "O1": 8, "X2": 0}`.
/// The derived ordering (by move, then square) is the canonical order
/// used wherever options are listed.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct CollapseOption(BTreeMap<MoveId, Position>);

impl CollapseOption {
    /// Wraps an assignment.
    pub fn new(assignments: BTreeMap<MoveId, Position>) -> Self {
        Self(assignments)
    }

    /// Square assigned to `id`.
    pub fn get(&self, id: MoveId) -> Option<Position> {
        self.0.get(&id).copied()
    }

    /// Assignments in move order.
    pub fn iter(&self) -> impl Iterator<Item = (MoveId, Position)> + '_ {
        self.0.iter().map(|(id, pos)| (*id, *pos))
    }

    /// Number of moves resolved by this option.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the option resolves nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Moves resolved by this option.
    pub fn moves(&self) -> impl Iterator<Item = MoveId> + '_ {
        self.0.keys().copied()
    }

    /// Number of moves that land differently in `self` and `other`.
    ///
    /// A move present in only one of the two counts as different.
    pub fn distance(&self, other: &CollapseOption) -> usize {
        let keys: BTreeSet<&MoveId> = self.0.keys().chain(other.0.keys()).collect();
        keys.into_iter()
            .filter(|id| self.0.get(*id) != other.0.get(*id))
            .count()
    }
}

impl FromIterator<(MoveId, Position)> for CollapseOption {
    fn from_iter<T: IntoIterator<Item = (MoveId, Position)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Enumerates the ways `cycle` can resolve.
///
/// Cycle moves are assigned by backtracking in walk order, trying each
/// move's squares in ascending order and pruning on any reused square.
/// Every complete cycle assignment is then extended over the stems: an
/// unresolved move whose square is taken is forced onto its other square,
/// transitively, and a branch where a forced move has nowhere to go is
/// dropped.
///
/// The result is deduplicated and in canonical order. When more than
/// `max_options` remain, [`select_diverse`] picks which ones to keep.
#[instrument(skip(cycle, moves), fields(trigger = %cycle.trigger, length = cycle.len()))]
pub fn generate(cycle: &Cycle, moves: &[QuantumMove], max_options: usize) -> Vec<CollapseOption> {
    let unresolved: Vec<&QuantumMove> = moves.iter().filter(|m| !m.is_resolved()).collect();
    let Some(members) = cycle
        .moves
        .iter()
        .map(|id| unresolved.iter().copied().find(|m| m.id() == *id))
        .collect::<Option<Vec<&QuantumMove>>>()
    else {
        debug!("Cycle refers to moves that are not unresolved");
        return Vec::new();
    };

    let mut found = BTreeSet::new();
    let mut assignment = BTreeMap::new();
    let mut taken = [false; 9];
    assign_cycle(&members, &unresolved, &mut assignment, &mut taken, &mut found);

    let candidates: Vec<CollapseOption> = found.into_iter().collect();
    debug!(candidates = candidates.len(), max_options, "Enumerated collapse options");

    if candidates.len() > max_options {
        select_diverse(&candidates, max_options)
    } else {
        candidates
    }
}

fn assign_cycle(
    members: &[&QuantumMove],
    unresolved: &[&QuantumMove],
    assignment: &mut BTreeMap<MoveId, Position>,
    taken: &mut [bool; 9],
    found: &mut BTreeSet<CollapseOption>,
) {
    let Some((mv, rest)) = members.split_first() else {
        if let Some(full) = propagate_stems(unresolved, assignment.clone(), *taken) {
            found.insert(full);
        }
        return;
    };

    for square in mv.squares() {
        if taken[square.to_index()] {
            continue;
        }
        taken[square.to_index()] = true;
        assignment.insert(mv.id(), square);
        assign_cycle(rest, unresolved, assignment, taken, found);
        assignment.remove(&mv.id());
        taken[square.to_index()] = false;
    }
}

/// Forces every stem touching a taken square onto its other square until
/// nothing changes. Returns `None` if some stem has both squares taken.
fn propagate_stems(
    unresolved: &[&QuantumMove],
    mut assignment: BTreeMap<MoveId, Position>,
    mut taken: [bool; 9],
) -> Option<CollapseOption> {
    loop {
        let mut changed = false;
        for mv in unresolved {
            if assignment.contains_key(&mv.id()) {
                continue;
            }
            let [a, b] = mv.squares();
            let forced = match (taken[a.to_index()], taken[b.to_index()]) {
                (true, true) => return None,
                (true, false) => b,
                (false, true) => a,
                (false, false) => continue,
            };
            taken[forced.to_index()] = true;
            assignment.insert(mv.id(), forced);
            changed = true;
        }
        if !changed {
            return Some(CollapseOption(assignment));
        }
    }
}

/// Picks `limit` options that differ from each other as much as possible.
///
/// Candidates are first put in canonical order. The first one is always
/// kept; after that the candidate whose smallest [`CollapseOption::distance`]
/// to the kept set is largest is added, ties going to the earlier
/// candidate. The kept options are returned in canonical order.
#[instrument(skip(candidates), fields(candidates = candidates.len()))]
pub fn select_diverse(candidates: &[CollapseOption], limit: usize) -> Vec<CollapseOption> {
    let pool: Vec<&CollapseOption> = candidates
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if pool.len() <= limit {
        return pool.into_iter().cloned().collect();
    }

    let mut kept: Vec<usize> = Vec::with_capacity(limit);
    if limit > 0 {
        kept.push(0);
    }
    while kept.len() < limit {
        let mut best: Option<(usize, usize)> = None;
        for (idx, option) in pool.iter().enumerate() {
            if kept.contains(&idx) {
                continue;
            }
            let spread = kept
                .iter()
                .map(|k| option.distance(pool[*k]))
                .min()
                .unwrap_or(usize::MAX);
            if best.is_none_or(|(_, s)| spread > s) {
                best = Some((idx, spread));
            }
        }
        match best {
            Some((idx, _)) => kept.push(idx),
            None => break,
        }
    }

    kept.sort_unstable();
    kept.into_iter().map(|idx| pool[idx].clone()).collect()
}
