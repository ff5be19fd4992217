//! The pure transition function: `(state, action) -> state`.

use tracing::{info, instrument, warn};

use super::action::{Action, Event, Transition};
use super::collapse::{self, CollapseOption};
use super::contracts::{CollapseContract, Contract, QuantumMoveContract};
use super::cycle;
use super::error::{EngineError, InternalInvariantError};
use super::rules;
use super::state::{GameState, GameStatus, PendingCollapse};
use super::types::Player;

/// Applies `action` to `state`, returning the next state and what happened.
///
/// `state` is never modified; on error there is simply no next state.
/// Debug builds check every state invariant on the result.
#[instrument(skip(state), fields(status = ?state.status(), player = %state.current_player()))]
pub fn reduce(state: &GameState, action: &Action) -> Result<Transition, EngineError> {
    let result = match action {
        Action::NewGame => {
            info!("Game reset");
            Ok(Transition {
                state: GameState::new(state.rules()),
                event: Event::Reset,
            })
        }
        Action::QuantumMove { player, squares } => place(state, *player, squares),
        Action::ChooseCollapse { option } => choose(state, option),
    };

    if let Err(e) = &result {
        warn!(error = %e, reason = ?e.reason(), "Action rejected");
    }
    result
}

fn place(state: &GameState, player: Player, squares: &[u8]) -> Result<Transition, EngineError> {
    QuantumMoveContract::pre(state, &player)?;

    let rules = state.rules();
    let mut next = state.clone();
    let id = next
        .ledger
        .register_quantum(player, squares, rules.allow_duplicate_pairs)?;
    let placed = next
        .ledger
        .get(id)
        .cloned()
        .ok_or_else(|| InternalInvariantError::new(format!("move {} missing after insert", id)))?;

    next.current_player = player.opponent();
    if let Some(found) = cycle::on_move_inserted(&next.ledger, id) {
        let options = collapse::generate(&found, next.ledger.moves(), rules.max_collapse_options);
        if options.is_empty() {
            return Err(
                InternalInvariantError::new(format!("cycle through {} has no resolution", id)).into(),
            );
        }
        info!(%id, chooser = %player.opponent(), options = options.len(), "Collapse pending");
        next.status = GameStatus::AwaitingCollapse;
        next.pending = Some(PendingCollapse {
            cycle: found,
            creator: player,
            chooser: player.opponent(),
            options,
        });
    } else {
        info!(%id, "Quantum move placed");
    }

    if cfg!(debug_assertions) {
        QuantumMoveContract::post(state, &next)?;
    }
    Ok(Transition {
        event: Event::MovePlaced {
            placed,
            pending: next.pending.clone(),
        },
        state: next,
    })
}

fn choose(state: &GameState, option: &CollapseOption) -> Result<Transition, EngineError> {
    CollapseContract::pre(state, option)?;
    let chooser = state
        .pending()
        .map(|p| p.chooser)
        .ok_or_else(|| InternalInvariantError::new("pending collapse vanished"))?;

    let mut next = state.clone();
    let results = collapse::apply(&mut next.ledger, option)?;
    next.pending = None;
    next.current_player = chooser;

    let report = rules::evaluate(&next.ledger.board());
    next.status = if report.is_over() {
        info!(winner = ?report.winner, is_draw = report.is_draw, "Game finished");
        GameStatus::Finished
    } else {
        GameStatus::InProgress
    };
    info!(resolved = results.new_classical.len(), %chooser, "Collapse chosen");

    if cfg!(debug_assertions) {
        CollapseContract::post(state, &next)?;
    }
    Ok(Transition {
        state: next,
        event: Event::Collapsed { results, report },
    })
}
