//! Line-oriented play loop.
//!
//! Reads one command per line and writes the text grid plus the JSON
//! result. The player to act is always the one whose turn it is.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use derive_more::Display;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::session::{SessionError, SessionManager};

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    /// `q <a> <b>`: quantum move on two cells.
    Quantum(u8, u8),
    /// `c <index>`: choose the offered collapse at `index`.
    Collapse(usize),
    /// `undo`
    Undo,
    /// `state`
    State,
    /// `winner`
    Winner,
    /// `new`
    New,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Unrecognized input line.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Unrecognized command: {:?} (try `help`)", _0)]
pub struct ParseCommandError(pub String);

impl std::error::Error for ParseCommandError {}

impl FromStr for PlayCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || ParseCommandError(line.to_string());
        let words: Vec<&str> = line.split_whitespace().collect();
        let number = |raw: &str| raw.parse::<u8>().map_err(|_| err());

        match words.as_slice() {
            ["q", a, b] => Ok(PlayCommand::Quantum(number(a)?, number(b)?)),
            ["c", idx] => idx.parse().map(PlayCommand::Collapse).map_err(|_| err()),
            ["undo"] => Ok(PlayCommand::Undo),
            ["state"] => Ok(PlayCommand::State),
            ["winner"] => Ok(PlayCommand::Winner),
            ["new"] => Ok(PlayCommand::New),
            ["help"] => Ok(PlayCommand::Help),
            ["quit"] | ["exit"] => Ok(PlayCommand::Quit),
            _ => Err(err()),
        }
    }
}

const HELP: &str = "\
commands:
  q <a> <b>   quantum move on cells a and b (0-8)
  c <index>   choose the offered collapse at index
  undo        take back the last action
  state       print the game state
  winner      print the win evaluation
  new         start over
  quit        leave";

/// Runs the loop on session `session_id` until `quit` or end of input.
#[instrument(skip(manager, input, output))]
pub fn run(
    manager: &SessionManager,
    session_id: &str,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    writeln!(output, "{}", HELP)?;
    print_board(manager, session_id, &mut output)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<PlayCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };
        debug!(?command, "Command");

        let result = match command {
            PlayCommand::Quit => break,
            PlayCommand::Help => {
                writeln!(output, "{}", HELP)?;
                continue;
            }
            PlayCommand::Quantum(a, b) => manager
                .make_move_for_current_player(session_id, a, b)
                .map(to_json),
            PlayCommand::Collapse(idx) => manager.choose_collapse_index(session_id, idx).map(to_json),
            PlayCommand::Undo => manager.undo(session_id).map(to_json),
            PlayCommand::State => manager.get_state(session_id).map(to_json),
            PlayCommand::Winner => manager.get_winner(session_id).map(to_json),
            PlayCommand::New => manager.new_game(session_id).map(to_json),
        };

        match result {
            Ok(json) => writeln!(output, "{}", json?)?,
            Err(e) => writeln!(output, "{}", error_json(&e)?)?,
        }
        print_board(manager, session_id, &mut output)?;
    }
    Ok(())
}

fn print_board(manager: &SessionManager, session_id: &str, output: &mut impl Write) -> io::Result<()> {
    match manager.get_state(session_id) {
        Ok(state) => {
            writeln!(output, "{}", state.board.display())?;
            match &state.pending {
                Some(pending) => writeln!(
                    output,
                    "{} chooses a collapse (c 0..{})",
                    pending.chooser,
                    pending.options.len().saturating_sub(1)
                ),
                None => writeln!(output, "{} to move ({:?})", state.current_player, state.status),
            }
        }
        Err(e) => writeln!(output, "{}", e),
    }
}

fn to_json(value: impl Serialize) -> io::Result<String> {
    Ok(serde_json::to_string_pretty(&value)?)
}

/// JSON text describing `error`: the engine's report when there is one.
pub fn error_json(error: &SessionError) -> serde_json::Result<String> {
    match error.engine_report() {
        Some(report) => serde_json::to_string_pretty(&report),
        None => serde_json::to_string_pretty(&serde_json::json!({ "error": error.to_string() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("q 0 4".parse(), Ok(PlayCommand::Quantum(0, 4)));
        assert_eq!(" c  1 ".parse(), Ok(PlayCommand::Collapse(1)));
        assert_eq!("exit".parse(), Ok(PlayCommand::Quit));
        assert!("q 0".parse::<PlayCommand>().is_err());
        assert!("q a b".parse::<PlayCommand>().is_err());
        assert!("dance".parse::<PlayCommand>().is_err());
    }

    #[test]
    fn test_error_json_uses_engine_report() {
        let manager = SessionManager::default();
        manager.create_session("e".to_string()).unwrap();
        let err = manager.undo("e").unwrap_err();
        let json: serde_json::Value = serde_json::from_str(&error_json(&err).unwrap()).unwrap();
        assert_eq!(json["reason"], "nothing_to_undo");

        let missing = manager.get_state("nobody").unwrap_err();
        let json: serde_json::Value = serde_json::from_str(&error_json(&missing).unwrap()).unwrap();
        assert_eq!(json["error"], "Session nobody not found");
    }
}
