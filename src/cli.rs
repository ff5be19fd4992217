//! Command-line interface for quantum_games.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Quantum tic-tac-toe rules engine
#[derive(Parser, Debug)]
#[command(name = "quantum_games")]
#[command(about = "Play and replay quantum tic-tac-toe games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a JSON game script, printing each step's result
    Replay {
        /// Path to the script
        script: PathBuf,
    },

    /// Play interactively over stdin/stdout
    Play,

    /// Print the JSON schema of the replay script format
    Schema,
}
