//! Quantum Games - command-line front end
//!
//! Replays scripted games, hosts an interactive game, or prints the script
//! schema.

#![warn(missing_docs)]

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use quantum_games::{Cli, Command, EngineConfig, ReplayScript, SessionManager, error_json};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const SESSION: &str = "main";

fn main() -> Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = EngineConfig::load(cli.config.as_deref())?;

    // Logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging().filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let manager = SessionManager::new(config.rules().normalized());
    manager.create_session(SESSION.to_string())?;

    match cli.command {
        Command::Replay { script } => run_replay(&manager, &script),
        Command::Play => run_play(&manager),
        Command::Schema => print_schema(),
    }
}

/// Replays a script, printing each step's result as JSON.
#[instrument(skip(manager), fields(script = %path.display()))]
fn run_replay(manager: &SessionManager, path: &Path) -> Result<ExitCode> {
    let script = ReplayScript::from_file(path)?;
    info!(steps = script.steps.len(), "Replaying script");

    let result = script.run(manager, SESSION, |_, output| {
        match serde_json::to_string_pretty(output) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!(error = %e, "Failed to serialize step output"),
        }
    });

    match result {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            warn!(step = failure.step, error = %failure.error, "Script stopped");
            eprintln!("{}", failure);
            println!("{}", error_json(&failure.error)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Runs the interactive loop on stdin/stdout.
#[instrument(skip(manager))]
fn run_play(manager: &SessionManager) -> Result<ExitCode> {
    info!("Starting interactive game");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    quantum_games::run_play(manager, SESSION, stdin.lock(), stdout.lock())
        .context("Interactive session failed")?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the JSON schema of the script format.
fn print_schema() -> Result<ExitCode> {
    let schema = ReplayScript::schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(ExitCode::SUCCESS)
}
