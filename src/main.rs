//! Arena CLI - diagnostic front end for the turn-resolution core.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use arena::PlayerId;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Arena - deterministic command protocol and world mutation core
#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply one turn of compact commands to a world snapshot
    Apply {
        /// World snapshot (JSON)
        #[arg(short, long)]
        world: PathBuf,

        /// Commands for a player, as <player>=<file> (repeatable)
        #[arg(short, long = "player", required = true, value_parser = cli::parse_player_file)]
        players: Vec<(PlayerId, PathBuf)>,

        /// Turn settings (JSON, default: built-in)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the resulting snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a compact command stream
    Decode {
        /// File holding compact commands
        #[arg(required = true)]
        input: PathBuf,

        /// Output format: json or compact
        #[arg(short, long, default_value = "json")]
        format: cli::DecodeFormat,
    },

    /// Load a world snapshot and verify its consistency
    Check {
        /// World snapshot (JSON)
        #[arg(short, long)]
        world: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Apply {
            world,
            players,
            config,
            output,
        } => cli::apply::execute(world, players, config, output),

        Commands::Decode { input, format } => cli::decode::execute(input, format),

        Commands::Check { world } => cli::check::execute(world),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
