//! CLI command implementations for the arena.

pub(crate) mod apply;
pub(crate) mod check;
pub(crate) mod decode;

use std::path::PathBuf;

use arena::{ArenaError, PlayerId};
use clap::ValueEnum;

/// Output format for the `decode` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DecodeFormat {
    /// One structured JSON document per line.
    Json,
    /// Re-encoded compact stream on a single line.
    Compact,
}

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// A plain message.
    #[error("{0}")]
    Message(String),
    /// An error from the library.
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Parse a `<player>=<path>` argument.
pub(crate) fn parse_player_file(arg: &str) -> Result<(PlayerId, PathBuf), String> {
    let (id, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected <player>=<path>, got `{arg}`"))?;
    let id = id
        .trim()
        .parse::<PlayerId>()
        .map_err(|e| format!("invalid player id `{id}`: {e}"))?;
    if path.is_empty() {
        return Err(format!("missing command file for player {id}"));
    }
    Ok((id, PathBuf::from(path)))
}
