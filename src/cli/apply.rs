//! Apply command implementation.

use std::fs;
use std::path::PathBuf;

use arena::protocol::parse_commands;
use arena::snapshot::WorldSnapshot;
use arena::turn::{apply_turn, Submission, TurnConfig};
use arena::{ArenaError, PlayerId, World};

use super::CliError;

/// Execute the apply command.
///
/// Loads a world, applies one turn of compact commands per player, and
/// writes the resulting snapshot.
///
/// # Errors
///
/// Returns an error if any input cannot be loaded or a command file is
/// malformed. Illegal commands are reported, not treated as errors.
pub(crate) fn execute(
    world_path: PathBuf,
    players: Vec<(PlayerId, PathBuf)>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let snapshot = WorldSnapshot::load(&world_path)?;
    let mut world = World::from_snapshot(&snapshot).map_err(ArenaError::from)?;
    let config = match config_path {
        Some(path) => TurnConfig::load(&path)?,
        None => TurnConfig::default(),
    };

    let mut submissions = Vec::with_capacity(players.len());
    for (player, path) in players {
        let text = fs::read_to_string(&path).map_err(|e| {
            CliError::new(format!("Failed to read {}: {e}", path.display()))
        })?;
        let commands = parse_commands(&text).map_err(|e| {
            CliError::new(format!("Player {player} ({}): {e}", path.display()))
        })?;
        submissions.push(Submission::new(player, commands));
    }

    let report = apply_turn(&mut world, &submissions, &config);

    for outcome in &report.outcomes {
        eprintln!(
            "player {}: {} applied, {} rejected, {} discarded, {} truncated",
            outcome.player,
            outcome.applied,
            outcome.rejected.len(),
            outcome.discarded,
            outcome.truncated
        );
        for rejection in &outcome.rejected {
            eprintln!("  {rejection}");
        }
    }
    for player in &report.unknown_players {
        eprintln!("player {player}: not in world, commands ignored");
    }

    let result = world.snapshot();
    match output {
        Some(path) => {
            result.save(&path)?;
            eprintln!("Snapshot saved to: {}", path.display());
        }
        None => {
            let text = result.to_json_string().map_err(ArenaError::from)?;
            println!("{text}");
        }
    }
    Ok(())
}
