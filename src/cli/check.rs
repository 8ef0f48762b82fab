//! Check command implementation.

use std::path::PathBuf;

use arena::game::check_invariants;
use arena::snapshot::WorldSnapshot;
use arena::{ArenaError, World};

use super::CliError;

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or describes an
/// inconsistent world.
pub(crate) fn execute(world_path: PathBuf) -> Result<(), CliError> {
    let snapshot = WorldSnapshot::load(&world_path)?;
    let world = World::from_snapshot(&snapshot).map_err(ArenaError::from)?;

    let violations = check_invariants(&world);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("{violation}");
        }
        return Err(CliError::new(format!(
            "{} invariant violation(s) in {}",
            violations.len(),
            world_path.display()
        )));
    }

    println!(
        "OK: {}x{} map, {} players, {} entities",
        world.map().width(),
        world.map().height(),
        world.players().len(),
        world.entity_count()
    );
    Ok(())
}
