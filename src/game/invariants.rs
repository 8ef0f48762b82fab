//! World invariants - consistency checks that detect bugs.
//!
//! The map cells and the player registries must describe the same
//! occupancy at every observable instant. If any of these checks fire,
//! some mutation updated one view without the other.

use std::collections::BTreeSet;

use crate::game::World;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let map = world.map();
    let mut seen_ids = BTreeSet::new();

    // Player registry -> map
    for player in world.players() {
        for (location, entity) in player.entities() {
            if entity.owner != player.id {
                violations.push(InvariantViolation::new(format!(
                    "Entity {} at {location} is registered with player {} but owned by {}",
                    entity.id, player.id, entity.owner
                )));
            }
            if !seen_ids.insert(entity.id) {
                violations.push(InvariantViolation::new(format!(
                    "Entity id {} appears more than once",
                    entity.id
                )));
            }
            match map.get(location) {
                None => violations.push(InvariantViolation::new(format!(
                    "Player {} has entity {} outside the map at {location}",
                    player.id, entity.id
                ))),
                Some(cell) if cell.entity_of(player.id) != Some(entity.id) => {
                    violations.push(InvariantViolation::new(format!(
                        "Player {} has entity {} at {location} but the cell lists {:?}",
                        player.id,
                        entity.id,
                        cell.entity_of(player.id)
                    )));
                }
                Some(_) => {}
            }
        }
    }

    // Map -> player registry
    for (location, cell) in map.iter() {
        for (player_id, entity_id) in cell.occupants() {
            let registered = world
                .get_player(player_id)
                .and_then(|player| player.find(location))
                .map(|entity| entity.id);
            if registered != Some(entity_id) {
                violations.push(InvariantViolation::new(format!(
                    "Cell {location} lists player {player_id} with entity {entity_id} \
                     but the registry has {registered:?}"
                )));
            }
        }
    }

    if seen_ids.len() != world.entity_count() {
        violations.push(InvariantViolation::new(format!(
            "World tracks {} entity ids but registries hold {}",
            world.entity_count(),
            seen_ids.len()
        )));
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &World) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Entity, Location, Map};

    fn create_valid_world() -> World {
        let mut world = World::new(Map::new(6, 6).unwrap(), [1, 2]);
        world.spawn(1, Location::new(1, 1), 10).unwrap();
        world.spawn(2, Location::new(1, 1), 10).unwrap();
        world.spawn(2, Location::new(5, 0), 10).unwrap();
        world
    }

    #[test]
    fn test_valid_world_passes() {
        let world = create_valid_world();
        assert!(check_invariants(&world).is_empty());
        assert_invariants(&world);
    }

    #[test]
    fn test_detects_registry_only_entity() {
        let mut world = create_valid_world();
        let (_, player) = world.split_mut(1).unwrap();
        player.add_entity(Location::new(3, 3), Entity::new(99, 1, 0));

        let violations = check_invariants(&world);
        assert!(violations.iter().any(|v| v.message.contains("(3, 3)")));
    }

    #[test]
    fn test_detects_cell_only_occupant() {
        let mut world = create_valid_world();
        let (map, _) = world.split_mut(1).unwrap();
        map.at_mut(Location::new(4, 4)).add_entity(1, &Entity::new(50, 1, 0));

        let violations = check_invariants(&world);
        assert!(!violations.is_empty());
        assert!(violations[0].message.contains("Cell (4, 4)"));
    }

    #[test]
    fn test_detects_half_applied_move() {
        let mut world = create_valid_world();
        let (_, player) = world.split_mut(2).unwrap();
        let entity = player.remove_entity(Location::new(5, 0)).unwrap();
        player.add_entity(Location::new(0, 0), entity);

        assert_eq!(check_invariants(&world).len(), 2);
    }

    #[test]
    #[should_panic(expected = "World invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_panics_on_violation() {
        let mut world = create_valid_world();
        let (_, player) = world.split_mut(1).unwrap();
        player.remove_entity(Location::new(1, 1));
        assert_invariants(&world);
    }
}
