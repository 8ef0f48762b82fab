//! Player state management.

use std::collections::BTreeMap;

use crate::game::{Entity, Location};

/// Unique identifier for a player.
pub type PlayerId = u8;

/// State for a single player.
///
/// The entity registry is the authoritative record of what the player
/// controls. It is keyed by location, so a player never has two entities
/// on the same location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Entities keyed by their current location.
    entities: BTreeMap<Location, Entity>,
}

impl Player {
    /// Create a new player with no entities.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            entities: BTreeMap::new(),
        }
    }

    /// Entity at `location`, if the player has one there.
    #[must_use]
    pub fn find(&self, location: Location) -> Option<&Entity> {
        self.entities.get(&location)
    }

    /// Check whether the player has an entity at `location`.
    #[must_use]
    pub fn has_entity_at(&self, location: Location) -> bool {
        self.entities.contains_key(&location)
    }

    /// Place `entity` at `location`, returning whatever entity was there before.
    ///
    /// Callers must make sure the location is free unless they intend to
    /// replace the previous entity.
    pub fn add_entity(&mut self, location: Location, entity: Entity) -> Option<Entity> {
        self.entities.insert(location, entity)
    }

    /// Detach and return the entity at `location`.
    ///
    /// Returns `None` without touching the registry when the location is empty.
    pub fn remove_entity(&mut self, location: Location) -> Option<Entity> {
        self.entities.remove(&location)
    }

    /// Iterate over `(location, entity)` pairs in location order.
    pub fn entities(&self) -> impl Iterator<Item = (Location, &Entity)> {
        self.entities.iter().map(|(&location, entity)| (location, entity))
    }

    /// Number of entities controlled.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(1);
        assert_eq!(player.id, 1);
        assert_eq!(player.entity_count(), 0);
    }

    #[test]
    fn test_add_and_find() {
        let mut player = Player::new(1);
        let entity = Entity::new(4, 1, 100);
        assert!(player.add_entity(Location::new(2, 3), entity).is_none());

        assert_eq!(player.find(Location::new(2, 3)), Some(&entity));
        assert!(player.find(Location::new(3, 2)).is_none());
        assert!(player.has_entity_at(Location::new(2, 3)));
    }

    #[test]
    fn test_remove_returns_entity() {
        let mut player = Player::new(1);
        let entity = Entity::new(4, 1, 100);
        player.add_entity(Location::new(0, 0), entity);

        assert_eq!(player.remove_entity(Location::new(0, 0)), Some(entity));
        assert_eq!(player.remove_entity(Location::new(0, 0)), None);
        assert_eq!(player.entity_count(), 0);
    }

    #[test]
    fn test_entities_in_location_order() {
        let mut player = Player::new(2);
        player.add_entity(Location::new(3, 0), Entity::new(1, 2, 0));
        player.add_entity(Location::new(0, 5), Entity::new(2, 2, 0));

        let ids: Vec<_> = player.entities().map(|(_, entity)| entity.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
