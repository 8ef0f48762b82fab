//! World state: the map together with every player's registry.

use std::collections::BTreeSet;

use crate::game::{Entity, EntityId, Location, Map, Player, PlayerId};

/// Why an entity could not be placed in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// No player with this id takes part in the match.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// The location lies outside the map.
    #[error("location {0} is outside the map")]
    OutOfBounds(Location),
    /// The player already has an entity on this location.
    #[error("player {player} already has an entity at {location}")]
    Occupied {
        /// Owning player.
        player: PlayerId,
        /// Contested location.
        location: Location,
    },
    /// Another entity already uses this id.
    #[error("entity id {0} is already in use")]
    DuplicateEntity(EntityId),
    /// The entity claims a different owner than the player it is placed for.
    #[error("entity {entity} is owned by player {owner}, not {player}")]
    OwnerMismatch {
        /// The entity being placed.
        entity: EntityId,
        /// Owner recorded on the entity.
        owner: PlayerId,
        /// Player it was placed for.
        player: PlayerId,
    },
    /// Every entity id has been handed out.
    #[error("entity ids exhausted")]
    IdsExhausted,
}

/// Complete authoritative state for a match.
///
/// The map and the player registries are two views of the same occupancy
/// fact. Every mutation offered here updates both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    /// The grid.
    map: Map,
    /// Players sorted by id.
    players: Vec<Player>,
    /// Ids of every live entity.
    entity_ids: BTreeSet<EntityId>,
    /// Next id tried by [`World::spawn`].
    next_entity_id: EntityId,
}

impl World {
    /// Create a world with the given players and no entities.
    ///
    /// Duplicate player ids are collapsed.
    #[must_use]
    pub fn new(map: Map, player_ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let ids: BTreeSet<PlayerId> = player_ids.into_iter().collect();
        Self {
            map,
            players: ids.into_iter().map(Player::new).collect(),
            entity_ids: BTreeSet::new(),
            next_entity_id: 0,
        }
    }

    /// The map.
    #[must_use]
    pub const fn map(&self) -> &Map {
        &self.map
    }

    /// All players, in id order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by ID.
    #[must_use]
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|idx| &self.players[idx])
    }

    /// Borrow the map and one player mutably at the same time.
    ///
    /// This is the pair a command is applied against.
    #[must_use]
    pub fn split_mut(&mut self, id: PlayerId) -> Option<(&mut Map, &mut Player)> {
        let idx = self.players.binary_search_by_key(&id, |p| p.id).ok()?;
        Some((&mut self.map, &mut self.players[idx]))
    }

    /// Total number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_ids.len()
    }

    /// Create a new entity for `player` at `location` with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is unknown, the location is outside the
    /// map or already holds one of the player's entities.
    pub fn spawn(
        &mut self,
        player: PlayerId,
        location: Location,
        energy: u32,
    ) -> Result<EntityId, PlacementError> {
        let mut id = self.next_entity_id;
        while self.entity_ids.contains(&id) {
            id = id.checked_add(1).ok_or(PlacementError::IdsExhausted)?;
        }
        self.place(player, location, Entity::new(id, player, energy))?;
        Ok(id)
    }

    /// Place an existing entity for `player` at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement would break registry consistency.
    pub fn place(
        &mut self,
        player: PlayerId,
        location: Location,
        entity: Entity,
    ) -> Result<(), PlacementError> {
        if entity.owner != player {
            return Err(PlacementError::OwnerMismatch {
                entity: entity.id,
                owner: entity.owner,
                player,
            });
        }
        if self.entity_ids.contains(&entity.id) {
            return Err(PlacementError::DuplicateEntity(entity.id));
        }
        if !self.map.contains(location) {
            return Err(PlacementError::OutOfBounds(location));
        }
        let (map, owner) = self
            .split_mut(player)
            .ok_or(PlacementError::UnknownPlayer(player))?;
        if owner.has_entity_at(location) {
            return Err(PlacementError::Occupied { player, location });
        }

        owner.add_entity(location, entity);
        map.at_mut(location).add_entity(player, &entity);
        self.entity_ids.insert(entity.id);
        self.next_entity_id = self.next_entity_id.max(entity.id.saturating_add(1));
        Ok(())
    }

    /// Remove `player`'s entity at `location` from both registries.
    pub fn despawn(&mut self, player: PlayerId, location: Location) -> Option<Entity> {
        let (map, owner) = self.split_mut(player)?;
        let entity = owner.remove_entity(location)?;
        map.at_mut(location).remove_entity(player);
        self.entity_ids.remove(&entity.id);
        Some(entity)
    }
}
