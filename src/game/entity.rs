//! Entities owned by players.

use crate::game::PlayerId;

/// Unique identifier for an entity within a match.
pub type EntityId = u32;

/// A unit owned by exactly one player.
///
/// An entity has no location of its own: it is keyed by location in its
/// owner's registry and referenced by id from the map cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// Match-unique identifier.
    pub id: EntityId,
    /// Owning player.
    pub owner: PlayerId,
    /// Strength carried by the entity. Opaque to command application.
    pub energy: u32,
}

impl Entity {
    /// Create a new entity.
    #[must_use]
    pub const fn new(id: EntityId, owner: PlayerId, energy: u32) -> Self {
        Self { id, owner, energy }
    }
}
