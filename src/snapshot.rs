//! Serializable world snapshots.
//!
//! A snapshot lists each player's entities; loading one rebuilds both the
//! player registries and the map occupancy from that single list, so a
//! loaded world is consistent by construction.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArenaResult;
use crate::game::{Dimension, Entity, EntityId, Location, Map, PlacementError, PlayerId, World};

/// One entity in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity id.
    pub id: EntityId,
    /// X coordinate.
    pub x: Dimension,
    /// Y coordinate.
    pub y: Dimension,
    /// Opaque strength.
    #[serde(default)]
    pub energy: u32,
}

/// One player in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Player id.
    pub id: PlayerId,
    /// Entities owned by the player.
    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
}

/// A complete world as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Map width.
    pub width: Dimension,
    /// Map height.
    pub height: Dimension,
    /// Players in the match.
    pub players: Vec<PlayerSnapshot>,
}

/// A snapshot that does not describe a valid world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Width or height is zero.
    #[error("map dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Declared width.
        width: Dimension,
        /// Declared height.
        height: Dimension,
    },
    /// The same player id is listed twice.
    #[error("player {0} is listed more than once")]
    DuplicatePlayer(PlayerId),
    /// An entity could not be placed.
    #[error("player {player}: {source}")]
    Placement {
        /// Player being loaded.
        player: PlayerId,
        /// What went wrong.
        #[source]
        source: PlacementError,
    },
}

impl WorldSnapshot {
    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a snapshot document.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> ArenaResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }

    /// Write the snapshot as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> ArenaResult<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Pretty JSON text for this snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl World {
    /// Build a world from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero, a player is listed twice,
    /// or any entity cannot be placed.
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> Result<Self, SnapshotError> {
        let map = Map::new(snapshot.width, snapshot.height).ok_or(SnapshotError::ZeroDimension {
            width: snapshot.width,
            height: snapshot.height,
        })?;

        let mut ids = BTreeSet::new();
        for player in &snapshot.players {
            if !ids.insert(player.id) {
                return Err(SnapshotError::DuplicatePlayer(player.id));
            }
        }

        let mut world = World::new(map, ids);
        for player in &snapshot.players {
            for entity in &player.entities {
                world
                    .place(
                        player.id,
                        Location::new(entity.x, entity.y),
                        Entity::new(entity.id, player.id, entity.energy),
                    )
                    .map_err(|source| SnapshotError::Placement {
                        player: player.id,
                        source,
                    })?;
            }
        }
        Ok(world)
    }

    /// Capture the world as a snapshot. Players and entities come out in
    /// id and location order.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            width: self.map().width(),
            height: self.map().height(),
            players: self
                .players()
                .iter()
                .map(|player| PlayerSnapshot {
                    id: player.id,
                    entities: player
                        .entities()
                        .map(|(location, entity)| EntitySnapshot {
                            id: entity.id,
                            x: location.x,
                            y: location.y,
                            energy: entity.energy,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::check_invariants;

    const SNAPSHOT: &str = r#"{
        "width": 4,
        "height": 4,
        "players": [
            {"id": 2, "entities": [{"id": 5, "x": 1, "y": 1, "energy": 30}]},
            {"id": 1, "entities": [{"id": 0, "x": 3, "y": 2}, {"id": 1, "x": 1, "y": 1}]}
        ]
    }"#;

    #[test]
    fn test_load_builds_consistent_world() {
        let snapshot = WorldSnapshot::from_json_str(SNAPSHOT).unwrap();
        let world = World::from_snapshot(&snapshot).unwrap();

        assert!(check_invariants(&world).is_empty());
        assert_eq!(world.entity_count(), 3);
        assert_eq!(world.map().at(Location::new(1, 1)).len(), 2);
        assert_eq!(
            world.get_player(2).unwrap().find(Location::new(1, 1)).map(|e| e.energy),
            Some(30)
        );
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let snapshot = WorldSnapshot::from_json_str(SNAPSHOT).unwrap();
        let world = World::from_snapshot(&snapshot).unwrap();
        let out = world.snapshot();

        assert_eq!(out.players[0].id, 1);
        assert_eq!(out.players[0].entities[0].id, 1);
        assert_eq!(World::from_snapshot(&out).unwrap(), world);
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let snapshot = WorldSnapshot {
            width: 0,
            height: 3,
            players: vec![],
        };
        assert_eq!(
            World::from_snapshot(&snapshot),
            Err(SnapshotError::ZeroDimension { width: 0, height: 3 })
        );
    }

    #[test]
    fn test_rejects_duplicate_player() {
        let snapshot = WorldSnapshot {
            width: 3,
            height: 3,
            players: vec![
                PlayerSnapshot { id: 1, entities: vec![] },
                PlayerSnapshot { id: 1, entities: vec![] },
            ],
        };
        assert_eq!(
            World::from_snapshot(&snapshot),
            Err(SnapshotError::DuplicatePlayer(1))
        );
    }

    #[test]
    fn test_rejects_bad_entities() {
        let entity = |id, x, y| EntitySnapshot { id, x, y, energy: 0 };
        let cases = [
            vec![entity(0, 3, 0)],
            vec![entity(0, 0, 0), entity(1, 0, 0)],
            vec![entity(0, 0, 0), entity(0, 1, 0)],
        ];
        for entities in cases {
            let snapshot = WorldSnapshot {
                width: 3,
                height: 3,
                players: vec![PlayerSnapshot { id: 1, entities }],
            };
            assert!(matches!(
                World::from_snapshot(&snapshot),
                Err(SnapshotError::Placement { player: 1, .. })
            ));
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        let snapshot = WorldSnapshot::from_json_str(SNAPSHOT).unwrap();

        snapshot.save(&path).unwrap();
        assert_eq!(WorldSnapshot::load(&path).unwrap(), snapshot);
    }
}
