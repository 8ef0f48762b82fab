//! Map, cell and location types.

use std::collections::BTreeMap;
use std::fmt;

use crate::game::{Direction, Entity, EntityId, PlayerId};

/// Grid coordinate type.
pub type Dimension = u16;

/// A location on the map.
///
/// Locations handed out by a [`Map`] are always in range; wrapping happens
/// when they are constructed or moved, never when they are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// X coordinate (column).
    pub x: Dimension,
    /// Y coordinate (row).
    pub y: Dimension,
}

impl Location {
    /// Create a new location. No wrapping is applied.
    #[must_use]
    pub const fn new(x: Dimension, y: Dimension) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single map cell.
///
/// Tracks which player occupies the cell with which entity. A player can
/// hold at most one entity per cell, but any number of players may share it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    occupants: BTreeMap<PlayerId, EntityId>,
}

impl Cell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `player` as occupying this cell with `entity`.
    ///
    /// Replaces any previous association for the same player.
    pub fn add_entity(&mut self, player: PlayerId, entity: &Entity) {
        self.occupants.insert(player, entity.id);
    }

    /// Remove the occupancy of `player`, returning the entity id it held.
    pub fn remove_entity(&mut self, player: PlayerId) -> Option<EntityId> {
        self.occupants.remove(&player)
    }

    /// Entity held here by `player`, if any.
    #[must_use]
    pub fn entity_of(&self, player: PlayerId) -> Option<EntityId> {
        self.occupants.get(&player).copied()
    }

    /// Check whether `player` occupies this cell.
    #[must_use]
    pub fn is_occupied_by(&self, player: PlayerId) -> bool {
        self.occupants.contains_key(&player)
    }

    /// Iterate over `(player, entity)` occupants in player order.
    pub fn occupants(&self) -> impl Iterator<Item = (PlayerId, EntityId)> + '_ {
        self.occupants.iter().map(|(&player, &entity)| (player, entity))
    }

    /// Number of occupants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    /// Check whether nobody occupies this cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

/// The authoritative grid.
///
/// Covers the full `width × height` torus; every in-range location has
/// exactly one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    /// Width of the map in cells.
    width: Dimension,
    /// Height of the map in cells.
    height: Dimension,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Map {
    /// Create a new map of empty cells.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: Dimension, height: Dimension) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        let cells = vec![Cell::new(); size];

        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> Dimension {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> Dimension {
        self.height
    }

    /// Check if a location is within the map bounds.
    #[must_use]
    pub const fn contains(&self, location: Location) -> bool {
        location.x < self.width && location.y < self.height
    }

    /// Build a location from signed coordinates, wrapping around both axes.
    #[must_use]
    pub fn location(&self, x: i64, y: i64) -> Location {
        Location::new(wrap(x, self.width), wrap(y, self.height))
    }

    /// The location at signed coordinates, without wrapping.
    ///
    /// Returns `None` unless both coordinates are already inside the map.
    #[must_use]
    pub fn checked_location(&self, x: i64, y: i64) -> Option<Location> {
        let location = Location::new(Dimension::try_from(x).ok()?, Dimension::try_from(y).ok()?);
        self.contains(location).then_some(location)
    }

    /// Location reached by stepping once in `direction`, wrapping at the edges.
    ///
    /// Pure coordinate transform; no entity is moved.
    #[must_use]
    pub fn move_location(&self, location: Location, direction: Direction) -> Location {
        let (dx, dy) = direction.delta();
        self.location(
            i64::from(location.x) + i64::from(dx),
            i64::from(location.y) + i64::from(dy),
        )
    }

    fn index(&self, location: Location) -> Option<usize> {
        if self.contains(location) {
            Some(usize::from(location.y) * usize::from(self.width) + usize::from(location.x))
        } else {
            None
        }
    }

    /// Get a reference to the cell at the given location.
    #[must_use]
    pub fn get(&self, location: Location) -> Option<&Cell> {
        self.index(location).map(|idx| &self.cells[idx])
    }

    /// Get a mutable reference to the cell at the given location.
    #[must_use]
    pub fn get_mut(&mut self, location: Location) -> Option<&mut Cell> {
        self.index(location).map(|idx| &mut self.cells[idx])
    }

    /// Cell at an in-range location.
    ///
    /// # Panics
    ///
    /// Panics if `location` is outside the map.
    #[must_use]
    pub fn at(&self, location: Location) -> &Cell {
        match self.get(location) {
            Some(cell) => cell,
            None => panic!("location {location} outside {}x{} map", self.width, self.height),
        }
    }

    /// Mutable cell at an in-range location.
    ///
    /// # Panics
    ///
    /// Panics if `location` is outside the map.
    #[must_use]
    pub fn at_mut(&mut self, location: Location) -> &mut Cell {
        let (width, height) = (self.width, self.height);
        match self.get_mut(location) {
            Some(cell) => cell,
            None => panic!("location {location} outside {width}x{height} map"),
        }
    }

    /// Iterate over all locations and cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Location, &Cell)> {
        let width = usize::from(self.width);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            // Both quotients are bounded by the u16 dimensions.
            #[allow(clippy::cast_possible_truncation)]
            let location = Location::new((idx % width) as Dimension, (idx / width) as Dimension);
            (location, cell)
        })
    }

    /// Locations occupied by a specific player.
    pub fn locations_of(&self, player: PlayerId) -> impl Iterator<Item = Location> + '_ {
        self.iter()
            .filter(move |(_, cell)| cell.is_occupied_by(player))
            .map(|(location, _)| location)
    }
}

// rem_euclid against a u16 modulus always fits back into u16.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wrap(value: i64, size: Dimension) -> Dimension {
    value.rem_euclid(i64::from(size)) as Dimension
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: EntityId, owner: PlayerId) -> Entity {
        Entity::new(id, owner, 0)
    }

    #[test]
    fn test_map_creation() {
        let map = Map::new(10, 8).unwrap();
        assert_eq!(map.width(), 10);
        assert_eq!(map.height(), 8);
        assert_eq!(map.iter().count(), 80);
        assert!(map.iter().all(|(_, cell)| cell.is_empty()));
    }

    #[test]
    fn test_map_zero_size() {
        assert!(Map::new(0, 10).is_none());
        assert!(Map::new(10, 0).is_none());
    }

    #[test]
    fn test_map_bounds() {
        let map = Map::new(10, 10).unwrap();
        assert!(map.contains(Location::new(0, 0)));
        assert!(map.contains(Location::new(9, 9)));
        assert!(!map.contains(Location::new(10, 0)));
        assert!(!map.contains(Location::new(0, 10)));
        assert!(map.get(Location::new(10, 0)).is_none());
    }

    #[test]
    fn test_location_wraps() {
        let map = Map::new(4, 3).unwrap();
        assert_eq!(map.location(-1, -1), Location::new(3, 2));
        assert_eq!(map.location(4, 3), Location::new(0, 0));
        assert_eq!(map.location(9, 7), Location::new(1, 1));
    }

    #[test]
    fn test_checked_location_does_not_wrap() {
        let map = Map::new(4, 3).unwrap();
        assert_eq!(map.checked_location(3, 2), Some(Location::new(3, 2)));
        assert_eq!(map.checked_location(0, 0), Some(Location::new(0, 0)));
        assert_eq!(map.checked_location(4, 0), None);
        assert_eq!(map.checked_location(0, 3), None);
        assert_eq!(map.checked_location(-1, 0), None);
        assert_eq!(map.checked_location(65_536, 0), None);
        assert_eq!(map.checked_location(i64::MIN, i64::MAX), None);
    }

    #[test]
    fn test_move_location_wraps_east_and_south() {
        let map = Map::new(4, 4).unwrap();
        assert_eq!(map.move_location(Location::new(3, 2), Direction::East), Location::new(0, 2));
        assert_eq!(map.move_location(Location::new(1, 3), Direction::South), Location::new(1, 0));
        assert_eq!(map.move_location(Location::new(0, 1), Direction::West), Location::new(3, 1));
        assert_eq!(map.move_location(Location::new(2, 0), Direction::North), Location::new(2, 3));
        assert_eq!(map.move_location(Location::new(2, 2), Direction::Still), Location::new(2, 2));
    }

    #[test]
    fn test_move_location_on_single_cell_map() {
        let map = Map::new(1, 1).unwrap();
        for direction in Direction::ALL {
            assert_eq!(map.move_location(Location::new(0, 0), direction), Location::new(0, 0));
        }
    }

    #[test]
    fn test_cell_add_is_not_duplicated() {
        let mut cell = Cell::new();
        cell.add_entity(1, &entity(7, 1));
        cell.add_entity(1, &entity(7, 1));
        assert_eq!(cell.len(), 1);
        assert_eq!(cell.entity_of(1), Some(7));
    }

    #[test]
    fn test_cell_multiple_players() {
        let mut cell = Cell::new();
        cell.add_entity(2, &entity(5, 2));
        cell.add_entity(1, &entity(3, 1));
        let occupants: Vec<_> = cell.occupants().collect();
        assert_eq!(occupants, vec![(1, 3), (2, 5)]);
    }

    #[test]
    fn test_cell_remove_is_idempotent() {
        let mut cell = Cell::new();
        cell.add_entity(1, &entity(3, 1));
        assert_eq!(cell.remove_entity(1), Some(3));
        assert_eq!(cell.remove_entity(1), None);
        assert!(cell.is_empty());
    }

    #[test]
    fn test_at_mut_and_locations_of() {
        let mut map = Map::new(5, 5).unwrap();
        map.at_mut(Location::new(2, 3)).add_entity(1, &entity(1, 1));
        map.at_mut(Location::new(4, 0)).add_entity(1, &entity(2, 1));
        map.at_mut(Location::new(4, 0)).add_entity(2, &entity(3, 2));

        let mine: Vec<_> = map.locations_of(1).collect();
        assert_eq!(mine, vec![Location::new(4, 0), Location::new(2, 3)]);
        assert!(map.at(Location::new(4, 0)).is_occupied_by(2));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_at_out_of_range_panics() {
        let map = Map::new(2, 2).unwrap();
        let _ = map.at(Location::new(2, 0));
    }
}
