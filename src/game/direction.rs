//! Movement directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A movement direction on the toroidal grid.
///
/// Both wire formats encode a direction as a single lowercase character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Towards y - 1.
    #[serde(rename = "n")]
    North,
    /// Towards y + 1.
    #[serde(rename = "s")]
    South,
    /// Towards x + 1.
    #[serde(rename = "e")]
    East,
    /// Towards x - 1.
    #[serde(rename = "w")]
    West,
    /// No movement.
    #[serde(rename = "o")]
    Still,
}

impl Direction {
    /// Every direction, in declaration order.
    pub const ALL: [Direction; 5] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Still,
    ];

    /// The four directions that actually move.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Coordinate delta `(dx, dy)` for this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Still => (0, 0),
        }
    }

    /// Wire character for this direction.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
            Direction::Still => 'o',
        }
    }

    /// Parse a wire character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Direction::North),
            's' => Some(Direction::South),
            'e' => Some(Direction::East),
            'w' => Some(Direction::West),
            'o' => Some(Direction::Still),
            _ => None,
        }
    }

    /// The direction pointing the other way. `Still` is its own inverse.
    #[must_use]
    pub const fn invert(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Still => Direction::Still,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A token that is not a direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction `{0}`")]
pub struct InvalidDirection(pub String);

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Direction::from_char(c).ok_or_else(|| InvalidDirection(s.to_string())),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}
