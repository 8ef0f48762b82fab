//! Game layer for the arena.
//!
//! Authoritative world state that commands mutate:
//! - Toroidal map of cells tracking per-player occupancy
//! - Players with location-keyed entity registries
//! - Directions and wrap-around movement
//! - Consistency checks between the two registries

mod direction;
mod entity;
mod invariants;
mod map;
mod player;
mod world;

pub use direction::{Direction, InvalidDirection};
pub use entity::{Entity, EntityId};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use map::{Cell, Dimension, Location, Map};
pub use player::{Player, PlayerId};
pub use world::{PlacementError, World};
