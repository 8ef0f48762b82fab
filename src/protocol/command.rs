//! The command sum type and its application to world state.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IllegalCommand, IllegalReason};
use crate::game::{Direction, Location, Map, Player};

/// The kinds of command a bot can issue.
///
/// Each kind has a name in the structured format and a single-character
/// discriminator in the compact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Move an entity one step.
    Move,
}

impl CommandKind {
    /// Every known kind.
    pub const ALL: [CommandKind; 1] = [CommandKind::Move];

    /// Value of the `type` field in the structured format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CommandKind::Move => "move",
        }
    }

    /// Leading character in the compact format.
    #[must_use]
    pub const fn discriminator(self) -> char {
        match self {
            CommandKind::Move => 'm',
        }
    }

    /// Look a kind up by its structured-format name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Look a kind up by its compact-format discriminator.
    #[must_use]
    pub fn from_discriminator(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.discriminator() == c)
    }
}

/// A coordinate as sent by a bot.
///
/// Wider than [`Dimension`](crate::game::Dimension) and signed: any integer decodes, and whether it
/// names a cell is a game rule checked when the command is applied.
pub type Coordinate = i64;

/// A command issued by a player during their turn.
///
/// Commands are transient: decoded, applied once, then dropped. Both wire
/// formats decode into this type, so application is written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Command {
    /// Move the entity at `(x, y)` one step in `direction`.
    Move {
        /// Claimed x coordinate of the entity.
        x: Coordinate,
        /// Claimed y coordinate of the entity.
        y: Coordinate,
        /// Step to take.
        direction: Direction,
    },
}

impl Command {
    /// Shorthand for moving the entity at an in-range location.
    #[must_use]
    pub fn move_entity(location: Location, direction: Direction) -> Self {
        Command::Move {
            x: Coordinate::from(location.x),
            y: Coordinate::from(location.y),
            direction,
        }
    }

    /// The kind of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Command::Move { .. } => CommandKind::Move,
        }
    }

    /// Apply this command on behalf of `player`.
    ///
    /// Every precondition is checked before anything is touched, so on error
    /// the map and the player are exactly as they were. On success returns
    /// the entity's new location.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalCommand`] if the source is not a map location the
    /// player holds an entity on, or the player already has another entity on
    /// the destination.
    pub fn apply(&self, map: &mut Map, player: &mut Player) -> Result<Location, IllegalCommand> {
        match *self {
            Command::Move { x, y, direction } => self.apply_move(map, player, x, y, direction),
        }
    }

    fn apply_move(
        &self,
        map: &mut Map,
        player: &mut Player,
        x: Coordinate,
        y: Coordinate,
        direction: Direction,
    ) -> Result<Location, IllegalCommand> {
        let Some(location) = map
            .checked_location(x, y)
            .filter(|&location| player.has_entity_at(location))
        else {
            return Err(self.illegal(player, IllegalReason::UnownedEntity));
        };
        let destination = map.move_location(location, direction);
        if destination != location && player.has_entity_at(destination) {
            return Err(self.illegal(player, IllegalReason::SelfCollision { destination }));
        }

        // Take the entity out of both registries, then put it back under the
        // new key. Nothing else observes the world in between.
        let Some(entity) = player.remove_entity(location) else {
            return Err(self.illegal(player, IllegalReason::UnownedEntity));
        };
        map.at_mut(location).remove_entity(player.id);

        player.add_entity(destination, entity);
        map.at_mut(destination).add_entity(player.id, &entity);

        tracing::debug!(
            player = player.id,
            entity = entity.id,
            from = %location,
            to = %destination,
            "applied move"
        );
        Ok(destination)
    }

    fn illegal(&self, player: &Player, reason: IllegalReason) -> IllegalCommand {
        IllegalCommand {
            player: player.id,
            command: *self,
            reason,
        }
    }
}

impl fmt::Display for Command {
    /// Compact wire form, e.g. `m 3 2 e`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { x, y, direction } => {
                write!(f, "{} {x} {y} {direction}", self.kind().discriminator())
            }
        }
    }
}
