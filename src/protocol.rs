//! Bot command protocol.
//!
//! Commands arrive in one of two encodings:
//! - Structured documents (JSON) on the handshake/diagnostic channel
//! - A compact character-framed stream on the per-turn bot channel
//!
//! Both decode into the same [`Command`] value, which knows how to apply
//! itself to the map and the issuing player.

mod command;
mod json;
mod stream;

pub use command::{Command, CommandKind, Coordinate};
pub use json::{DIRECTION_KEY, ENTITY_X_KEY, ENTITY_Y_KEY, TYPE_KEY};
pub use stream::{encode_commands, parse_command_bytes, parse_commands, read_turn, CommandStream};
