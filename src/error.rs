//! Error types for command decoding and application.
//!
//! Three failure classes are kept distinct so the orchestrator can choose
//! its own penalty policy:
//! - [`DecodeError`]: a structured document could not be turned into a command.
//! - [`ProtocolError`]: the compact bot stream is malformed and cannot be resynchronized.
//! - [`IllegalCommand`]: a well-formed command broke a game rule.

use std::io;

use serde_json::Value;

use crate::game::{Location, PlayerId};
use crate::protocol::Command;

/// Why a structured document failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeReason {
    /// The document has no string `type` field.
    #[error("missing or non-string `type` field")]
    MissingType,
    /// The `type` field names no known command.
    #[error("unknown command type `{0}`")]
    UnknownType(String),
    /// A variant field is missing or has the wrong shape.
    #[error("invalid fields: {0}")]
    InvalidFields(String),
}

/// A structured document could not be decoded into a command.
///
/// Carries the offending document for diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot decode command from {document}: {reason}")]
pub struct DecodeError {
    /// The document as received.
    pub document: Value,
    /// What was wrong with it.
    pub reason: DecodeReason,
}

impl DecodeError {
    pub(crate) fn new(document: &Value, reason: DecodeReason) -> Self {
        Self {
            document: document.clone(),
            reason,
        }
    }
}

/// The compact command stream from a bot is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The discriminator character names no known command.
    #[error("unknown command discriminator `{0}`")]
    UnknownCommand(char),
    /// The stream ended in the middle of a command.
    #[error("command `{command}` is missing field `{field}`")]
    MissingField {
        /// Discriminator of the truncated command.
        command: char,
        /// The first field that was absent.
        field: &'static str,
    },
    /// A field token could not be parsed.
    #[error("invalid value `{token}` for field `{field}`")]
    InvalidField {
        /// Field being parsed.
        field: &'static str,
        /// The token as received.
        token: String,
    },
    /// The raw bytes are not UTF-8.
    #[error("invalid UTF-8 byte 0x{byte:02x} at offset {offset}")]
    InvalidEncoding {
        /// Byte offset of the first bad byte in the line.
        offset: usize,
        /// The bad byte.
        byte: u8,
    },
}

/// Which game rule an [`IllegalCommand`] violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalReason {
    /// The source is not a map location holding one of the player's entities.
    #[error("move unowned entity")]
    UnownedEntity,
    /// Another entity of the same player already sits on the destination.
    #[error("move onto own entity at {destination}")]
    SelfCollision {
        /// The blocked destination.
        destination: Location,
    },
}

/// A syntactically valid command that failed a game-rule precondition.
///
/// Raised before any mutation, so world state is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Attempt by player {player} to {reason} ({command})")]
pub struct IllegalCommand {
    /// The player that issued the command.
    pub player: PlayerId,
    /// The rejected command.
    pub command: Command,
    /// The rule that was broken.
    pub reason: IllegalReason,
}

/// Failure class, for picking a penalty without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Structured document decode failure.
    Decode,
    /// Bot communication fault.
    Communication,
    /// Game-rule violation.
    Illegal,
    /// Host-side failure: I/O, settings or snapshot loading.
    Host,
}

/// Umbrella error for the crate.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// Structured decode failure.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Compact stream failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// Rule violation.
    #[error(transparent)]
    Illegal(#[from] IllegalCommand),
    /// Snapshot validation failure.
    #[error(transparent)]
    Snapshot(#[from] crate::snapshot::SnapshotError),
    /// A JSON settings or snapshot document could not be parsed or written.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ArenaError {
    /// Classify this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Decode(_) => ErrorClass::Decode,
            Self::Protocol(_) => ErrorClass::Communication,
            Self::Illegal(_) => ErrorClass::Illegal,
            Self::Snapshot(_) | Self::Json(_) | Self::Io(_) => ErrorClass::Host,
        }
    }
}

/// Result alias used across the crate.
pub type ArenaResult<T> = Result<T, ArenaError>;
