// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Arena: the deterministic turn-resolution core of a bot arena.
//!
//! Bots submit commands each turn; this crate decodes them, checks them
//! against the current world and applies them:
//! - Two wire formats (structured JSON documents and a compact stream)
//! - Ownership validation before any mutation
//! - Toroidal movement on a shared map
//! - Map cells and player registries updated in lockstep
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Orchestrator (bots, timing)       │
//! ├─────────────────────────────────────┤
//! │   Turn application (turn)           │
//! ├─────────────────────────────────────┤
//! │   Protocol: decode + apply          │
//! ├─────────────────────────────────────┤
//! │   Game state: Map, Player, World    │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod game;
pub mod protocol;
pub mod snapshot;
pub mod turn;

pub use error::{
    ArenaError, ArenaResult, DecodeError, DecodeReason, ErrorClass, IllegalCommand,
    IllegalReason, ProtocolError,
};

// Re-export key types at crate root for convenience
pub use game::{Cell, Direction, Entity, EntityId, Location, Map, Player, PlayerId, World};
pub use protocol::{Command, CommandKind, CommandStream, Coordinate};
pub use snapshot::WorldSnapshot;
pub use turn::{apply_turn, Submission, TurnConfig, TurnReport};
