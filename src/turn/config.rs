//! Turn application settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArenaResult;

/// Default cap on commands processed per player per turn.
pub const DEFAULT_MAX_COMMANDS_PER_TURN: usize = 1024;

/// What happens to a player's remaining commands after one is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IllegalCommandPolicy {
    /// Report the rejected command and keep going.
    #[default]
    SkipCommand,
    /// Report it and discard everything the player still had queued.
    EndPlayerTurn,
}

/// Settings for [`apply_turn`](crate::turn::apply_turn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    /// Commands beyond this count are dropped unprocessed.
    pub max_commands_per_turn: usize,
    /// Handling of illegal commands.
    pub on_illegal: IllegalCommandPolicy,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            max_commands_per_turn: DEFAULT_MAX_COMMANDS_PER_TURN,
            on_illegal: IllegalCommandPolicy::default(),
        }
    }
}

impl TurnConfig {
    /// Parse settings from JSON text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid settings document.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> ArenaResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }
}
