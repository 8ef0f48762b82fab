//! Structured-document wire format.
//!
//! A command is a JSON object carrying a `type` discriminator plus the
//! variant's fields:
//!
//! ```text
//! {"type": "move", "entity_x": 3, "entity_y": 2, "direction": "e"}
//! ```
//!
//! Key order is not significant. Unknown extra keys are ignored. Coordinates
//! may be any integer; an off-map value is a rule violation found when the
//! command is applied, not a decode failure.

use serde::Deserialize;
use serde_json::{Map as JsonObject, Value};

use crate::error::{DecodeError, DecodeReason};
use crate::game::Direction;
use crate::protocol::{Command, CommandKind, Coordinate};

/// Key holding the command type.
pub const TYPE_KEY: &str = "type";
/// Key holding the entity x coordinate.
pub const ENTITY_X_KEY: &str = "entity_x";
/// Key holding the entity y coordinate.
pub const ENTITY_Y_KEY: &str = "entity_y";
/// Key holding the direction token.
pub const DIRECTION_KEY: &str = "direction";

/// Fields of a move document.
#[derive(Deserialize)]
struct MoveFields {
    entity_x: Coordinate,
    entity_y: Coordinate,
    direction: Direction,
}

impl Command {
    /// Encode as a structured document.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = JsonObject::new();
        object.insert(TYPE_KEY.to_string(), Value::from(self.kind().name()));
        match self {
            Command::Move { x, y, direction } => {
                object.insert(ENTITY_X_KEY.to_string(), Value::from(*x));
                object.insert(ENTITY_Y_KEY.to_string(), Value::from(*y));
                object.insert(
                    DIRECTION_KEY.to_string(),
                    Value::from(direction.as_char().to_string()),
                );
            }
        }
        Value::Object(object)
    }

    /// Decode a structured document.
    ///
    /// The `type` field is read first and selects the variant; the variant
    /// then extracts its own fields.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] carrying `document` if the type is missing
    /// or unknown, or if any variant field is missing or malformed.
    pub fn from_json(document: &Value) -> Result<Self, DecodeError> {
        let Some(name) = document.get(TYPE_KEY).and_then(Value::as_str) else {
            return Err(DecodeError::new(document, DecodeReason::MissingType));
        };
        let Some(kind) = CommandKind::from_name(name) else {
            return Err(DecodeError::new(
                document,
                DecodeReason::UnknownType(name.to_string()),
            ));
        };

        match kind {
            CommandKind::Move => {
                let fields = MoveFields::deserialize(document).map_err(|e| {
                    DecodeError::new(document, DecodeReason::InvalidFields(e.to_string()))
                })?;
                Ok(Command::Move {
                    x: fields.entity_x,
                    y: fields.entity_y,
                    direction: fields.direction,
                })
            }
        }
    }

    /// Decode a structured document from text.
    ///
    /// # Errors
    ///
    /// Text that is not JSON at all is reported as a decode error on a JSON
    /// string holding the raw text.
    pub fn from_json_str(text: &str) -> Result<Self, DecodeError> {
        match serde_json::from_str::<Value>(text) {
            Ok(document) => Self::from_json(&document),
            Err(e) => Err(DecodeError::new(
                &Value::String(text.to_string()),
                DecodeReason::InvalidFields(e.to_string()),
            )),
        }
    }
}

impl TryFrom<Value> for Command {
    type Error = DecodeError;

    fn try_from(document: Value) -> Result<Self, Self::Error> {
        Command::from_json(&document)
    }
}

impl From<Command> for Value {
    fn from(command: Command) -> Self {
        command.to_json()
    }
}
