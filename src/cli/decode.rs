//! Decode command implementation.

use std::fs;
use std::path::PathBuf;

use arena::protocol::{encode_commands, CommandStream};
use arena::ArenaError;

use super::{CliError, DecodeFormat};

/// Execute the decode command.
///
/// Commands decoded before a protocol fault are still printed, so the
/// output shows exactly where the stream went wrong.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the stream is malformed.
pub(crate) fn execute(input: PathBuf, format: DecodeFormat) -> Result<(), CliError> {
    let text = fs::read_to_string(&input)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", input.display())))?;

    let mut commands = Vec::new();
    let mut fault = None;
    for decoded in CommandStream::new(&text) {
        match decoded {
            Ok(command) => commands.push(command),
            Err(e) => fault = Some(e),
        }
    }

    match format {
        DecodeFormat::Json => {
            for command in &commands {
                println!("{}", command.to_json());
            }
        }
        DecodeFormat::Compact => println!("{}", encode_commands(&commands)),
    }

    match fault {
        Some(e) => Err(ArenaError::from(e).into()),
        None => Ok(()),
    }
}
