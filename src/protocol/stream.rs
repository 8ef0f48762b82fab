//! Compact streaming wire format.
//!
//! Each turn a bot writes one line of commands. A command is a single
//! discriminator character followed by whitespace-separated fields in
//! constructor order:
//!
//! ```text
//! m 3 2 e m 0 0 o
//! ```
//!
//! The stream is positionally framed, so decoding stops for good at the first
//! malformed command. Running out of input is the normal end of a turn.
//! Coordinates are any decimal integer; whether they name an owned cell is
//! decided when the command is applied.

use std::io::BufRead;
use std::str::FromStr;

use crate::error::{ArenaResult, ProtocolError};
use crate::game::Direction;
use crate::protocol::{Command, CommandKind, Coordinate};

/// Iterator decoding commands from compact text.
///
/// Yields `None` once the input is exhausted or after the first error.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone)]
pub struct CommandStream<'a> {
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> CommandStream<'a> {
    /// Start decoding `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Next non-whitespace character, consumed on its own.
    fn next_char(&mut self) -> Option<char> {
        self.skip_whitespace();
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Next whitespace-delimited token.
    fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    fn field<T: FromStr>(&mut self, command: char, field: &'static str) -> Result<T, ProtocolError> {
        let token = self
            .next_token()
            .ok_or(ProtocolError::MissingField { command, field })?;
        token.parse().map_err(|_| ProtocolError::InvalidField {
            field,
            token: token.to_string(),
        })
    }

    fn read_command(&mut self) -> Result<Option<Command>, ProtocolError> {
        let Some(c) = self.next_char() else {
            return Ok(None);
        };
        let kind = CommandKind::from_discriminator(c).ok_or(ProtocolError::UnknownCommand(c))?;

        match kind {
            CommandKind::Move => {
                let x: Coordinate = self.field(c, "entity_x")?;
                let y: Coordinate = self.field(c, "entity_y")?;
                let direction: Direction = self.field(c, "direction")?;
                Ok(Some(Command::Move { x, y, direction }))
            }
        }
    }
}

impl Iterator for CommandStream<'_> {
    type Item = Result<Command, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_command() {
            Ok(command) => command.map(Ok),
            Err(e) => {
                self.failed = true;
                tracing::warn!(error = %e, offset = self.pos, "malformed command stream");
                Some(Err(e))
            }
        }
    }
}

/// Decode every command in `input`.
///
/// # Errors
///
/// Returns the first [`ProtocolError`]; commands before it are discarded
/// because the stream cannot be trusted past that point.
pub fn parse_commands(input: &str) -> Result<Vec<Command>, ProtocolError> {
    CommandStream::new(input).collect()
}

/// Decode every command in raw bot output.
///
/// Bytes that are not UTF-8 are a protocol fault like any other. A fault
/// already complete before the bad byte is reported instead, so the error
/// always points at the first offending input.
///
/// # Errors
///
/// Returns the first [`ProtocolError`], including
/// [`ProtocolError::InvalidEncoding`] for a non-UTF-8 byte.
pub fn parse_command_bytes(input: &[u8]) -> Result<Vec<Command>, ProtocolError> {
    let error = match std::str::from_utf8(input) {
        Ok(text) => return parse_commands(text),
        Err(error) => error,
    };
    let offset = error.valid_up_to();
    let prefix = std::str::from_utf8(&input[..offset]).unwrap_or_default();

    match parse_commands(prefix) {
        Err(e @ (ProtocolError::UnknownCommand(_) | ProtocolError::InvalidField { .. })) => Err(e),
        _ => {
            let byte = input[offset];
            tracing::warn!(offset, byte, "non-UTF-8 byte in command stream");
            Err(ProtocolError::InvalidEncoding { offset, byte })
        }
    }
}

/// Encode commands in compact form, separated by single spaces.
#[must_use]
pub fn encode_commands(commands: &[Command]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read one bot turn (a single line) from `reader`.
///
/// Returns `Ok(None)` at end of input.
///
/// # Errors
///
/// Returns [`ArenaError::Io`](crate::ArenaError::Io) if reading fails, and
/// [`ArenaError::Protocol`](crate::ArenaError::Protocol) if the line is
/// malformed or not UTF-8.
pub fn read_turn<R: BufRead>(reader: &mut R) -> ArenaResult<Option<Vec<Command>>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(parse_command_bytes(&line)?))
}
