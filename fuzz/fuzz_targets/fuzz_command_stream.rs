#![no_main]

//! Compact stream decoder fuzzer.
//!
//! Bot output is untrusted bytes. Decoding must never panic, must stop at the
//! first fault, and whatever decodes must re-encode to an equivalent stream.

use arena::protocol::{encode_commands, parse_command_bytes, parse_commands, CommandStream};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        // Non-UTF-8 output is a protocol fault, never a panic.
        assert!(parse_command_bytes(data).is_err());
        return;
    };

    let mut stream = CommandStream::new(text);
    let mut decoded = Vec::new();
    while let Some(item) = stream.next() {
        match item {
            Ok(command) => decoded.push(command),
            Err(_) => {
                assert!(stream.next().is_none(), "stream continued after a fault");
                return;
            }
        }
    }

    assert_eq!(parse_command_bytes(data).as_ref(), Ok(&decoded));
    let reencoded = encode_commands(&decoded);
    assert_eq!(parse_commands(&reencoded).as_ref(), Ok(&decoded));
});
