#![no_main]

//! Structured document decoder fuzzer.

use arena::Command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    match Command::from_json(&document) {
        Ok(command) => assert_eq!(Command::from_json(&command.to_json()), Ok(command)),
        Err(err) => assert_eq!(err.document, document),
    }
});
