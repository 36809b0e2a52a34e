//! Fuzz test for operation unforging
//!
//! Ensures the parser handles malformed wire bytes gracefully

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return Err for invalid input
    let hex = hex::encode(data);
    let _ = tezkit_core::unforge_operation(&hex, false);
    let _ = tezkit_core::unforge_operation(&hex, true);
});
