//! Fuzz test for Base58Check decoding
//!
//! Ensures the decoder handles malformed input gracefully

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string
    if let Ok(s) = std::str::from_utf8(data) {
        // Should never panic, only return Err for invalid input
        let _ = tezkit_core::base58::decode(s);
    }
});
