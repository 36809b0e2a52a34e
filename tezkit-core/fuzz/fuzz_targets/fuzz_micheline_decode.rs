//! Fuzz test for expression decoding
//!
//! Ensures the recursive parser handles malformed input gracefully

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return Err for invalid input
    if let Ok((node, _)) = tezkit_core::micheline::decode_node(data) {
        // Anything that parses must re-encode
        let _ = tezkit_core::micheline::encode_node(&node).unwrap();
    }
});
