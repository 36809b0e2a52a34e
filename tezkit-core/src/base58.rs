//! Base58Check codec
//!
//! Text encoding for every chain identifier: fixed prefix bytes select the
//! entity kind, a 4-byte double-SHA-256 checksum guards the payload, and
//! the whole buffer is base-58 encoded with leading-zero preservation.
//! Decoding matches the prefix table on prefix bytes and payload length
//! simultaneously, since some kinds share a byte count.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use tezkit_params::Prefix;

const CHECKSUM_LEN: usize = 4;

fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(bytes));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Encode a payload under the given entity-kind prefix.
///
/// The payload length must match the prefix-table entry; anything else is
/// a caller bug surfaced as [`Error::MalformedEncoding`].
pub fn encode(prefix: Prefix, payload: &[u8]) -> Result<String> {
    if payload.len() != prefix.payload_len() {
        return Err(Error::MalformedEncoding(format!(
            "{:?} payload must be {} bytes, got {}",
            prefix,
            prefix.payload_len(),
            payload.len()
        )));
    }

    let mut buffer = Vec::with_capacity(prefix.bytes().len() + payload.len() + CHECKSUM_LEN);
    buffer.extend_from_slice(prefix.bytes());
    buffer.extend_from_slice(payload);
    let check = checksum(&buffer);
    buffer.extend_from_slice(&check);

    Ok(bs58::encode(buffer).into_string())
}

/// Decode a Base58Check string, recovering the entity kind and payload.
pub fn decode(encoded: &str) -> Result<(Prefix, Vec<u8>)> {
    let decoded = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::MalformedEncoding(format!("base58 decode failed: {e}")))?;

    if decoded.len() < CHECKSUM_LEN {
        return Err(Error::MalformedEncoding(
            "decoded string shorter than its checksum".to_string(),
        ));
    }
    let (body, check) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if checksum(body) != check {
        return Err(Error::ChecksumMismatch);
    }

    for &prefix in Prefix::ALL {
        if body.starts_with(prefix.bytes())
            && body.len() - prefix.bytes().len() == prefix.payload_len()
        {
            return Ok((prefix, body[prefix.bytes().len()..].to_vec()));
        }
    }
    Err(Error::UnknownPrefix)
}

/// Decode a Base58Check string that must carry a specific entity kind.
///
/// Any other kind — even a structurally valid one — fails with
/// [`Error::UnknownPrefix`], so an address of one curve family is never
/// accepted where another family is expected.
pub fn decode_expecting(encoded: &str, expected: Prefix) -> Result<Vec<u8>> {
    let (prefix, payload) = decode(encoded)?;
    if prefix != expected {
        return Err(Error::UnknownPrefix);
    }
    Ok(payload)
}
