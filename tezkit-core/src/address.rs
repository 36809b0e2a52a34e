//! Leaf wire encodings for addresses and public keys
//!
//! The operation codec embeds addresses in two raw forms: a tagged public
//! key hash (curve tag byte + 20-byte hash) wherever the field is
//! structurally an implicit account, and a 22-byte contract id (implicit
//! or originated) for transaction destinations. Public keys are a curve
//! tag byte followed by the raw key bytes.

use crate::{base58, Error, Result};
use tezkit_params::{Curve, Prefix};

/// Tagged public key hash length: curve tag + 20-byte hash
pub const TAGGED_HASH_LEN: usize = 21;
/// Contract id length: origination tag + tagged hash (or padded contract hash)
pub const CONTRACT_ID_LEN: usize = 22;

fn curve_of_address_prefix(prefix: Prefix) -> Option<Curve> {
    match prefix {
        Prefix::Ed25519PublicKeyHash => Some(Curve::Ed25519),
        Prefix::Secp256k1PublicKeyHash => Some(Curve::Secp256k1),
        Prefix::P256PublicKeyHash => Some(Curve::P256),
        _ => None,
    }
}

/// Forge an implicit account address into its tagged key-hash form.
pub fn forge_address(address: &str) -> Result<[u8; TAGGED_HASH_LEN]> {
    let (prefix, payload) = base58::decode(address)?;
    let curve = curve_of_address_prefix(prefix).ok_or(Error::UnknownPrefix)?;

    let mut out = [0u8; TAGGED_HASH_LEN];
    out[0] = curve.tag();
    out[1..].copy_from_slice(&payload);
    Ok(out)
}

/// Recover an implicit account address from its tagged key-hash form.
pub fn unforge_address(bytes: &[u8; TAGGED_HASH_LEN]) -> Result<String> {
    let curve = Curve::from_tag(bytes[0])
        .ok_or_else(|| Error::UnsupportedCurve(format!("address tag {:#04x}", bytes[0])))?;
    base58::encode(curve.address_prefix(), &bytes[1..])
}

/// Forge a transaction destination into its 22-byte contract id form.
///
/// Implicit accounts are 0x00 followed by the tagged key hash; originated
/// contracts are 0x01 followed by the contract hash and a padding byte.
pub fn forge_contract_id(address: &str) -> Result<[u8; CONTRACT_ID_LEN]> {
    let (prefix, payload) = base58::decode(address)?;
    let mut out = [0u8; CONTRACT_ID_LEN];

    if let Some(curve) = curve_of_address_prefix(prefix) {
        out[0] = 0x00;
        out[1] = curve.tag();
        out[2..].copy_from_slice(&payload);
        return Ok(out);
    }
    if prefix == Prefix::ContractHash {
        out[0] = 0x01;
        out[1..21].copy_from_slice(&payload);
        out[21] = 0x00;
        return Ok(out);
    }
    Err(Error::UnknownPrefix)
}

/// Recover a transaction destination from its 22-byte contract id form.
pub fn unforge_contract_id(bytes: &[u8; CONTRACT_ID_LEN]) -> Result<String> {
    match bytes[0] {
        0x00 => {
            let mut tagged = [0u8; TAGGED_HASH_LEN];
            tagged.copy_from_slice(&bytes[1..]);
            unforge_address(&tagged)
        }
        0x01 => base58::encode(Prefix::ContractHash, &bytes[1..21]),
        tag => Err(Error::MalformedEncoding(format!(
            "invalid contract id tag {tag:#04x}"
        ))),
    }
}

/// Forge an encoded public key into its tagged raw form.
pub fn forge_public_key(public_key: &str) -> Result<Vec<u8>> {
    let (prefix, payload) = base58::decode(public_key)?;
    let curve = match prefix {
        Prefix::Ed25519PublicKey => Curve::Ed25519,
        Prefix::Secp256k1PublicKey => Curve::Secp256k1,
        Prefix::P256PublicKey => Curve::P256,
        _ => return Err(Error::UnknownPrefix),
    };

    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(curve.tag());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Parse a tagged raw public key, returning its encoded form and the
/// number of bytes consumed.
pub fn unforge_public_key(bytes: &[u8]) -> Result<(String, usize)> {
    let tag = *bytes.first().ok_or(Error::UnexpectedEndOfInput)?;
    let curve = Curve::from_tag(tag)
        .ok_or_else(|| Error::UnsupportedCurve(format!("public key tag {tag:#04x}")))?;

    let key_len = curve.public_key_len();
    if bytes.len() < 1 + key_len {
        return Err(Error::UnexpectedEndOfInput);
    }
    let encoded = base58::encode(curve.public_key_prefix(), &bytes[1..1 + key_len])?;
    Ok((encoded, 1 + key_len))
}
