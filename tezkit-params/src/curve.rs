//! Supported curve families

use crate::prefix::Prefix;
use serde::{Deserialize, Serialize};

/// Curve family enumeration
///
/// Every address, public key, and secret key on the chain belongs to one of
/// these three families. The wire format identifies the family with a
/// single tag byte wherever a key or key hash is embedded in an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// Twisted-Edwards (tz1 / edpk / edsk)
    Ed25519,
    /// Short-Weierstrass secp256k1 (tz2 / sppk / spsk)
    Secp256k1,
    /// Short-Weierstrass NIST P-256 (tz3 / p2pk / p2sk)
    P256,
}

impl Curve {
    /// Wire tag byte used for tagged key hashes and public keys
    pub const fn tag(&self) -> u8 {
        match self {
            Curve::Ed25519 => 0,
            Curve::Secp256k1 => 1,
            Curve::P256 => 2,
        }
    }

    /// Resolve a wire tag byte back to its curve family
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Curve::Ed25519),
            1 => Some(Curve::Secp256k1),
            2 => Some(Curve::P256),
            _ => None,
        }
    }

    /// Length of a raw public key for this family (bytes)
    ///
    /// Ed25519 keys are 32-byte points; both Weierstrass families use
    /// 33-byte compressed points.
    pub const fn public_key_len(&self) -> usize {
        match self {
            Curve::Ed25519 => 32,
            Curve::Secp256k1 | Curve::P256 => 33,
        }
    }

    /// Address (public key hash) prefix for this family
    pub const fn address_prefix(&self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::Ed25519PublicKeyHash,
            Curve::Secp256k1 => Prefix::Secp256k1PublicKeyHash,
            Curve::P256 => Prefix::P256PublicKeyHash,
        }
    }

    /// Public key prefix for this family
    pub const fn public_key_prefix(&self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::Ed25519PublicKey,
            Curve::Secp256k1 => Prefix::Secp256k1PublicKey,
            Curve::P256 => Prefix::P256PublicKey,
        }
    }

    /// Secret key prefix for this family
    ///
    /// For Ed25519 this is the 98-character full secret key form; the
    /// 32-byte seed form has its own prefix ([`Prefix::Ed25519Seed`]).
    pub const fn secret_key_prefix(&self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::Ed25519SecretKey,
            Curve::Secp256k1 => Prefix::Secp256k1SecretKey,
            Curve::P256 => Prefix::P256SecretKey,
        }
    }

    /// Encrypted secret key prefix for this family
    pub const fn encrypted_secret_key_prefix(&self) -> Prefix {
        match self {
            Curve::Ed25519 => Prefix::Ed25519EncryptedSeed,
            Curve::Secp256k1 => Prefix::Secp256k1EncryptedSecretKey,
            Curve::P256 => Prefix::P256EncryptedSecretKey,
        }
    }
}
