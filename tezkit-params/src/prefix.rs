//! Base58Check prefix table
//!
//! Every textual identifier on the chain (addresses, keys, hashes,
//! signatures) is a Base58Check string whose leading bytes select the
//! entity kind. An entry is identified by its prefix bytes together with
//! the expected decoded payload length; some kinds share a prefix byte
//! count, so both must match during decoding.

use serde::{Deserialize, Serialize};

/// Entity-kind prefix enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prefix {
    /// tz1 — Ed25519 public key hash
    Ed25519PublicKeyHash,
    /// tz2 — secp256k1 public key hash
    Secp256k1PublicKeyHash,
    /// tz3 — P-256 public key hash
    P256PublicKeyHash,
    /// KT1 — originated contract hash
    ContractHash,
    /// B — block hash
    BlockHash,
    /// o — operation hash
    OperationHash,
    /// Net — chain id
    ChainId,
    /// edsk (54 chars) — Ed25519 seed
    Ed25519Seed,
    /// edsk (98 chars) — Ed25519 full secret key
    Ed25519SecretKey,
    /// spsk — secp256k1 secret key
    Secp256k1SecretKey,
    /// p2sk — P-256 secret key
    P256SecretKey,
    /// edesk — Ed25519 encrypted seed
    Ed25519EncryptedSeed,
    /// spesk — secp256k1 encrypted secret key
    Secp256k1EncryptedSecretKey,
    /// p2esk — P-256 encrypted secret key
    P256EncryptedSecretKey,
    /// edpk — Ed25519 public key
    Ed25519PublicKey,
    /// sppk — secp256k1 public key
    Secp256k1PublicKey,
    /// p2pk — P-256 public key
    P256PublicKey,
    /// edsig — Ed25519 signature
    Ed25519Signature,
    /// spsig1 — secp256k1 signature
    Secp256k1Signature,
    /// p2sig — P-256 signature
    P256Signature,
    /// sig — generic signature
    GenericSignature,
}

impl Prefix {
    /// All table entries, scanned during decoding
    pub const ALL: &'static [Prefix] = &[
        Prefix::Ed25519PublicKeyHash,
        Prefix::Secp256k1PublicKeyHash,
        Prefix::P256PublicKeyHash,
        Prefix::ContractHash,
        Prefix::BlockHash,
        Prefix::OperationHash,
        Prefix::ChainId,
        Prefix::Ed25519Seed,
        Prefix::Ed25519SecretKey,
        Prefix::Secp256k1SecretKey,
        Prefix::P256SecretKey,
        Prefix::Ed25519EncryptedSeed,
        Prefix::Secp256k1EncryptedSecretKey,
        Prefix::P256EncryptedSecretKey,
        Prefix::Ed25519PublicKey,
        Prefix::Secp256k1PublicKey,
        Prefix::P256PublicKey,
        Prefix::Ed25519Signature,
        Prefix::Secp256k1Signature,
        Prefix::P256Signature,
        Prefix::GenericSignature,
    ];

    /// Fixed prefix bytes prepended before Base58Check encoding
    pub const fn bytes(&self) -> &'static [u8] {
        match self {
            Prefix::Ed25519PublicKeyHash => &[6, 161, 159],
            Prefix::Secp256k1PublicKeyHash => &[6, 161, 161],
            Prefix::P256PublicKeyHash => &[6, 161, 164],
            Prefix::ContractHash => &[2, 90, 121],
            Prefix::BlockHash => &[1, 52],
            Prefix::OperationHash => &[5, 116],
            Prefix::ChainId => &[87, 82, 0],
            Prefix::Ed25519Seed => &[13, 15, 58, 7],
            Prefix::Ed25519SecretKey => &[43, 246, 78, 7],
            Prefix::Secp256k1SecretKey => &[17, 165, 224, 201],
            Prefix::P256SecretKey => &[16, 81, 238, 189],
            Prefix::Ed25519EncryptedSeed => &[7, 90, 60, 179, 41],
            Prefix::Secp256k1EncryptedSecretKey => &[9, 237, 241, 174, 150],
            Prefix::P256EncryptedSecretKey => &[9, 48, 57, 115, 171],
            Prefix::Ed25519PublicKey => &[13, 15, 37, 217],
            Prefix::Secp256k1PublicKey => &[3, 254, 226, 86],
            Prefix::P256PublicKey => &[3, 178, 139, 127],
            Prefix::Ed25519Signature => &[9, 245, 205, 134, 18],
            Prefix::Secp256k1Signature => &[13, 115, 101, 19, 63],
            Prefix::P256Signature => &[54, 240, 44, 52],
            Prefix::GenericSignature => &[4, 130, 43],
        }
    }

    /// Expected decoded payload length in bytes
    pub const fn payload_len(&self) -> usize {
        match self {
            Prefix::Ed25519PublicKeyHash
            | Prefix::Secp256k1PublicKeyHash
            | Prefix::P256PublicKeyHash
            | Prefix::ContractHash => 20,
            Prefix::BlockHash | Prefix::OperationHash => 32,
            Prefix::ChainId => 4,
            Prefix::Ed25519Seed
            | Prefix::Secp256k1SecretKey
            | Prefix::P256SecretKey => 32,
            Prefix::Ed25519SecretKey => 64,
            // 8-byte KDF salt followed by a 48-byte secretbox
            Prefix::Ed25519EncryptedSeed
            | Prefix::Secp256k1EncryptedSecretKey
            | Prefix::P256EncryptedSecretKey => 56,
            Prefix::Ed25519PublicKey => 32,
            Prefix::Secp256k1PublicKey | Prefix::P256PublicKey => 33,
            Prefix::Ed25519Signature
            | Prefix::Secp256k1Signature
            | Prefix::P256Signature
            | Prefix::GenericSignature => 64,
        }
    }
}
