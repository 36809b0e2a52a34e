//! Key derivation and management
//!
//! Builds a [`Key`] from one of three sources — a BIP-39 mnemonic with the
//! ecosystem's fundraiser passphrase convention, a password-encrypted
//! secret key, or a plain Base58Check-encoded secret — and derives the
//! public key and checksummed address for each of the three curve
//! families. Secret material lives in zero-on-drop buffers and leaves the
//! value only through the explicit encoded accessor.

use crate::{base58, Error, Result};
use bip39::{Language, Mnemonic};
use blake2b_simd::Params as Blake2bParams;
use crypto_secretbox::{
    aead::{Aead, KeyInit},
    Nonce, XSalsa20Poly1305,
};
use once_cell::sync::Lazy;
use sha2::Sha512;
use tezkit_params::{Curve, Prefix};
use zeroize::Zeroizing;

/// PBKDF2-HMAC-SHA512 rounds for the encrypted secret key format.
/// Fixed by the wallet format; changing it breaks decryption of every
/// existing encrypted key.
const ENCRYPTED_KEY_ITERATIONS: u32 = 32_768;
/// Leading bytes of an encrypted payload holding the KDF salt
const ENCRYPTED_SALT_LEN: usize = 8;
/// Public key hash digest length
const ADDRESS_HASH_LEN: usize = 20;

static SECP256K1: Lazy<secp256k1::Secp256k1<secp256k1::SignOnly>> =
    Lazy::new(secp256k1::Secp256k1::signing_only);

/// Derived public key with its curve family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    curve: Curve,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Parse an encoded public key (edpk / sppk / p2pk).
    pub fn from_base58(encoded: &str) -> Result<Self> {
        let (prefix, bytes) = base58::decode(encoded)?;
        let curve = match prefix {
            Prefix::Ed25519PublicKey => Curve::Ed25519,
            Prefix::Secp256k1PublicKey => Curve::Secp256k1,
            Prefix::P256PublicKey => Curve::P256,
            other => {
                return Err(Error::UnsupportedCurve(format!(
                    "{other:?} is not a public key prefix"
                )))
            }
        };
        Ok(Self { curve, bytes })
    }

    /// Curve family of this key
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Raw key bytes (32 for Ed25519, 33 compressed otherwise)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base58Check form with the curve-specific public key prefix
    pub fn to_base58(&self) -> String {
        base58::encode(self.curve.public_key_prefix(), &self.bytes)
            .expect("public key length matches the prefix table")
    }

    /// Checksummed address: the curve-prefixed hash of the key bytes
    pub fn address(&self) -> String {
        let hash = Blake2bParams::new()
            .hash_length(ADDRESS_HASH_LEN)
            .hash(&self.bytes);
        base58::encode(self.curve.address_prefix(), hash.as_bytes())
            .expect("address hash length matches the prefix table")
    }
}

/// Immutable key pair
///
/// Constructed once through one of the three derivation paths and never
/// mutated. The secret buffer is zeroized on drop.
pub struct Key {
    curve: Curve,
    secret: Zeroizing<Vec<u8>>,
    public_key: PublicKey,
}

impl Key {
    /// Derive from a mnemonic phrase.
    ///
    /// The seed passphrase is `email` followed by `password` — the
    /// fundraiser wallet convention, which differs from plain BIP-39
    /// derivation whenever an email is present. Pass an empty email for
    /// standard passphrase-only derivation.
    pub fn from_mnemonic(curve: Curve, mnemonic: &str, email: &str, password: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, mnemonic)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

        tracing::debug!(?curve, "deriving key from mnemonic");
        let passphrase = Zeroizing::new(format!("{email}{password}"));
        let seed = Zeroizing::new(mnemonic.to_seed(passphrase.as_str()));
        Self::from_secret_bytes(curve, &seed[..32])
    }

    /// Decrypt a password-encrypted secret key (edesk / spesk / p2esk).
    pub fn from_encrypted(encoded: &str, password: &str) -> Result<Self> {
        let (prefix, payload) = base58::decode(encoded)?;
        let curve = match prefix {
            Prefix::Ed25519EncryptedSeed => Curve::Ed25519,
            Prefix::Secp256k1EncryptedSecretKey => Curve::Secp256k1,
            Prefix::P256EncryptedSecretKey => Curve::P256,
            other => {
                return Err(Error::UnsupportedCurve(format!(
                    "{other:?} is not an encrypted secret key prefix"
                )))
            }
        };

        tracing::debug!(?curve, "decrypting secret key");
        let (salt, sealed) = payload.split_at(ENCRYPTED_SALT_LEN);
        let mut symmetric_key = Zeroizing::new([0u8; 32]);
        pbkdf2::pbkdf2_hmac::<Sha512>(
            password.as_bytes(),
            salt,
            ENCRYPTED_KEY_ITERATIONS,
            symmetric_key.as_mut(),
        );

        // NaCl secretbox with the conventional all-zero nonce; the nonce is
        // never reused because every key carries a fresh salt.
        let cipher = XSalsa20Poly1305::new(symmetric_key.as_ref().into());
        let secret = Zeroizing::new(
            cipher
                .decrypt(&Nonce::default(), sealed)
                .map_err(|_| Error::DecryptionFailed)?,
        );
        Self::from_secret_bytes(curve, &secret)
    }

    /// Parse a plain encoded secret key (edsk in either form, spsk, p2sk).
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let (prefix, payload) = base58::decode(encoded)?;
        match prefix {
            Prefix::Ed25519Seed => Self::from_secret_bytes(Curve::Ed25519, &payload),
            // Full form carries seed then public key; the seed alone
            // determines the pair.
            Prefix::Ed25519SecretKey => Self::from_secret_bytes(Curve::Ed25519, &payload[..32]),
            Prefix::Secp256k1SecretKey => Self::from_secret_bytes(Curve::Secp256k1, &payload),
            Prefix::P256SecretKey => Self::from_secret_bytes(Curve::P256, &payload),
            other => Err(Error::UnsupportedCurve(format!(
                "{other:?} is not a secret key prefix"
            ))),
        }
    }

    /// Derive the pair from a 32-byte seed (Ed25519) or scalar.
    fn from_secret_bytes(curve: Curve, secret: &[u8]) -> Result<Self> {
        if secret.len() != 32 {
            return Err(Error::InvalidKey(format!(
                "secret material must be 32 bytes, got {}",
                secret.len()
            )));
        }
        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(secret);

        let (secret, public) = match curve {
            Curve::Ed25519 => {
                let signing = ed25519_dalek::SigningKey::from_bytes(&seed);
                let verifying = signing.verifying_key();
                // Stored form is seed followed by public key, matching the
                // 98-character encoded secret.
                let mut full = Zeroizing::new(Vec::with_capacity(64));
                full.extend_from_slice(seed.as_ref());
                full.extend_from_slice(verifying.as_bytes());
                (full, verifying.as_bytes().to_vec())
            }
            Curve::Secp256k1 => {
                let signing = secp256k1::SecretKey::from_slice(seed.as_ref())
                    .map_err(|e| Error::InvalidKey(e.to_string()))?;
                let public = secp256k1::PublicKey::from_secret_key(&SECP256K1, &signing);
                (
                    Zeroizing::new(seed.to_vec()),
                    public.serialize().to_vec(),
                )
            }
            Curve::P256 => {
                use p256::elliptic_curve::sec1::ToEncodedPoint;
                let signing = p256::SecretKey::from_slice(seed.as_ref())
                    .map_err(|e| Error::InvalidKey(e.to_string()))?;
                let public = signing.public_key().to_encoded_point(true);
                (Zeroizing::new(seed.to_vec()), public.as_bytes().to_vec())
            }
        };

        Ok(Self {
            curve,
            secret,
            public_key: PublicKey {
                curve,
                bytes: public,
            },
        })
    }

    /// Curve family of this key
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Derived public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Checksummed address of the derived public key
    pub fn address(&self) -> String {
        self.public_key.address()
    }

    /// Base58Check-encoded secret key
    pub fn secret_key(&self) -> String {
        let prefix = match self.curve {
            Curve::Ed25519 => Prefix::Ed25519SecretKey,
            Curve::Secp256k1 => Prefix::Secp256k1SecretKey,
            Curve::P256 => Prefix::P256SecretKey,
        };
        base58::encode(prefix, &self.secret).expect("secret length matches the prefix table")
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secret material stays out of logs.
        f.debug_struct("Key")
            .field("curve", &self.curve)
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Generate a fresh mnemonic from OS entropy.
///
/// Accepts 12, 15, 18, or 21 words; anything else falls back to 24.
pub fn generate_mnemonic(word_count: Option<u32>) -> String {
    let entropy_size = match word_count.unwrap_or(24) {
        12 => 16,
        15 => 20,
        18 => 24,
        21 => 28,
        _ => 32,
    };

    let mut entropy = vec![0u8; entropy_size];
    use rand::RngCore;
    rand::thread_rng().fill_bytes(&mut entropy);

    Mnemonic::from_entropy(&entropy)
        .expect("entropy sizes above are all valid")
        .to_string()
}
