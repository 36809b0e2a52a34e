//! Tezos operation codec and key management
//!
//! This crate implements the hard core of a Tezos client: forging and
//! unforging manager operations (reveal, transaction, origination,
//! delegation) to the chain's bit-exact binary wire format, the
//! Base58Check and variable-length integer codecs underneath it, and key
//! derivation for the three supported curve families — from a mnemonic
//! phrase, an encrypted secret key, or a plain encoded secret.
//!
//! Everything here is synchronous and pure: no network, no disk, no shared
//! mutable state beyond read-only constant tables. Callers resolve the
//! branch block hash themselves and sign the forged bytes with their own
//! machinery.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod base58;
mod cursor;
pub mod error;
pub mod forge;
pub mod keys;
pub mod micheline;
pub mod zarith;

pub use error::{Error, Result};
pub use forge::{
    forge_operation, unforge_operation, Delegation, Entrypoint, Operation, OperationContent,
    Origination, Reveal, Script, Transaction, TransactionParameters,
};
pub use keys::{generate_mnemonic, Key, PublicKey};
pub use micheline::Micheline;
pub use tezkit_params::{Curve, Prefix};
pub use zarith::BigInt;
