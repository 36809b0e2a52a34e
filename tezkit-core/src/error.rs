//! Error types for the codec and key manager
//!
//! Every malformed input is reported as a distinct, inspectable value —
//! a miscoded operation must never reach signing, so nothing here is
//! defaulted or swallowed.

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Codec and key-manager errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Base58Check structural failure (alphabet, length, hex)
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Base58Check checksum did not match the payload
    #[error("Base58Check checksum mismatch")]
    ChecksumMismatch,

    /// No prefix-table entry matches the decoded bytes
    #[error("Unknown Base58Check prefix")]
    UnknownPrefix,

    /// Variable-length integer decode ran out of input or exceeded bounds
    #[error("Malformed integer: {0}")]
    MalformedInteger(String),

    /// Operation content tag byte not in the supported set
    #[error("Unknown operation kind: tag {0:#04x}")]
    UnknownOperationKind(u8),

    /// A length-prefixed region was not fully consumed by its parser
    #[error("Trailing bytes after a complete value")]
    TrailingBytes,

    /// Signed-operation buffer cannot hold a whole number of contents
    #[error("Truncated operation")]
    TruncatedOperation,

    /// A field expected more bytes than the buffer holds
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    /// An operation must carry at least one content
    #[error("Operation contains no contents")]
    EmptyOperation,

    /// Mnemonic failed word-list or checksum validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Encrypted secret key failed authentication (wrong password)
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Encoded material does not belong to a supported curve family
    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),

    /// Secret scalar rejected by the curve implementation
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}
