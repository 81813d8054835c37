//! Cryptographic error types.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The configured secret is not valid hexadecimal.
    #[error("invalid key encoding: expected a hex string")]
    InvalidKeyEncoding,
    /// The provided key has an invalid length.
    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),
    /// The initialization vector or tag has the wrong size.
    #[error("invalid {0} length")]
    InvalidPartLength(&'static str),
    /// Encryption failed.
    #[error("encryption failed")]
    EncryptionFailed,
    /// Decryption failed - data may be corrupted or tampered with.
    #[error("decryption failed: data may be corrupted or tampered with")]
    DecryptionFailed,
}
