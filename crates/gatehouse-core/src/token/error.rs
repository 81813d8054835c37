//! Token codec error types.

use thiserror::Error;

use crate::crypto::CryptoError;

/// Result type for token codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Why a token could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DecodeReason {
    /// Wrong number of segments, bad base64 or unparsable JSON.
    Malformed,
    /// The header declares an algorithm other than `dir`/`A256GCM`.
    UnsupportedAlgorithm,
    /// Authentication tag check failed.
    Integrity,
    /// The expiration instant has passed.
    Expired,
}

/// Errors produced while issuing or resolving tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Serialization or encryption failed while issuing a token.
    #[error("token encoding failed: {0}")]
    EncodingFailure(String),
    /// The token could not be decrypted or validated.
    #[error("token decoding failed: {0}")]
    DecodingFailure(DecodeReason),
}

impl CodecError {
    /// Returns the decode reason, if this is a decoding failure.
    pub fn decode_reason(&self) -> Option<DecodeReason> {
        match self {
            Self::DecodingFailure(reason) => Some(*reason),
            Self::EncodingFailure(_) => None,
        }
    }

    /// Returns `true` if the token was rejected only because it expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.decode_reason() == Some(DecodeReason::Expired)
    }
}

impl From<CryptoError> for CodecError {
    fn from(error: CryptoError) -> Self {
        match error {
            CryptoError::EncryptionFailed
            | CryptoError::InvalidKeyEncoding
            | CryptoError::InvalidKeyLength(_) => Self::EncodingFailure(error.to_string()),
            CryptoError::InvalidPartLength(_) => Self::DecodingFailure(DecodeReason::Malformed),
            CryptoError::DecryptionFailed => Self::DecodingFailure(DecodeReason::Integrity),
        }
    }
}
