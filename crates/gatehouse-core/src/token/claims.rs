//! Token payload and serialized form.

use derive_more::{Deref, Display};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::IdentitySnapshot;

/// Encrypted claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The identity snapshot.
    pub data: IdentitySnapshot,
    /// Expiration instant in seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// Returns the expiration instant.
    ///
    /// Values outside the supported range clamp to [`Timestamp::MIN`].
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_second(self.exp).unwrap_or(Timestamp::MIN)
    }

    /// Returns `true` if the claims are expired at `now`.
    #[inline]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_second() >= self.exp
    }
}

/// A serialized bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wraps an already serialized token.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
