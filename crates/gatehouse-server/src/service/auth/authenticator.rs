use std::time::Duration;

use gatehouse_core::{CodecError, IdentitySnapshot, TokenCodec, TtlCache};
use jiff::Timestamp;
use sha2::{Digest, Sha256};

use super::{AuthError, RejectReason};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Schemes accepted in the `Authorization` header.
const ACCEPTED_SCHEMES: [&str; 2] = ["Bearer", "Token"];

/// Extracts the token from a raw `Authorization` header value.
///
/// The value is split on single spaces and the first part must be exactly
/// `Bearer` or `Token`. An absent header, an unknown scheme and a missing or
/// empty token all yield [`AuthError::NoToken`].
pub fn parse_authorization(header: Option<&str>) -> Result<&str, AuthError> {
    let Some(value) = header else {
        return Err(AuthError::NoToken);
    };

    let mut parts = value.split(' ');
    let scheme = parts.next().unwrap_or_default();

    if !ACCEPTED_SCHEMES.contains(&scheme) {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            "authorization header uses an unsupported scheme"
        );
        return Err(AuthError::NoToken);
    }

    match parts.next() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::NoToken),
    }
}

/// Resolves bearer tokens into trusted identity snapshots.
///
/// Successful resolutions are memoized by token digest until the earlier of
/// the cache TTL and the token's expiration. Failures are never memoized.
#[derive(Debug, Clone)]
pub struct Authenticator {
    codec: TokenCodec,
    cache: TtlCache<String, IdentitySnapshot>,
}

impl Authenticator {
    /// Creates an authenticator with a resolution cache of the given TTL.
    pub fn new(codec: TokenCodec, resolve_cache_ttl: Duration) -> Self {
        Self {
            codec,
            cache: TtlCache::new("token_resolution", resolve_cache_ttl),
        }
    }

    /// Returns the token codec.
    #[inline]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authenticates a raw `Authorization` header value.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<IdentitySnapshot, AuthError> {
        self.authenticate_at(header, Timestamp::now()).await
    }

    /// Authenticates as if the current time were `now`.
    pub async fn authenticate_at(
        &self,
        header: Option<&str>,
        now: Timestamp,
    ) -> Result<IdentitySnapshot, AuthError> {
        let token = parse_authorization(header)?;
        let snapshot = self.resolve_at(token, now).await?;

        if !snapshot.active {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %snapshot.id,
                "token resolved to an inactive account"
            );
            return Err(AuthError::InvalidToken(RejectReason::Inactive));
        }

        Ok(snapshot)
    }

    /// Resolves a token through the cache.
    ///
    /// Inactive snapshots resolve successfully; rejecting them is the job of
    /// [`authenticate_at`].
    ///
    /// [`authenticate_at`]: Self::authenticate_at
    pub async fn resolve_at(
        &self,
        token: &str,
        now: Timestamp,
    ) -> Result<IdentitySnapshot, AuthError> {
        let digest = hex::encode(Sha256::digest(token.as_bytes()));

        self.cache
            .get_or_try_insert_with(digest, now, || async {
                let claims = self
                    .codec
                    .resolve_claims_at(token, now)
                    .map_err(Self::reject)?;
                let expires_at = claims.expires_at();
                Ok((claims.data, expires_at))
            })
            .await
    }

    fn reject(error: CodecError) -> AuthError {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            error = %error,
            "token resolution failed"
        );

        match error.decode_reason() {
            Some(reason) => AuthError::InvalidToken(RejectReason::Decode(reason)),
            None => AuthError::NoToken,
        }
    }
}
