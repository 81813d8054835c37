//! Token issuance and resolution.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jiff::{SignedDuration, Timestamp};

use super::claims::{Token, TokenClaims};
use super::error::{CodecError, CodecResult, DecodeReason};
use super::header::ProtectedHeader;
use crate::TRACING_TARGET_TOKEN;
use crate::crypto::{self, TokenKey};
use crate::identity::IdentitySnapshot;

/// Token lifetime used when none is configured.
pub const DEFAULT_TTL_DAYS: u32 = 60;

/// Number of dot-separated segments in a compact JWE.
const SEGMENT_COUNT: usize = 5;

/// Seconds in one day.
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Issues and resolves encrypted identity tokens.
///
/// The codec only holds the immutable key and is cheap to clone.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: Arc<TokenKey>,
}

impl TokenCodec {
    /// Creates a codec from a decoded key.
    pub fn new(key: TokenKey) -> Self {
        Self { key: Arc::new(key) }
    }

    /// Creates a codec from a hex-encoded 256-bit secret.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EncodingFailure`] if the secret is not valid hex
    /// or does not decode to exactly 32 bytes.
    pub fn from_hex(secret: &str) -> CodecResult<Self> {
        let key = TokenKey::from_hex(secret)?;
        Ok(Self::new(key))
    }

    /// Issues a token for `snapshot` that expires `ttl_days` from now.
    pub fn issue(&self, snapshot: &IdentitySnapshot, ttl_days: u32) -> CodecResult<Token> {
        self.issue_at(snapshot, ttl_days, Timestamp::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        snapshot: &IdentitySnapshot,
        ttl_days: u32,
        now: Timestamp,
    ) -> CodecResult<Token> {
        if ttl_days == 0 {
            return Err(CodecError::EncodingFailure(
                "token lifetime must be at least one day".to_owned(),
            ));
        }

        let ttl = SignedDuration::from_secs(i64::from(ttl_days) * SECONDS_PER_DAY);
        let expires_at = now
            .checked_add(ttl)
            .map_err(|e| CodecError::EncodingFailure(e.to_string()))?;
        let exp = expires_at.as_second();

        let header = serde_json::to_vec(&ProtectedHeader::direct(exp))
            .map_err(|e| CodecError::EncodingFailure(e.to_string()))?;
        let encoded_header = URL_SAFE_NO_PAD.encode(header);

        let claims = TokenClaims {
            data: snapshot.clone(),
            exp,
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|e| CodecError::EncodingFailure(e.to_string()))?;

        let sealed = crypto::seal(&self.key, &payload, encoded_header.as_bytes())?;

        let token = format!(
            "{}..{}.{}.{}",
            encoded_header,
            URL_SAFE_NO_PAD.encode(sealed.iv),
            URL_SAFE_NO_PAD.encode(&sealed.ciphertext),
            URL_SAFE_NO_PAD.encode(sealed.tag),
        );

        tracing::debug!(
            target: TRACING_TARGET_TOKEN,
            user_id = %snapshot.id,
            expires_at = %expires_at,
            "token issued"
        );

        Ok(Token::new(token))
    }

    /// Resolves a token into the embedded identity snapshot.
    ///
    /// The snapshot is returned as embedded; no credential store is consulted.
    pub fn resolve(&self, token: &str) -> CodecResult<IdentitySnapshot> {
        self.resolve_claims_at(token, Timestamp::now())
            .map(|claims| claims.data)
    }

    /// Resolves a token as if the current time were `now`.
    pub fn resolve_at(&self, token: &str, now: Timestamp) -> CodecResult<IdentitySnapshot> {
        self.resolve_claims_at(token, now).map(|claims| claims.data)
    }

    /// Resolves a token into its full claims, including the expiration.
    pub fn resolve_claims_at(&self, token: &str, now: Timestamp) -> CodecResult<TokenClaims> {
        let malformed = || CodecError::DecodingFailure(DecodeReason::Malformed);

        let segments: Vec<&str> = token.split('.').collect();
        let &[encoded_header, encrypted_key, iv, ciphertext, tag] = segments.as_slice() else {
            tracing::debug!(
                target: TRACING_TARGET_TOKEN,
                segments = segments.len(),
                expected = SEGMENT_COUNT,
                "token has wrong number of segments"
            );
            return Err(malformed());
        };

        // Direct encryption never carries an encrypted key.
        if !encrypted_key.is_empty() {
            return Err(malformed());
        }

        let header: ProtectedHeader = URL_SAFE_NO_PAD
            .decode(encoded_header)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or_else(malformed)?;

        if !header.is_supported() {
            tracing::debug!(
                target: TRACING_TARGET_TOKEN,
                alg = %header.alg,
                enc = %header.enc,
                "token uses unsupported algorithm"
            );
            return Err(CodecError::DecodingFailure(
                DecodeReason::UnsupportedAlgorithm,
            ));
        }

        let decode = |segment: &str| URL_SAFE_NO_PAD.decode(segment).map_err(|_| malformed());
        let iv = decode(iv)?;
        let ciphertext = decode(ciphertext)?;
        let tag = decode(tag)?;

        let payload = crypto::open(
            &self.key,
            &iv,
            &ciphertext,
            &tag,
            encoded_header.as_bytes(),
        )?;

        let claims: TokenClaims = serde_json::from_slice(&payload).map_err(|_| malformed())?;

        if header.exp.is_some_and(|exp| exp != claims.exp) {
            return Err(malformed());
        }

        if claims.is_expired_at(now) {
            tracing::debug!(
                target: TRACING_TARGET_TOKEN,
                user_id = %claims.data.id,
                exp = claims.exp,
                "token expired"
            );
            return Err(CodecError::DecodingFailure(DecodeReason::Expired));
        }

        Ok(claims)
    }
}
