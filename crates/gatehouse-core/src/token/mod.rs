//! Encrypted bearer tokens.
//!
//! Tokens use JWE compact serialization with direct key agreement
//! (`alg: dir`) and AES-256-GCM content encryption (`enc: A256GCM`):
//!
//! ```text
//! BASE64URL(header) . (empty) . BASE64URL(iv) . BASE64URL(ciphertext) . BASE64URL(tag)
//! ```
//!
//! The encrypted-key segment is always empty because the content is
//! encrypted with the pre-shared key directly. The encoded header is used as
//! additional authenticated data, so any change to it breaks decryption.

mod claims;
mod codec;
mod error;
mod header;

pub use claims::{Token, TokenClaims};
pub use codec::{DEFAULT_TTL_DAYS, TokenCodec};
pub use error::{CodecError, CodecResult, DecodeReason};
pub use header::{ALG_DIR, ENC_A256GCM, ProtectedHeader};
