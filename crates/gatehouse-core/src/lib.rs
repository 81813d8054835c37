#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for token codec operations.
pub const TRACING_TARGET_TOKEN: &str = "gatehouse_core::token";

/// Tracing target for cache operations.
pub const TRACING_TARGET_CACHE: &str = "gatehouse_core::cache";

pub mod cache;
pub mod crypto;
pub mod identity;
pub mod token;

pub use cache::TtlCache;
pub use identity::{IdentitySnapshot, UserRole};
pub use token::{CodecError, CodecResult, DecodeReason, Token, TokenClaims, TokenCodec};
