//! Request extractors with error handling mapped onto [`handler::Error`].
//!
//! - [`AuthState`]: the identity attached by the authentication guard
//! - [`Json`]: JSON body with structured rejection messages
//! - [`ValidateJson`]: JSON body validated with the `validator` crate
//! - [`SanitizedJson`]: like [`ValidateJson`], with client-forbidden record
//!   fields stripped before deserialization
//! - [`Path`]: path parameters with structured rejection messages
//!
//! [`handler::Error`]: crate::handler::Error

pub mod auth;
pub mod reject;

pub use crate::extract::auth::AuthState;
pub use crate::extract::reject::{Json, Path, SanitizedJson, ValidateJson};
