//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Access guards: authentication, then role authorization, per operation
//! - Error handling: panics, timeouts and service errors
//! - Observability: request ids, tracing, sensitive header redaction
//! - Security: CORS
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use axum::Router;
//! use gatehouse_server::middleware::{CorsConfig, RouterExt};
//!
//! let app = Router::new()
//!     .with_error_handling_layer(Duration::from_secs(30))
//!     .with_observability_layer()
//!     .with_cors_layer(&CorsConfig::default());
//! ```

mod authentication;
mod error_handling;
mod extensions;
mod observability;
mod security;

pub use authentication::{GuardState, MethodRouterAccessExt, RouterRolesExt, require_access};
pub use error_handling::{catch_panic, handle_error};
pub use extensions::RouterExt;
pub use security::CorsConfig;
