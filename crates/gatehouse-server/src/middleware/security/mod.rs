//! Security middleware for HTTP requests.

mod cors;

pub use cors::CorsConfig;
pub(crate) use cors::create_cors_layer;
