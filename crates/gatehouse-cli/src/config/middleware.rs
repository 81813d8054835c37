//! Middleware configuration for the HTTP server.

use clap::Args;
use gatehouse_server::middleware::CorsConfig;

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            max_age_seconds = self.cors.max_age_seconds,
            "CORS configuration"
        );
    }
}
