use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use super::{Result, ServerError, shutdown_signal};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the listener and serves `app` with graceful shutdown.
pub(super) async fn serve_http(app: Router, server_config: ServerConfig) -> Result<()> {
    if let Err(err) = server_config.validate() {
        let error = ServerError::InvalidConfig(err.to_string());
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %error,
            error_code = error.error_code(),
            "Invalid server configuration"
        );
        return Err(error);
    }

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|source| {
        let error = ServerError::BindError {
            address: server_addr.to_string(),
            source,
        };

        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %error,
            error_code = error.error_code(),
            suggestion = error.suggestion(),
            "Failed to bind to address"
        );

        error
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(server_config.shutdown_timeout()))
    .await
    .map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %err,
            "Server encountered an error"
        );
        ServerError::Runtime(err)
    })?;

    tracing::info!(target: TRACING_TARGET_SERVER_SHUTDOWN, "Server shut down gracefully");
    Ok(())
}
