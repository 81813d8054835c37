#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use gatehouse_server::handler::routes;
use gatehouse_server::middleware::RouterExt;
use gatehouse_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "gatehouse_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "gatehouse_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "gatehouse_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    Cli::init_tracing();

    cli.validate()?;
    cli.log();

    let service_config =
        ServiceConfig::try_from(cli.service).context("invalid service configuration")?;
    let state = ServiceState::new(service_config)
        .await
        .context("failed to create service state")?;

    let router = create_router(state, &cli.middleware, &cli.server);
    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// The last layer added is the outermost:
/// 1. Error handling catches panics and enforces the request timeout.
/// 2. Observability assigns request ids and opens tracing spans.
/// 3. CORS answers preflight requests.
/// 4. Routes run the access guard and the handler.
fn create_router(
    state: ServiceState,
    middleware: &MiddlewareConfig,
    server: &config::ServerConfig,
) -> Router {
    routes(state.clone())
        .with_state(state)
        .with_cors_layer(&middleware.cors)
        .with_observability_layer()
        .with_error_handling_layer(server.request_timeout())
}
