//! Liveness endpoint.

use axum::Router;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::response::Health;
use crate::middleware::MethodRouterAccessExt;
use crate::service::{OperationAccess, ServiceState};

/// Reports that the server is up.
#[tracing::instrument(skip_all)]
async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Returns a [`Router`] with all related routes.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new().route(
        "/health",
        get(health).with_access(state, OperationAccess::public()),
    )
}
