//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Every operation declares its [`OperationAccess`] next to its route.
//! Routers that expose only restricted operations also attach route-level
//! roles, which are joined with the operation's own.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler
//! [`OperationAccess`]: crate::service::OperationAccess

mod authentication;
mod error;
mod monitors;
mod request;
mod response;
mod roles;
mod users;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{ClientError, Error, ErrorKind, Result};
pub use crate::handler::request::*;
pub use crate::handler::response::{
    DeletedRecords, DeletionError, DeletionErrorDetail, DeletionErrors, DeletionRecord,
    ErrorResponse, FieldError, Health, LoginResponse, Logout, Role, UnprocessableBody, User,
    UserDeleted, UsersDeleted,
};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with every route and a `404` fallback.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes(&state))
        .merge(users::routes(&state))
        .merge(roles::routes(&state))
        .merge(monitors::routes(&state))
        .fallback(handler)
}
