//! Per-operation access guards.
//!
//! Every guarded operation runs the [`Authenticator`] and then the
//! [`Authorizer`]. Route-level roles are attached to request extensions by
//! [`RouterRolesExt::with_route_roles`] and joined with the operation's own
//! roles. On success the caller's [`IdentitySnapshot`] is inserted into
//! request extensions for [`AuthState`].
//!
//! [`Authenticator`]: crate::service::Authenticator
//! [`Authorizer`]: crate::service::Authorizer
//! [`IdentitySnapshot`]: gatehouse_core::IdentitySnapshot
//! [`AuthState`]: crate::extract::AuthState

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;
use axum::{Extension, Router};

use crate::handler::{Error, Result};
use crate::service::{
    AuditContext, OperationAccess, RoleRequirement, RouteRoles, ServiceState, audit_rejection,
};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// State of a single operation guard.
#[derive(Clone)]
pub struct GuardState {
    pub service: ServiceState,
    pub operation: Arc<OperationAccess>,
}

impl GuardState {
    /// Creates the guard state for one operation.
    pub fn new(service: ServiceState, operation: OperationAccess) -> Self {
        Self {
            service,
            operation: Arc::new(operation),
        }
    }
}

/// Authenticates and authorizes a request against its operation's access rules.
///
/// Operations declared with `auth == false` skip both checks.
pub async fn require_access(
    State(guard): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    if !guard.operation.auth {
        return Ok(next.run(request).await);
    }

    let route_roles = request
        .extensions()
        .get::<RouteRoles>()
        .cloned()
        .unwrap_or_default();

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let authenticated = guard
        .service
        .authenticator
        .authenticate(header.as_deref())
        .await;

    let identity = match authenticated {
        Ok(identity) => identity,
        Err(error) => {
            audit_rejection(&AuditContext::from_request(&request), &error, None);
            return Err(Error::from(error));
        }
    };

    if let Err(error) = guard
        .service
        .authorizer
        .authorize(Some(&identity), &guard.operation, &route_roles)
        .await
    {
        audit_rejection(&AuditContext::from_request(&request), &error, Some(&identity));
        return Err(Error::from(error));
    }

    tracing::trace!(
        target: TRACING_TARGET_AUTHENTICATION,
        user_id = %identity.id,
        "request authorized"
    );

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extension trait for `axum::routing::`[`MethodRouter`] to declare
/// operation access rules.
pub trait MethodRouterAccessExt {
    /// Guards the operation with the given access rules.
    fn with_access(self, state: &ServiceState, access: OperationAccess) -> Self;
}

impl<S> MethodRouterAccessExt for MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_access(self, state: &ServiceState, access: OperationAccess) -> Self {
        let guard = GuardState::new(state.clone(), access);
        self.route_layer(from_fn_with_state(guard, require_access))
    }
}

/// Extension trait for `axum::`[`Router`] to declare route-level roles.
pub trait RouterRolesExt {
    /// Requires one of `roles` on every guarded operation of this router,
    /// in addition to each operation's own roles.
    fn with_route_roles(self, roles: RoleRequirement) -> Self;
}

impl<S> RouterRolesExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_route_roles(self, roles: RoleRequirement) -> Self {
        self.layer(Extension(RouteRoles(roles)))
    }
}
