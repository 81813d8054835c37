use axum::http::Request;
use gatehouse_core::IdentitySnapshot;

use super::AuthError;
use crate::utility::tracing_targets::TRACING_TARGET_AUDIT;

/// Redacted summary of the request that triggered a rejection.
///
/// Only the method, the path without query string and the request id are
/// kept; headers and bodies never reach the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditContext {
    pub method: String,
    pub path: String,
    pub request_id: Option<String>,
}

impl AuditContext {
    /// Captures the audit summary of a request.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Self {
            method: request.method().to_string(),
            path: request.uri().path().to_owned(),
            request_id,
        }
    }
}

/// Emits the audit entry for a rejected request.
pub fn audit_rejection(context: &AuditContext, error: &AuthError, user: Option<&IdentitySnapshot>) {
    tracing::error!(
        target: TRACING_TARGET_AUDIT,
        error = %error,
        method = %context.method,
        path = %context.path,
        request_id = context.request_id.as_deref(),
        user_id = user.map(|u| tracing::field::display(u.id)),
        user_login = user.map(|u| u.login.as_str()),
        "request rejected"
    );
}
