use axum::response::{IntoResponse, Response};
use tower::timeout::error::Elapsed;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_RECOVERY_ERROR;

/// Transforms any known [`tower::BoxError`] into a custom [`Error`] response.
pub async fn handle_error(err: tower::BoxError) -> Response {
    let error = if err.is::<Elapsed>() {
        tracing::error!(
            target: TRACING_TARGET_RECOVERY_ERROR,
            error = %err,
            "Request timeout exceeded"
        );

        Error::new(ErrorKind::GatewayTimeout)
            .with_context("The request took too long to process and was terminated")
    } else {
        tracing::error!(
            target: TRACING_TARGET_RECOVERY_ERROR,
            error = %err,
            "Unknown middleware error"
        );

        Error::new(ErrorKind::InternalServerError).with_context(err.to_string())
    };

    error.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn timeouts_become_gateway_timeout() {
        let response = handle_error(Box::new(Elapsed::new())).await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn unknown_errors_become_internal() {
        let err: tower::BoxError = "boom".into();
        let response = handle_error(err).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
