//! Service error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::utility::tracing_targets::TRACING_TARGET_RECOVERY_ERROR;

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        tracing::error!(
            target: TRACING_TARGET_RECOVERY_ERROR,
            error = %error,
            error_kind = %error.kind(),
            "Service operation failed"
        );

        ErrorKind::InternalServerError.with_context(error.to_string())
    }
}
