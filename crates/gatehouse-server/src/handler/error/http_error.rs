//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::{ErrorResponse, FieldError};

/// The error type for HTTP handlers in the server.
///
/// Carries an [`ErrorKind`] that selects the status code and default body,
/// plus optional overrides applied when the error is rendered.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    name: Option<Cow<'a, str>>,
    error_type: Option<Cow<'a, str>>,
    fields: Vec<FieldError>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            name: None,
            error_type: None,
            fields: Vec::new(),
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches context information to the error.
    ///
    /// Context is logged when the error is rendered but never sent to the
    /// client.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Sets a custom user-facing message for the error.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Overrides the error class name.
    #[inline]
    pub fn with_name(self, name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// Overrides the machine-readable error type.
    #[inline]
    pub fn with_type(self, error_type: impl Into<Cow<'a, str>>) -> Self {
        Self {
            error_type: Some(error_type.into()),
            ..self
        }
    }

    /// Adds a field-level message.
    #[inline]
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields.push(FieldError::new(field, message));
        self
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the custom error type if present.
    #[inline]
    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    /// Returns the field-level messages.
    #[inline]
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// Returns the HTTP status code of this error.
    #[inline]
    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    /// Converts this error into a static version by cloning all borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            name: self.name.map(|n| Cow::Owned(n.into_owned())),
            error_type: self.error_type.map(|t| Cow::Owned(t.into_owned())),
            fields: self.fields,
        }
    }

    /// Renders the error into its response body.
    pub fn into_error_response(self) -> ErrorResponse<'a> {
        let mut response = self.kind.response();

        if let Some(name) = self.name {
            response = response.with_name(name);
        }

        if let Some(message) = self.message {
            response = response.with_message(message);
        }

        if let Some(error_type) = self.error_type {
            response = response.with_type(error_type);
        }

        if let Some(context) = self.context {
            response = response.with_context(context);
        }

        if !self.fields.is_empty() {
            response = response.with_data(self.fields);
        }

        response
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &response.name)
            .field("status", &response.status);

        if let Some(ref message) = self.message {
            debug_struct.field("message", message);
        }

        if let Some(ref error_type) = self.error_type {
            debug_struct.field("type", error_type);
        }

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if !self.fields.is_empty() {
            debug_struct.field("fields", &self.fields);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let name = self.name.as_deref().unwrap_or(&response.name);
        let message = self.message.as_deref().unwrap_or(&response.message);

        write!(f, "{} ({}): {}", name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        self.into_error_response().into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Enumeration of all HTTP error kinds the server produces.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - Malformed request body or path
    BadRequest,
    /// 401 Unauthorized - No credential was presented
    NoToken,
    /// 401 Unauthorized - Credential was presented but rejected
    InvalidToken,
    /// 403 Forbidden - Access denied
    Forbidden,
    /// 404 Not Found - Resource not found
    NotFound,
    /// 422 Unprocessable Entity - Validation failure
    Unprocessable,

    // 5xx Server Errors
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
    /// 504 Gateway Timeout - Request processing timed out
    GatewayTimeout,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] with a single field-level message.
    #[inline]
    pub fn with_field(self, field: impl Into<String>, message: impl Into<String>) -> Error<'static> {
        Error::new(self).with_field(field, message)
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the default response for this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::NoToken => ErrorResponse::NO_TOKEN,
            Self::InvalidToken => ErrorResponse::INVALID_TOKEN,
            Self::Forbidden => ErrorResponse::FORBIDDEN,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::Unprocessable => ErrorResponse::UNPROCESSABLE_ENTITY,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::GatewayTimeout => ErrorResponse::GATEWAY_TIMEOUT,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        let _ = error.into_response();
    }

    #[test]
    fn error_with_context_is_not_rendered() -> anyhow::Result<()> {
        let error = ErrorKind::BadRequest.with_context("missing body");
        assert_eq!(error.context(), Some("missing body"));

        let json = serde_json::to_value(error.into_error_response())?;
        assert!(!json.to_string().contains("missing body"));
        Ok(())
    }

    #[test]
    fn error_builder_chaining() {
        let error = ErrorKind::NotFound
            .with_message("user.notfound")
            .with_name("ClientError")
            .with_type("")
            .with_context("id: 123");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("user.notfound"));
        assert_eq!(error.error_type(), Some(""));
        assert_eq!(error.context(), Some("id: 123"));
    }

    #[test]
    fn overrides_reach_the_body() -> anyhow::Result<()> {
        let response = ErrorKind::NotFound
            .with_message("role.notfound")
            .with_name("ClientError")
            .with_type("")
            .into_error_response();

        let json = serde_json::to_value(&response)?;
        assert_eq!(json["name"], "ClientError");
        assert_eq!(json["message"], "role.notfound");
        assert_eq!(json["code"], 404);
        assert_eq!(json["type"], "");
        Ok(())
    }

    #[test]
    fn fields_become_unprocessable_entries() {
        let response = ErrorKind::Unprocessable
            .with_field("login", "login/password incorrect")
            .with_field("password", "login/password incorrect")
            .into_error_response();

        let body = response.unprocessable_body();
        assert_eq!(body.errors.len(), 2);
        assert!(body.errors.contains_key("login"));
        assert!(body.errors.contains_key("password"));
    }

    #[test]
    fn std_fmt_display() {
        let error = ErrorKind::InvalidToken
            .with_message("Token expired")
            .with_context("exp in the past");

        let display = format!("{}", error);
        assert!(display.contains("UnAuthorizedError"));
        assert!(display.contains("401"));
        assert!(display.contains("Token expired"));
        assert!(display.contains("exp in the past"));
    }

    #[test]
    fn error_into_static() {
        let error = ErrorKind::NotFound
            .with_message("Test message".to_string())
            .with_context("Test context".to_string());

        let static_error = error.into_static();
        assert_eq!(static_error.message(), Some("Test message"));
        assert_eq!(static_error.context(), Some("Test context"));
    }

    #[test]
    fn all_error_kinds_have_responses() {
        let kinds = [
            ErrorKind::BadRequest,
            ErrorKind::NoToken,
            ErrorKind::InvalidToken,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Unprocessable,
            ErrorKind::InternalServerError,
            ErrorKind::GatewayTimeout,
        ];

        for kind in kinds {
            let response = kind.response();
            assert!(!response.name.is_empty());
            assert!(response.status.as_u16() >= 400);
            let _ = kind.into_response();
        }
    }
}
