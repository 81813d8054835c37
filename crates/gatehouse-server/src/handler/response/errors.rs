use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use validator::ValidationErrors;

/// A single field-level error entry carried in the `data` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field path the message refers to, e.g. `user.login`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates an entry for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates an entry without a field.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Returns the last `.`-separated segment of the field path.
    pub fn field_name(&self) -> Option<&str> {
        self.field
            .as_deref()
            .map(|field| field.rsplit('.').next().unwrap_or(field))
    }
}

/// Body of an unprocessable-entity (422) response.
#[derive(Debug, Clone, Serialize)]
pub struct UnprocessableBody {
    /// Messages keyed by the last segment of the field path.
    pub errors: BTreeMap<String, String>,
}

/// HTTP error response representation.
///
/// Serializes as `{ name, message, code, type, data }`. Responses with status
/// 422 serialize as [`UnprocessableBody`] instead.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// The error class name.
    pub name: Cow<'a, str>,
    /// Message safe for client display.
    pub message: Cow<'a, str>,
    /// Numeric HTTP status.
    pub code: u16,
    /// Machine-readable error type.
    #[serde(rename = "type")]
    pub error_type: Cow<'a, str>,
    /// Field-level details.
    pub data: Option<Vec<FieldError>>,

    /// Internal context for debugging (not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "BadRequestError",
        "Invalid request body",
        "INVALID_BODY",
        StatusCode::BAD_REQUEST,
    );
    pub const FORBIDDEN: Self = Self::new(
        "ForbiddenError",
        "Forbidden",
        "FORBIDDEN",
        StatusCode::FORBIDDEN,
    );
    // 5xx Server Errors
    pub const GATEWAY_TIMEOUT: Self = Self::new(
        "GatewayTimeoutError",
        "Request timed out",
        "REQUEST_TIMEOUT",
        StatusCode::GATEWAY_TIMEOUT,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "InternalServerError",
        "Internal server error",
        "INTERNAL_ERROR",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    // Authentication Errors
    pub const INVALID_TOKEN: Self = Self::new(
        "UnAuthorizedError",
        "Unauthorized",
        "INVALID_TOKEN",
        StatusCode::UNAUTHORIZED,
    );
    pub const NOT_FOUND: Self = Self::new(
        "NotFoundError",
        "Not found",
        "NOT_FOUND",
        StatusCode::NOT_FOUND,
    );
    pub const NO_TOKEN: Self = Self::new(
        "UnAuthorizedError",
        "Unauthorized",
        "NO_TOKEN",
        StatusCode::UNAUTHORIZED,
    );
    pub const UNPROCESSABLE_ENTITY: Self = Self::new(
        "ValidationError",
        "Parameters validation error!",
        "VALIDATION_ERROR",
        StatusCode::UNPROCESSABLE_ENTITY,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(
        name: &'a str,
        message: &'a str,
        error_type: &'a str,
        status: StatusCode,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            code: status.as_u16(),
            error_type: Cow::Borrowed(error_type),
            data: None,
            context: None,
            status,
        }
    }

    /// Replaces the error class name.
    pub fn with_name(mut self, name: impl Into<Cow<'a, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Replaces the error type.
    pub fn with_type(mut self, error_type: impl Into<Cow<'a, str>>) -> Self {
        self.error_type = error_type.into();
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }

    /// Appends field-level details.
    pub fn with_data(mut self, entries: impl IntoIterator<Item = FieldError>) -> Self {
        self.data.get_or_insert_with(Vec::new).extend(entries);
        self
    }

    /// Creates an error response from validator ValidationErrors.
    pub fn from_validation_errors(validation_errors: ValidationErrors) -> Self {
        let mut entries = Vec::new();

        for (field, field_errors) in validation_errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The '{}' field is invalid ({})", field, error.code));
                entries.push(FieldError::new(field.to_string(), message));
            }
        }

        Self::UNPROCESSABLE_ENTITY.with_data(entries)
    }

    /// Returns the 422 body: messages keyed by the last field segment.
    ///
    /// Entries without a field fall back to the `message` key.
    pub fn unprocessable_body(&self) -> UnprocessableBody {
        let mut errors = BTreeMap::new();

        for entry in self.data.iter().flatten() {
            let key = entry.field_name().unwrap_or("message");
            errors.insert(key.to_owned(), entry.message.clone());
        }

        if errors.is_empty() {
            errors.insert("message".to_owned(), self.message.to_string());
        }

        UnprocessableBody { errors }
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl From<ValidationErrors> for ErrorResponse<'_> {
    fn from(errors: ValidationErrors) -> Self {
        Self::from_validation_errors(errors)
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            status = %self.status,
            name = %self.name,
            message = %self.message,
            error_type = %self.error_type,
            context = ?self.context,
            "HTTP error response"
        );

        if self.status == StatusCode::UNPROCESSABLE_ENTITY {
            return (self.status, Json(self.unprocessable_body())).into_response();
        }

        (self.status, Json(self)).into_response()
    }
}
