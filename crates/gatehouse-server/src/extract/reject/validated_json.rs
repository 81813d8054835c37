//! JSON extractor with `validator` checks.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor that validates the body after deserialization.
///
/// Validation failures become 422 responses keyed by field name.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

/// Formats a single validation failure.
fn format_validation_error(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "email" => format!("The '{field}' field must be a valid email"),
        "length" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => {
                format!("The '{field}' field length must be between {min} and {max}")
            }
            (Some(min), None) => format!("The '{field}' field length must be at least {min}"),
            (None, Some(max)) => format!("The '{field}' field length must be at most {max}"),
            (None, None) => format!("The '{field}' field has an invalid length"),
        },
        "required" => format!("The '{field}' field is required"),
        code => format!("The '{field}' field is invalid ({code})"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        tracing::warn!(
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| (field.to_string(), format_validation_error(&field, error)))
            })
            .fold(ErrorKind::Unprocessable.into_error(), |acc, (field, message)| {
                acc.with_field(field, message)
            })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(email)]
        email: String,
        #[validate(length(min = 2, max = 5))]
        lang: String,
    }

    #[test]
    fn validation_errors_become_fields() {
        let payload = Payload {
            email: "not-an-email".to_owned(),
            lang: "x".to_owned(),
        };

        let Err(errors) = payload.validate() else {
            panic!("payload should be invalid");
        };
        let error = Error::from(errors);

        assert_eq!(error.kind(), ErrorKind::Unprocessable);
        let body = error.into_error_response().unprocessable_body();
        assert!(body.errors.contains_key("email"));
        assert!(body.errors.contains_key("lang"));
    }
}
