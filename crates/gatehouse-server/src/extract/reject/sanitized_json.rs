use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use super::Json;
use super::enhanced_json::sanitize_error_message;
use crate::handler::{Error, ErrorKind};
use crate::service::remove_forbidden_fields;

/// Validated JSON body with author and identifier fields stripped.
///
/// `_id`, `createdBy`, `createdDate`, `lastModifiedBy` and
/// `lastModifiedDate` are removed before deserialization, so clients can
/// never set them.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct SanitizedJson<T>(pub T);

impl<T> SanitizedJson<T> {
    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for SanitizedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = <Json<Value> as FromRequest<S>>::from_request(req, state).await?;

        let data: T = serde_json::from_value(remove_forbidden_fields(payload)).map_err(|e| {
            ErrorKind::BadRequest
                .with_message("Invalid request data format")
                .with_context(sanitize_error_message(&e.to_string()))
        })?;

        data.validate()?;
        Ok(Self(data))
    }
}
