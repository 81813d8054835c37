//! Registration, login and activation request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for self-registration.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    /// Unique login name.
    #[validate(length(min = 1, max = 64))]
    pub login: String,

    /// Unique email address.
    #[validate(email)]
    pub email: String,

    /// Given name.
    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    /// Family name.
    #[serde(default)]
    #[validate(length(max = 128))]
    pub last_name: String,

    /// Plain-text password, hashed before storage.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,

    /// Preferred language key.
    #[validate(length(min = 2, max = 5))]
    pub lang_key: Option<String>,
}

/// Request payload for login.
///
/// `login` holds either the login name or, when it contains `@`, the email.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    #[validate(length(min = 1))]
    pub login: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Request payload for account activation.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Activate {
    /// Token handed out at registration.
    #[validate(length(min = 1))]
    pub verification_token: String,
}
