//! User management request types.

use std::collections::BTreeSet;

use gatehouse_core::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for creating a user on behalf of a superadmin.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, max = 64))]
    pub login: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 128))]
    pub last_name: String,

    #[validate(length(min = 1, max = 1000))]
    pub password: String,

    #[validate(length(min = 2, max = 5))]
    pub lang_key: Option<String>,

    /// Granted roles. Falls back to the configured defaults.
    pub roles: Option<BTreeSet<UserRole>>,

    /// Overrides the configured registration-token requirement.
    pub require_reg_token: Option<bool>,
}

/// Request payload for a partial user update.
///
/// Absent fields keep their stored value.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 64))]
    pub login: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub first_name: Option<String>,

    #[validate(length(max = 128))]
    pub last_name: Option<String>,

    /// New plain-text password; rehashed before storage.
    #[validate(length(min = 1, max = 1000))]
    pub password: Option<String>,

    #[validate(length(min = 2, max = 5))]
    pub lang_key: Option<String>,

    pub roles: Option<BTreeSet<UserRole>>,

    pub active: Option<bool>,
}

/// Request payload for bulk deletion.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoveManyUsers {
    #[serde(rename = "userIDs", default)]
    pub user_ids: Vec<Uuid>,
}
