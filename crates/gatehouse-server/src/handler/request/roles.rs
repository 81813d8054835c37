//! Role management request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for role creation.
///
/// New roles always start inactive; an `active` flag in the body is ignored.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRole {
    /// Display name, unique across roles.
    #[validate(length(min = 1, max = 64))]
    pub role: String,

    /// Role identifier, unique across roles.
    #[validate(length(min = 1, max = 64))]
    pub value: String,

    #[validate(length(min = 2, max = 5))]
    pub lang_key: Option<String>,

    #[serde(default)]
    pub system_locked: bool,
}

/// Request payload for a partial role update.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 64))]
    pub role: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub value: Option<String>,

    #[validate(length(min = 2, max = 5))]
    pub lang_key: Option<String>,

    pub active: Option<bool>,

    pub system_locked: Option<bool>,
}

/// Request payload for toggling a role.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivateRole {
    pub active: bool,
}
