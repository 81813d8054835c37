use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entity;
use crate::service::ServiceName;
use crate::service::records::{Authored, Authorship};

/// A stored role definition.
///
/// Built-in roles are seeded as system-locked records and cannot be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub role: String,
    pub value: String,
    pub lang_key: String,
    pub active: bool,
    pub system_locked: bool,
    #[serde(flatten)]
    pub authorship: Authorship,
}

impl RoleRecord {
    /// Creates an inactive, unlocked role.
    pub fn new(role: impl Into<String>, value: impl Into<String>, lang_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: role.into(),
            value: value.into(),
            lang_key: lang_key.into(),
            active: false,
            system_locked: false,
            authorship: Authorship::default(),
        }
    }
}

impl Entity for RoleRecord {
    const SERVICE: ServiceName = ServiceName::Roles;

    #[inline]
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Authored for RoleRecord {
    fn authorship_mut(&mut self) -> &mut Authorship {
        &mut self.authorship
    }
}
