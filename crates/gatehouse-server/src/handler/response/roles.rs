//! Role response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::{Authorship, RoleRecord};

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
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

impl From<RoleRecord> for Role {
    fn from(record: RoleRecord) -> Self {
        Self {
            id: record.id,
            role: record.role,
            value: record.value,
            lang_key: record.lang_key,
            active: record.active,
            system_locked: record.system_locked,
            authorship: record.authorship,
        }
    }
}
