//! User response types.

use std::collections::BTreeSet;

use gatehouse_core::{IdentitySnapshot, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::{Authorship, UserRecord};

/// Outward view of a user record.
///
/// The password hash is never part of a response. The verification token
/// is only present right after registration or creation.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub lang_key: String,
    pub roles: BTreeSet<UserRole>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
    #[serde(flatten)]
    pub authorship: Authorship,
}

impl User {
    /// Builds the response for a freshly created record, keeping its
    /// verification token.
    pub fn with_verification_token(record: UserRecord) -> Self {
        let verification_token = record.verification_token.clone();
        Self {
            verification_token,
            ..Self::from(record)
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            login: record.login,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            lang_key: record.lang_key,
            roles: record.roles,
            active: record.active,
            verification_token: None,
            authorship: record.authorship,
        }
    }
}

/// Response returned by logout.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logout {
    pub logout: bool,
    /// Identity carried by the token that was presented.
    pub user: IdentitySnapshot,
}

/// Response returned after deleting a single user.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeleted {
    pub records_deleted: usize,
    pub record: User,
}

/// Response returned by bulk deletion.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersDeleted {
    pub records_deleted: DeletedRecords,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_errors: Option<DeletionErrors>,
}

impl UsersDeleted {
    /// Records a successful deletion.
    pub fn push_deleted(&mut self, user: User) {
        self.records_deleted.deletion_count += 1;
        self.records_deleted.deleted_records.push(user);
    }

    /// Records a failed deletion.
    pub fn push_error(&mut self, error: DeletionError) {
        let errors = self.deletion_errors.get_or_insert_with(DeletionErrors::default);
        errors.error_count += 1;
        errors.records.push(error);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedRecords {
    pub deletion_count: usize,
    pub deleted_records: Vec<User>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionErrors {
    pub error_count: usize,
    pub records: Vec<DeletionError>,
}

/// One id that could not be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionError {
    pub error: DeletionErrorDetail,
    pub record: DeletionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionErrorDetail {
    pub message: String,
    pub code: u16,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// The record a deletion error refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeletionRecord {
    User(Box<User>),
    Missing { id: Uuid },
}
