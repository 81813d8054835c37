use std::collections::BTreeSet;

use gatehouse_core::{IdentitySnapshot, UserRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entity;
use crate::service::ServiceName;
use crate::service::records::{Authored, Authorship};

/// A stored user account.
///
/// `password` holds the Argon2 PHC hash, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub lang_key: String,
    pub password: String,
    pub roles: BTreeSet<UserRole>,
    pub active: bool,
    pub verification_token: Option<String>,
    #[serde(flatten)]
    pub authorship: Authorship,
}

impl UserRecord {
    /// Returns the identity snapshot embedded in issued tokens.
    pub fn snapshot(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            id: self.id,
            login: self.login.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            lang_key: self.lang_key.clone(),
            roles: self.roles.clone(),
            active: self.active,
        }
    }

    /// Returns `true` if `login` or `email` matches this record.
    ///
    /// Values containing `@` are compared against the email.
    pub fn matches_credential(&self, credential: &str) -> bool {
        if credential.contains('@') {
            self.email == credential
        } else {
            self.login == credential
        }
    }
}

impl Entity for UserRecord {
    const SERVICE: ServiceName = ServiceName::Users;

    #[inline]
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Authored for UserRecord {
    fn authorship_mut(&mut self) -> &mut Authorship {
        &mut self.authorship
    }
}
