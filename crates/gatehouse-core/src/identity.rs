//! Identity snapshot embedded in issued tokens.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Built-in role identifiers.
///
/// Deserialization rejects any value outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    /// Full access, including user management.
    SuperAdmin,
    /// Role management.
    Admin,
    /// Default role for self-registered accounts.
    User,
}

/// User attributes frozen into a token at issuance time.
///
/// A snapshot is trusted as-is on every request. Changes to the stored user
/// record are only visible after a new token is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySnapshot {
    /// Unique user identifier.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Login name.
    pub login: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Preferred language key.
    pub lang_key: String,
    /// Granted roles.
    pub roles: BTreeSet<UserRole>,
    /// Whether the account was active when the token was issued.
    pub active: bool,
}

impl IdentitySnapshot {
    /// Returns `true` if the snapshot holds at least one of `roles`.
    pub fn has_any_role<'a>(&self, roles: impl IntoIterator<Item = &'a UserRole>) -> bool {
        roles.into_iter().any(|role| self.roles.contains(role))
    }

    /// Returns `true` if the snapshot holds the given role.
    #[inline]
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn snapshot(roles: &[UserRole]) -> IdentitySnapshot {
        IdentitySnapshot {
            id: Uuid::now_v7(),
            login: "jdoe".to_owned(),
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            email: "jdoe@example.com".to_owned(),
            lang_key: "en-us".to_owned(),
            roles: roles.iter().copied().collect(),
            active: true,
        }
    }

    #[test]
    fn role_names_are_lowercase() {
        assert_eq!(UserRole::SuperAdmin.as_ref(), "superadmin");
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert!(UserRole::from_str("Admin").is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_str::<UserRole>("\"owner\"");
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_uses_wire_field_names() -> anyhow::Result<()> {
        let value = serde_json::to_value(snapshot(&[UserRole::User]))?;
        assert!(value.get("_id").is_some());
        assert!(value.get("firstName").is_some());
        assert!(value.get("langKey").is_some());
        assert_eq!(value["roles"], serde_json::json!(["user"]));
        Ok(())
    }

    #[test]
    fn role_order_is_irrelevant() -> anyhow::Result<()> {
        let mut value = serde_json::to_value(snapshot(&[UserRole::User]))?;
        value["roles"] = serde_json::json!(["user", "admin"]);
        let first: IdentitySnapshot = serde_json::from_value(value.clone())?;
        value["roles"] = serde_json::json!(["admin", "user", "admin"]);
        let second: IdentitySnapshot = serde_json::from_value(value)?;
        assert_eq!(first.roles, second.roles);
        Ok(())
    }

    #[test]
    fn has_any_role_checks_intersection() {
        let identity = snapshot(&[UserRole::User]);
        assert!(identity.has_any_role(&[UserRole::Admin, UserRole::User]));
        assert!(!identity.has_any_role(&[UserRole::Admin]));
        assert!(!identity.has_any_role(&[]));
        assert!(identity.has_role(UserRole::User));
    }
}
