//! Author stamping and payload sanitizing shared by the user and role services.

use gatehouse_core::IdentitySnapshot;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Fields a client may never set directly.
pub const FORBIDDEN_FIELDS: [&str; 5] = [
    "_id",
    "createdBy",
    "createdDate",
    "lastModifiedBy",
    "lastModifiedDate",
];

/// The authenticated user performing a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Identifier of the acting user.
    pub id: Uuid,
}

impl From<&IdentitySnapshot> for Actor {
    fn from(snapshot: &IdentitySnapshot) -> Self {
        Self { id: snapshot.id }
    }
}

/// Creation and modification stamps of a stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorship {
    pub created_by: Option<Uuid>,
    pub created_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<Timestamp>,
}

/// Records that carry [`Authorship`] stamps.
pub trait Authored {
    /// Returns the mutable authorship block.
    fn authorship_mut(&mut self) -> &mut Authorship;
}

/// Stamps author fields on `record`.
///
/// With an actor, a new record gets the creation stamps and an existing one
/// gets the modification stamps. Without an actor, a new record is stamped
/// with `createdBy = null` and the current date; an existing one is left
/// untouched.
pub fn update_author<T: Authored>(record: &mut T, actor: Option<&Actor>, is_new: bool) {
    update_author_at(record, actor, is_new, Timestamp::now());
}

/// Same as [`update_author`] with an explicit clock.
pub fn update_author_at<T: Authored>(
    record: &mut T,
    actor: Option<&Actor>,
    is_new: bool,
    now: Timestamp,
) {
    let authorship = record.authorship_mut();

    match (actor, is_new) {
        (Some(actor), true) => {
            authorship.created_by = Some(actor.id);
            authorship.created_date = Some(now);
        }
        (Some(actor), false) => {
            authorship.last_modified_by = Some(actor.id);
            authorship.last_modified_date = Some(now);
        }
        (None, true) => {
            authorship.created_by = None;
            authorship.created_date = Some(now);
        }
        (None, false) => {}
    }
}

/// Strips [`FORBIDDEN_FIELDS`] from a JSON object payload.
///
/// Non-object values are returned unchanged.
pub fn remove_forbidden_fields(mut payload: Value) -> Value {
    if let Value::Object(ref mut map) = payload {
        for field in FORBIDDEN_FIELDS {
            map.remove(field);
        }
    }

    payload
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Doc {
        authorship: Authorship,
    }

    impl Authored for Doc {
        fn authorship_mut(&mut self) -> &mut Authorship {
            &mut self.authorship
        }
    }

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(secs).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    #[test]
    fn actor_stamps_creation() {
        let actor = Actor { id: Uuid::now_v7() };
        let mut doc = Doc::default();

        update_author_at(&mut doc, Some(&actor), true, at(10));
        assert_eq!(doc.authorship.created_by, Some(actor.id));
        assert_eq!(doc.authorship.created_date, Some(at(10)));
        assert_eq!(doc.authorship.last_modified_by, None);
    }

    #[test]
    fn actor_stamps_modification_only() {
        let creator = Actor { id: Uuid::now_v7() };
        let modifier = Actor { id: Uuid::now_v7() };
        let mut doc = Doc::default();

        update_author_at(&mut doc, Some(&creator), true, at(10));
        update_author_at(&mut doc, Some(&modifier), false, at(20));

        assert_eq!(doc.authorship.created_by, Some(creator.id));
        assert_eq!(doc.authorship.created_date, Some(at(10)));
        assert_eq!(doc.authorship.last_modified_by, Some(modifier.id));
        assert_eq!(doc.authorship.last_modified_date, Some(at(20)));
    }

    #[test]
    fn no_actor_on_creation_stamps_defaults() {
        let mut doc = Doc::default();
        update_author_at(&mut doc, None, true, at(5));

        assert_eq!(doc.authorship.created_by, None);
        assert_eq!(doc.authorship.created_date, Some(at(5)));
    }

    #[test]
    fn no_actor_on_update_leaves_record_untouched() {
        let creator = Actor { id: Uuid::now_v7() };
        let mut doc = Doc::default();
        update_author_at(&mut doc, Some(&creator), true, at(10));
        let before = doc.authorship.clone();

        update_author_at(&mut doc, None, false, at(99));
        assert_eq!(doc.authorship, before);
    }

    #[test]
    fn forbidden_fields_are_stripped() {
        let payload = json!({
            "_id": "x",
            "login": "jdoe",
            "createdBy": "y",
            "createdDate": "z",
            "lastModifiedBy": "y",
            "lastModifiedDate": "z",
        });

        assert_eq!(remove_forbidden_fields(payload), json!({ "login": "jdoe" }));
        assert_eq!(remove_forbidden_fields(json!([1, 2])), json!([1, 2]));
    }
}
