//! Compile-time service registry.
//!
//! Every service name maps to exactly one entity type and store through
//! [`ServiceRegistry`]; there is no lookup by string at runtime.

use std::sync::Arc;

use strum::{AsRefStr, Display, EnumIter};

use crate::service::store::{MemoryStore, RoleRecord, Store, UserRecord};

/// Symbolic names of the data-owning services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ServiceName {
    Users,
    Roles,
}

impl ServiceName {
    /// Returns the collection name backing this service.
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Roles => "roles",
        }
    }

    /// Returns the entity name stored by this service.
    pub const fn entity(self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Roles => "role",
        }
    }
}

/// Store used by the user service.
pub type UserStore = Arc<dyn Store<UserRecord>>;

/// Store used by the role service.
pub type RoleStore = Arc<dyn Store<RoleRecord>>;

/// Resolved store for every [`ServiceName`].
#[derive(Clone)]
pub struct ServiceRegistry {
    pub users: UserStore,
    pub roles: RoleStore,
}

impl ServiceRegistry {
    /// Creates a registry from explicit stores.
    pub fn new(users: UserStore, roles: RoleStore) -> Self {
        Self { users, roles }
    }

    /// Creates a registry backed by empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::<UserRecord>::new()),
            Arc::new(MemoryStore::<RoleRecord>::new()),
        )
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::service::store::Entity;

    #[test]
    fn every_service_has_a_collection() {
        for name in ServiceName::iter() {
            assert!(!name.collection().is_empty());
            assert!(name.collection().starts_with(name.entity()));
        }
    }

    #[test]
    fn entities_point_at_their_service() {
        assert_eq!(UserRecord::SERVICE, ServiceName::Users);
        assert_eq!(RoleRecord::SERVICE, ServiceName::Roles);
        assert_eq!(ServiceName::Users.to_string(), "users");
    }
}
