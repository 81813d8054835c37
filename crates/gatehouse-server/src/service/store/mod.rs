//! Credential store contracts and the in-memory implementation.
//!
//! Handlers only see the [`Store`] trait through [`ServiceRegistry`]. The
//! authentication pipeline never touches a store: snapshots embedded in
//! tokens are trusted as-is.
//!
//! [`ServiceRegistry`]: crate::service::ServiceRegistry

mod memory;
mod role;
mod user;

use async_trait::async_trait;
use uuid::Uuid;

pub use self::memory::MemoryStore;
pub use self::role::RoleRecord;
pub use self::user::UserRecord;
use crate::Result;
use crate::service::ServiceName;

/// A record persisted in a [`Store`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Service that owns this entity.
    const SERVICE: ServiceName;

    /// Returns the record identifier.
    fn id(&self) -> Uuid;
}

/// Predicate used by [`Store::find_one`].
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// A uniqueness rule checked atomically with a write.
///
/// `conflicts` is evaluated against every stored record except the one
/// being written.
pub struct Unique<'a, T> {
    /// Field reported when the rule is violated.
    pub field: &'static str,
    pub conflicts: Predicate<'a, T>,
}

impl<'a, T> Unique<'a, T> {
    pub fn new(field: &'static str, conflicts: Predicate<'a, T>) -> Self {
        Self { field, conflicts }
    }
}

/// Result of a write guarded by [`Unique`] rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    /// The record was written.
    Stored(T),
    /// The first violated rule; nothing was written.
    Conflict { field: &'static str },
}

/// Persistence contract for a single entity collection.
#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    /// Inserts a new record. Fails if the identifier is already taken.
    async fn insert(&self, record: T) -> Result<T>;

    /// Inserts a new record unless a rule in `unique` is violated.
    ///
    /// Rules are checked in order, under the same lock as the insert.
    async fn insert_unique(&self, record: T, unique: &[Unique<'_, T>]) -> Result<Guarded<T>>;

    /// Replaces an existing record unless a rule in `unique` is violated.
    /// Returns `None` if it does not exist.
    async fn update_unique(
        &self,
        record: T,
        unique: &[Unique<'_, T>],
    ) -> Result<Option<Guarded<T>>>;

    /// Looks a record up by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>>;

    /// Returns the first record matching `predicate`.
    async fn find_one(&self, predicate: Predicate<'_, T>) -> Result<Option<T>>;

    /// Replaces an existing record. Returns `None` if it does not exist.
    async fn update(&self, record: T) -> Result<Option<T>>;

    /// Removes a record and returns it.
    async fn remove(&self, id: Uuid) -> Result<Option<T>>;

    /// Returns every record in creation order.
    async fn list(&self) -> Result<Vec<T>>;

    /// Returns the number of stored records.
    async fn count(&self) -> Result<usize>;
}
