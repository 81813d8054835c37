use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Entity, Guarded, Predicate, Store, Unique};
use crate::utility::tracing_targets::TRACING_TARGET_STORE;
use crate::{Error, Result};

/// In-memory [`Store`] backed by an ordered map.
///
/// Records are keyed by UUIDv7 identifiers, so iteration order follows
/// creation time. Cloning is cheap and shares the underlying map.
pub struct MemoryStore<T> {
    records: Arc<RwLock<BTreeMap<Uuid, T>>>,
}

impl<T: Entity> MemoryStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

/// Returns the field of the first rule matched by a record other than `id`.
fn first_conflict<T: Entity>(
    records: &BTreeMap<Uuid, T>,
    id: Uuid,
    unique: &[Unique<'_, T>],
) -> Option<&'static str> {
    let conflict = unique.iter().find(|rule| {
        records
            .values()
            .any(|record| record.id() != id && (rule.conflicts)(record))
    })?;

    tracing::debug!(
        target: TRACING_TARGET_STORE,
        entity = T::SERVICE.entity(),
        field = conflict.field,
        "uniqueness conflict"
    );

    Some(conflict.field)
}

fn insert_locked<T: Entity>(records: &mut BTreeMap<Uuid, T>, record: T) -> Result<T> {
    let id = record.id();

    if records.contains_key(&id) {
        return Err(Error::store(
            T::SERVICE.collection(),
            format!("{} {id} already exists", T::SERVICE.entity()),
        ));
    }

    records.insert(id, record.clone());
    tracing::debug!(
        target: TRACING_TARGET_STORE,
        collection = T::SERVICE.collection(),
        %id,
        "record inserted"
    );

    Ok(record)
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    async fn insert(&self, record: T) -> Result<T> {
        let mut records = self.records.write().await;
        insert_locked(&mut records, record)
    }

    async fn insert_unique(&self, record: T, unique: &[Unique<'_, T>]) -> Result<Guarded<T>> {
        let mut records = self.records.write().await;

        if let Some(field) = first_conflict(&records, record.id(), unique) {
            return Ok(Guarded::Conflict { field });
        }

        insert_locked(&mut records, record).map(Guarded::Stored)
    }

    async fn update_unique(
        &self,
        record: T,
        unique: &[Unique<'_, T>],
    ) -> Result<Option<Guarded<T>>> {
        let mut records = self.records.write().await;

        if !records.contains_key(&record.id()) {
            return Ok(None);
        }

        if let Some(field) = first_conflict(&records, record.id(), unique) {
            return Ok(Some(Guarded::Conflict { field }));
        }

        records.insert(record.id(), record.clone());
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            collection = T::SERVICE.collection(),
            id = %record.id(),
            "record updated"
        );

        Ok(Some(Guarded::Stored(record)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_one(&self, predicate: Predicate<'_, T>) -> Result<Option<T>> {
        let records = self.records.read().await;
        Ok(records.values().find(|record| predicate(record)).cloned())
    }

    async fn update(&self, record: T) -> Result<Option<T>> {
        let mut records = self.records.write().await;
        let Some(slot) = records.get_mut(&record.id()) else {
            return Ok(None);
        };

        *slot = record.clone();
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            collection = T::SERVICE.collection(),
            id = %record.id(),
            "record updated"
        );

        Ok(Some(record))
    }

    async fn remove(&self, id: Uuid) -> Result<Option<T>> {
        let removed = self.records.write().await.remove(&id);

        if removed.is_some() {
            tracing::debug!(
                target: TRACING_TARGET_STORE,
                collection = T::SERVICE.collection(),
                %id,
                "record removed"
            );
        }

        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
