//! Keyed read-through cache with per-entry expiration, backed by [`moka`].
//!
//! Each entry carries its own deadline so callers can cap a lifetime below
//! the cache default (for example at a token's own expiration). Moka enforces
//! the capacity bound and evicts on the wall clock; lookups additionally take
//! the current time as a parameter so expiry stays deterministic under test.

use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};

use jiff::{SignedDuration, Timestamp};
use moka::Expiry;
use moka::future::Cache;

use crate::TRACING_TARGET_CACHE;

/// Default capacity of a cache, in entries.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Timestamp,
    lifetime: Duration,
}

impl<V> CacheEntry<V> {
    #[inline]
    fn is_live_at(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// Hands each entry's own lifetime to moka, on insert and on overwrite.
struct EntryExpiry;

impl<K, V> Expiry<K, CacheEntry<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &K,
        entry: &CacheEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.lifetime)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        entry: &CacheEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.lifetime)
    }
}

/// A bounded keyed cache whose entries expire after a TTL.
///
/// Clones share the same entries. Only successful computations are stored by
/// [`get_or_try_insert_with`]; errors pass through untouched.
///
/// [`get_or_try_insert_with`]: TtlCache::get_or_try_insert_with
pub struct TtlCache<K, V> {
    name: &'static str,
    inner: Cache<K, CacheEntry<V>>,
    ttl: SignedDuration,
    max_entries: u64,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache holding up to [`DEFAULT_MAX_ENTRIES`] entries that
    /// live for `ttl` unless capped earlier.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self::with_capacity(name, ttl, DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache holding at most `max_entries` entries.
    pub fn with_capacity(name: &'static str, ttl: Duration, max_entries: u64) -> Self {
        let ttl = SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX);
        let inner = Cache::builder()
            .name(name)
            .max_capacity(max_entries)
            .expire_after(EntryExpiry)
            .build();

        tracing::info!(
            target: TRACING_TARGET_CACHE,
            cache = name,
            ttl_secs = ttl.as_secs(),
            max_entries,
            "cache initialized"
        );

        Self {
            name,
            inner,
            ttl,
            max_entries,
        }
    }

    /// Returns the default entry lifetime.
    #[inline]
    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    /// Returns the configured capacity.
    #[inline]
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Returns a live entry for `key`.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Timestamp::now()).await
    }

    /// Returns the entry for `key` if it is still live at `now`.
    ///
    /// An entry past its deadline is invalidated.
    pub async fn get_at(&self, key: &K, now: Timestamp) -> Option<V> {
        let entry = self.inner.get(key).await?;
        if entry.is_live_at(now) {
            return Some(entry.value);
        }

        self.inner.invalidate(key).await;
        tracing::trace!(target: TRACING_TARGET_CACHE, cache = self.name, "expired entry evicted");
        None
    }

    /// Stores `value` with the default TTL, measured from `now`.
    pub async fn insert_at(&self, key: K, value: V, now: Timestamp) {
        let expires_at = now.checked_add(self.ttl).unwrap_or(Timestamp::MAX);
        self.insert_until(key, value, now, expires_at).await;
    }

    /// Stores `value` until the earlier of `expires_at` and `now + ttl`.
    ///
    /// Nothing is stored when that deadline is not after `now`.
    pub async fn insert_until(&self, key: K, value: V, now: Timestamp, expires_at: Timestamp) {
        let default_expiry = now.checked_add(self.ttl).unwrap_or(Timestamp::MAX);
        let expires_at = expires_at.min(default_expiry);

        let Ok(lifetime) = Duration::try_from(expires_at.duration_since(now)) else {
            return;
        };
        if lifetime.is_zero() {
            return;
        }

        let entry = CacheEntry {
            value,
            expires_at,
            lifetime,
        };
        self.inner.insert(key, entry).await;
    }

    /// Returns the cached value for `key` or computes and stores it.
    ///
    /// `compute` returns the value together with the instant after which it
    /// must no longer be served. The stored lifetime is the earlier of that
    /// instant and `now + ttl`. Errors are returned without being cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        now: Timestamp,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(V, Timestamp), E>>,
    {
        if let Some(value) = self.get_at(&key, now).await {
            tracing::trace!(target: TRACING_TARGET_CACHE, cache = self.name, "cache hit");
            return Ok(value);
        }

        let (value, valid_until) = compute().await?;
        self.insert_until(key, value.clone(), now, valid_until).await;
        Ok(value)
    }

    /// Removes the entry for `key`.
    pub async fn invalidate(&self, key: &K) {
        self.inner.invalidate(key).await;

        tracing::debug!(target: TRACING_TARGET_CACHE, cache = self.name, "entry invalidated");
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Returns the number of stored entries after applying pending evictions.
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: self.inner.clone(),
            ttl: self.ttl,
            max_entries: self.max_entries,
        }
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}
