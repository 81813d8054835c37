//! Shared in-process caches.

mod ttl_cache;

pub use ttl_cache::{DEFAULT_MAX_ENTRIES, TtlCache};
