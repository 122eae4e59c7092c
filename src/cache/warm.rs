//! Warm tier storage.
//!
//! The warm tier sits behind [`WarmStore`] so the in-process
//! [`MemoryWarmStore`] can be replaced by a shared networked cache without
//! touching the router or orchestrator. Implementations only store and
//! return entries; freshness checks and promotion live in
//! [`TieredCache`](super::TieredCache).

use async_trait::async_trait;
use moka::future::Cache;

use super::{CacheEntry, CacheKey};
use crate::Result;

/// Storage backend for the warm tier.
///
/// Errors are reported as [`SwitchyardError::CacheDegraded`](crate::SwitchyardError::CacheDegraded)
/// and swallowed by the tiered cache.
#[async_trait]
pub trait WarmStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch an entry, fresh or not.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>>;

    /// Insert (or overwrite) an entry.
    async fn insert(&self, key: CacheKey, entry: CacheEntry) -> Result<()>;

    /// Remove an entry if present.
    async fn remove(&self, key: &CacheKey) -> Result<()>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;
}

/// In-process warm tier backed by moka's async cache.
///
/// Bounded by entry count only; expiry is judged by the tiered cache from
/// each entry's `written_at`.
pub struct MemoryWarmStore {
    entries: Cache<CacheKey, CacheEntry>,
}

impl MemoryWarmStore {
    /// Create a store holding at most `max_entries` entries.
    pub fn new(max_entries: u64) -> Self {
        Self {
            entries: Cache::new(max_entries),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl WarmStore for MemoryWarmStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        Ok(self.entries.get(key).await)
    }

    async fn insert(&self, key: CacheKey, entry: CacheEntry) -> Result<()> {
        self.entries.insert(key, entry).await;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.invalidate_all();
        Ok(())
    }
}
