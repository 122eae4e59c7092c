//! Two-tier response cache.
//!
//! [`TieredCache`] keeps complete generated answers keyed on
//! [`CacheKey`] (model id + normalised prompt):
//!
//! - **hot tier**: moka in-memory cache, consulted first. Writes land here
//!   synchronously.
//! - **warm tier**: any [`WarmStore`]; [`MemoryWarmStore`] by default.
//!   Writes reach it from a detached task after `propagation_delay`; hits
//!   are promoted back into the hot tier.
//!
//! Both tiers share one TTL, judged from each entry's `written_at`. An entry
//! older than the TTL is never returned and is evicted from whichever tier
//! it was found in.
//!
//! The cache is an optimisation only: every failure is logged, counted
//! under [`CACHE_DEGRADED_TOTAL`](crate::telemetry::CACHE_DEGRADED_TOTAL)
//! and reported as a miss.

mod key;
mod warm;

pub use key::{CacheKey, KEY_NAMESPACE, make_key};
pub use warm::{MemoryWarmStore, WarmStore};

use std::sync::Arc;
use std::time::Duration;

use moka::ops::compute::Op;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::telemetry;

/// A cached answer.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The complete generated text.
    pub payload: String,
    /// When the answer was written. Promotion keeps the original value.
    pub written_at: Instant,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            written_at: Instant::now(),
        }
    }

    /// Whether the entry is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.written_at.elapsed() < ttl
    }
}

/// Configuration for the tiered cache.
///
/// ```rust
/// # use switchyard::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum entries per tier. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live shared by both tiers. Default: 1 hour.
    pub ttl: Duration,
    /// Delay before a write reaches the warm tier. Default: 50 ms.
    pub propagation_delay: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
            propagation_delay: Duration::from_millis(50),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries per tier.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live shared by both tiers.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the hot-to-warm propagation delay.
    pub fn propagation_delay(mut self, delay: Duration) -> Self {
        self.propagation_delay = delay;
        self
    }
}

/// Hot/warm response cache with TTL expiry and warm-to-hot promotion.
pub struct TieredCache {
    hot: moka::sync::Cache<CacheKey, CacheEntry>,
    warm: Arc<dyn WarmStore>,
    ttl: Duration,
    propagation_delay: Duration,
}

impl TieredCache {
    /// Create a cache with an in-memory warm tier.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_warm_store(config, Arc::new(MemoryWarmStore::new(config.max_entries)))
    }

    /// Create a cache over a custom warm tier.
    pub fn with_warm_store(config: &CacheConfig, warm: Arc<dyn WarmStore>) -> Self {
        let hot = moka::sync::Cache::builder()
            .max_capacity(config.max_entries)
            .build();
        Self {
            hot,
            warm,
            ttl: config.ttl,
            propagation_delay: config.propagation_delay,
        }
    }

    /// Look up a fresh answer, promoting warm hits into the hot tier.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        if let Some(entry) = self.hot.get(key) {
            if entry.is_fresh(self.ttl) {
                debug!(%key, "hot tier hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "tier" => "hot").increment(1);
                return Some(entry.payload);
            }
            self.evict_expired_hot(key);
        }

        match self.warm.get(key).await {
            Ok(Some(entry)) if entry.is_fresh(self.ttl) => {
                debug!(%key, "warm tier hit, promoting");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "tier" => "warm").increment(1);
                metrics::counter!(telemetry::CACHE_PROMOTIONS_TOTAL).increment(1);
                let payload = entry.payload.clone();
                self.hot.insert(key.clone(), entry);
                return Some(payload);
            }
            Ok(Some(_)) => {
                if let Err(e) = self.warm.remove(key).await {
                    degraded("evict", self.warm.name(), key, &e);
                }
            }
            Ok(None) => {}
            Err(e) => degraded("get", self.warm.name(), key, &e),
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        None
    }

    /// Store an answer.
    ///
    /// The hot tier is written before returning. The warm tier is written
    /// by a detached task after the propagation delay, and only if the hot
    /// tier still holds this exact entry by then; a later `set` or an
    /// `invalidate` in the meantime cancels the write. Outside a tokio
    /// runtime only the hot tier is written.
    pub fn set(&self, key: CacheKey, payload: impl Into<String>) {
        let entry = CacheEntry::new(payload);
        self.hot.insert(key.clone(), entry.clone());

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%key, "no tokio runtime, skipping warm tier propagation");
            metrics::counter!(telemetry::CACHE_DEGRADED_TOTAL, "op" => "propagate").increment(1);
            return;
        };

        let hot = self.hot.clone();
        let warm = Arc::clone(&self.warm);
        let delay = self.propagation_delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let name = warm.name().to_string();
            // invalidated or overwritten while sleeping: the newer state wins
            if hot.get(&key).as_ref() != Some(&entry) {
                debug!(%key, store = %name, "entry superseded, skipping warm tier propagation");
                return;
            }
            match warm.insert(key.clone(), entry).await {
                Ok(()) => debug!(%key, store = %name, "propagated to warm tier"),
                Err(e) => degraded("propagate", &name, &key, &e),
            }
        });
    }

    /// Remove `key` from both tiers.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.hot.invalidate(key);
        if let Err(e) = self.warm.remove(key).await {
            degraded("evict", self.warm.name(), key, &e);
        }
    }

    /// Drop every hot tier entry. The warm tier is untouched.
    pub fn clear_hot(&self) {
        self.hot.invalidate_all();
    }

    /// Number of hot tier entries.
    pub fn hot_len(&self) -> u64 {
        self.hot.run_pending_tasks();
        self.hot.entry_count()
    }

    /// The warm tier store.
    pub fn warm(&self) -> &Arc<dyn WarmStore> {
        &self.warm
    }

    /// The shared time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Remove an expired hot entry unless a concurrent `set` already
    /// replaced it with a fresh one.
    fn evict_expired_hot(&self, key: &CacheKey) {
        let ttl = self.ttl;
        self.hot
            .entry_by_ref(key)
            .and_compute_with(|current| match current {
                Some(entry) if !entry.value().is_fresh(ttl) => Op::Remove,
                _ => Op::Nop,
            });
    }
}

fn degraded(op: &'static str, store: &str, key: &CacheKey, err: &crate::SwitchyardError) {
    warn!(%key, store, op, error = %err, "warm tier unavailable");
    metrics::counter!(telemetry::CACHE_DEGRADED_TOTAL, "op" => op).increment(1);
}
