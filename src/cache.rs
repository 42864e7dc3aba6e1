//! Version-keyed metrics cache.
//!
//! Staleness is a checkable invariant here: entries are keyed by the graph
//! version (an integer), and a hit additionally requires the stored
//! fingerprint to match the requested snapshot's. A reset that rewinds the
//! version counter to 0 over a different graph therefore misses instead of
//! serving stale metrics.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::RwLock;

use crate::metrics::{MetricsConfig, MetricsEngine};
use crate::store::GraphSnapshot;
use crate::types::MetricsSnapshot;

/// Default capacity of the metrics cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Occupancy counters for the metrics cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of cached metric snapshots.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}

/// LRU cache of computed [`MetricsSnapshot`]s keyed by graph version.
///
/// Bounded: when full, the least recently used version is evicted. Thread-safe
/// behind a read/write lock, though the session model is single-threaded.
pub struct MetricsCache {
    cache: RwLock<LruCache<u64, Arc<MetricsSnapshot>>>,
    config: MetricsConfig,
}

impl MetricsCache {
    /// Create a cache with the default capacity and metrics configuration.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY, MetricsConfig::default())
    }

    /// Create a cache holding at most `capacity` versions.
    pub fn with_capacity(capacity: usize, config: MetricsConfig) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap());
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            config,
        }
    }

    /// Fetch the metrics for a snapshot's version, computing them on a miss.
    ///
    /// A cached entry is used only when both the version and the graph
    /// fingerprint match the snapshot.
    pub fn get_or_compute(&self, snapshot: &GraphSnapshot) -> Arc<MetricsSnapshot> {
        let version = snapshot.version();

        if let Some(cached) = self.cache.read().peek(&version) {
            if cached.fingerprint == snapshot.fingerprint() {
                tracing::debug!(version, "metrics cache hit");
                return Arc::clone(cached);
            }
            tracing::debug!(version, "metrics cache fingerprint mismatch, recomputing");
        }

        let mut engine = MetricsEngine::new(snapshot.clone(), self.config.clone());
        let computed = Arc::new(engine.compute_snapshot());

        self.cache.write().put(version, Arc::clone(&computed));
        tracing::debug!(version, "metrics computed and cached");
        computed
    }

    /// Drop the entry for one version, if present.
    pub fn invalidate(&self, version: u64) {
        self.cache.write().pop(&version);
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    /// Occupancy counters.
    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.read();
        CacheStats {
            len: cache.len(),
            cap: cache.cap().get(),
        }
    }
}

impl Default for MetricsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GraphKind;
    use crate::store::GraphStore;

    fn store() -> GraphStore {
        let mut store = GraphStore::new();
        store.initialize(GraphKind::Random, 20, 42);
        store
    }

    #[test]
    fn test_hit_returns_same_instance() {
        let store = store();
        let cache = MetricsCache::new();
        let snapshot = store.snapshot();

        let first = cache.get_or_compute(&snapshot);
        let second = cache.get_or_compute(&snapshot);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().len, 1);
    }

    #[test]
    fn test_new_version_misses() {
        let mut store = store();
        let cache = MetricsCache::new();

        let before = cache.get_or_compute(&store.snapshot());
        while store.update(2, 0).unwrap().is_empty() {}
        let after = cache.get_or_compute(&store.snapshot());

        assert_ne!(before.version, after.version);
        assert_eq!(cache.stats().len, 2);
    }

    #[test]
    fn test_reset_fingerprint_mismatch_recomputes() {
        let mut store = store();
        let cache = MetricsCache::new();

        let original = cache.get_or_compute(&store.snapshot());
        assert_eq!(original.version, 0);

        // Reset to a different graph: version is 0 again but topology differs
        store.reset(GraphKind::Random, 20, 7);
        let fresh = cache.get_or_compute(&store.snapshot());

        assert_eq!(fresh.version, 0);
        assert_ne!(fresh.fingerprint, original.fingerprint);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let store = store();
        let cache = MetricsCache::new();

        let first = cache.get_or_compute(&store.snapshot());
        cache.invalidate(0);
        assert_eq!(cache.stats().len, 0);

        let second = cache.get_or_compute(&store.snapshot());
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.fingerprint, second.fingerprint);

        cache.clear();
        assert_eq!(cache.stats().len, 0);
    }

    #[test]
    fn test_capacity_bounds_entries() {
        let mut store = store();
        let cache = MetricsCache::with_capacity(2, MetricsConfig::default());

        for _ in 0..5 {
            cache.get_or_compute(&store.snapshot());
            while store.update(1, 0).unwrap().is_empty() {}
        }

        assert!(cache.stats().len <= 2);
    }
}
