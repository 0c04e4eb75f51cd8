//! # Cache Traits
//!
//! Policy-agnostic interface over bounded caches, so callers (workload
//! drivers, benches, the demo binary) can be written once against
//! [`CoreCache`] and run against any engine configuration.
//!
//! ```text
//!   ┌─────────────────────────────────┐
//!   │       ReadOnlyCache<K, V>       │   contains / len / is_empty / capacity
//!   └────────────────┬────────────────┘
//!                    │
//!                    ▼
//!   ┌─────────────────────────────────┐
//!   │         CoreCache<K, V>         │   insert / get / clear
//!   └────────────────┬────────────────┘
//!                    │
//!                    ▼
//!   ┌─────────────────────────────────┐
//!   │        CacheStats               │   hit_count / miss_count / rates
//!   └─────────────────────────────────┘
//!
//!   ConcurrentCache: marker, Send + Sync
//! ```
//!
//! `get` takes `&mut self` on purpose: a hit updates recency (and, for LFU,
//! frequency) state.

/// Read-only queries that never touch eviction state.
pub trait ReadOnlyCache<K, V> {
    /// Returns `true` if `key` is cached. Does not count as an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;
}

/// Core mutable cache operations.
///
/// # Example
///
/// ```
/// use evictkit::traits::{CoreCache, ReadOnlyCache};
/// use evictkit::{EvictionEngine, EvictionPolicy};
///
/// fn fill<C: CoreCache<u64, u64>>(cache: &mut C, n: u64) {
///     for k in 0..n {
///         cache.insert(k, k * 10);
///     }
/// }
///
/// let mut cache = EvictionEngine::new(4, EvictionPolicy::Lru).unwrap();
/// fill(&mut cache, 10);
/// assert_eq!(ReadOnlyCache::len(&cache), 4);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts or overwrites `key`; returns the previous value if present.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, recording the access.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Hit/miss accounting for caches that count `get` outcomes.
pub trait CacheStats {
    fn hit_count(&self) -> u64;

    fn miss_count(&self) -> u64;

    /// Total lookups observed.
    fn lookups(&self) -> u64 {
        self.hit_count() + self.miss_count()
    }

    /// Fraction of lookups that hit, `0.0` before any lookup.
    fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => self.hit_count() as f64 / n as f64,
        }
    }

    /// Fraction of lookups that missed, `0.0` before any lookup.
    fn miss_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => self.miss_count() as f64 / n as f64,
        }
    }
}

/// Marker for cache handles that may be shared across threads.
///
/// Usage: `fn serve<C: ConcurrentCache + Clone>(cache: C)`.
pub trait ConcurrentCache: Send + Sync {}
