//! Policy-parameterized bounded cache.
//!
//! [`EvictionEngine`] combines three structures that must always agree:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EvictionEngine<K, V>                             │
//! │                                                                         │
//! │  index: FxHashMap<K, SlotId>          entries: RecencyList<Entry<K, V>> │
//! │  ┌───────┬────────┐                   HEAD ─► [e1] ◄──► [e2] ◄──► [e3] ◄─ TAIL
//! │  │ key 1 │ id_e1  │──────────────────►        LRU                 MRU   │
//! │  │ key 2 │ id_e2  │──────────────────►                                  │
//! │  │ key 3 │ id_e3  │──────────────────►                                  │
//! │  └───────┴────────┘                                                     │
//! │                                                                         │
//! │  frequencies: Option<FrequencyIndex>   (Some only under LFU)            │
//! │     freq=1: [id_e3]   freq=2: [id_e1]   freq=3: [id_e2]                 │
//! │                                                                         │
//! │  capacity, hits, misses                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every hit and every overwrite moves the entry to the recency tail, under
//! all policies. LFU additionally bumps the entry's frequency and refiles it
//! in the next bucket. When a new key arrives at a full cache exactly one
//! victim is chosen by [`EvictionPolicy`] and unlinked from all three
//! structures before the new entry goes in.
//!
//! ## Operations
//!
//! | Operation | Time | Notes                                       |
//! |-----------|------|---------------------------------------------|
//! | `get`     | O(1) | Counts hit/miss, refreshes recency/frequency |
//! | `put`     | O(1) | Overwrite in place or evict-then-insert     |
//! | `peek`    | O(1) | No side effects                             |
//! | `clear`   | O(n) | Keeps counters and capacity                 |
//!
//! ## Example
//!
//! ```
//! use evictkit::{EvictionEngine, EvictionPolicy};
//!
//! let mut cache = EvictionEngine::new(3, EvictionPolicy::Lru).unwrap();
//! cache.put(1, 100);
//! cache.put(2, 200);
//! cache.put(3, 300);
//! assert_eq!(cache.get(&1), Some(&100)); // 1 is now most recently used
//!
//! cache.put(4, 400); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.hit_count(), 1);
//! assert_eq!(cache.miss_count(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe: `get` mutates. Wrap in a lock or use
//! `ConcurrentEngine` (feature `concurrency`).

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{FrequencyIndex, RecencyList, SlotId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::EngineMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::EngineMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::policy::EvictionPolicy;
use crate::traits::{CacheStats, CoreCache, ReadOnlyCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    frequency: u64,
}

/// Fixed-capacity key-value cache with a construction-time eviction policy.
pub struct EvictionEngine<K, V> {
    entries: RecencyList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    frequencies: Option<FrequencyIndex>,
    policy: EvictionPolicy,
    capacity: usize,
    hits: u64,
    misses: u64,
    #[cfg(feature = "metrics")]
    metrics: EngineMetrics,
}

impl<K, V> EvictionEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] with the message
    /// `"Cache capacity must be greater than 0."` when `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::{EvictionEngine, EvictionPolicy};
    ///
    /// let cache: EvictionEngine<u32, String> = EvictionEngine::new(8, EvictionPolicy::Lfu).unwrap();
    /// assert_eq!(cache.capacity(), 8);
    /// assert!(EvictionEngine::<u32, String>::new(0, EvictionPolicy::Lfu).is_err());
    /// ```
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self, ConfigError> {
        if capacity == 0 {
            tracing::warn!(%policy, "rejected cache construction with zero capacity");
            return Err(ConfigError::zero_capacity());
        }
        let frequencies = policy
            .tracks_frequency()
            .then(|| FrequencyIndex::with_capacity(capacity));
        Ok(Self {
            entries: RecencyList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            frequencies,
            policy,
            capacity,
            hits: 0,
            misses: 0,
            #[cfg(feature = "metrics")]
            metrics: EngineMetrics::default(),
        })
    }

    /// Looks up `key`, counting a hit or a miss.
    ///
    /// A hit moves the entry to the most-recently-used position and, under
    /// LFU, raises its frequency by one. A miss changes nothing but the miss
    /// counter.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            self.misses += 1;
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };
        self.hits += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.touch(id);
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// An overwrite counts as an access (recency refresh, LFU frequency bump)
    /// but never evicts. A new key at a full cache evicts exactly one entry
    /// chosen by the policy first.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            let old = self
                .entries
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.touch(id);
            trace!(slot = id.index(), "overwrote cached value");
            return old;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.index.len() >= self.capacity {
            self.evict();
        }

        let id = self.entries.push_back(Entry {
            key: key.clone(),
            value,
            frequency: 1,
        });
        if let Some(frequencies) = self.frequencies.as_mut() {
            frequencies.insert(id);
        }
        self.index.insert(key, id);
        trace!(slot = id.index(), len = self.index.len(), "inserted entry");
        None
    }

    /// Returns the cached value without counting or refreshing anything.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Returns `true` if `key` is cached. Does not count as an access.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Access count of `key`; `None` if absent or the policy is not LFU.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        if self.frequencies.is_none() {
            return None;
        }
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.frequency)
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Removes every entry. Counters and capacity are kept.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.entries.clear();
        self.index.clear();
        if let Some(frequencies) = self.frequencies.as_mut() {
            frequencies.clear();
        }
        debug!(policy = %self.policy, "cache cleared");
    }

    /// Zeroes the hit and miss counters.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of live entries; never exceeds [`capacity`](Self::capacity).
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Alias of [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Number of `get` calls that found their key.
    pub fn hit_count(&self) -> u64 {
        self.hits
    }

    /// Number of `get` calls that did not find their key.
    pub fn miss_count(&self) -> u64 {
        self.misses
    }

    /// Cross-checks the key index, recency list and frequency index.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantError`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.entries.check_invariants()?;

        if self.index.len() != self.entries.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but recency list holds {} entries",
                self.index.len(),
                self.entries.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.index.len(),
                self.capacity
            )));
        }

        for (id, entry) in self.entries.iter_entries() {
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "recency entry {:?} is not the indexed slot for its key",
                    id
                )));
            }
            if entry.frequency == 0 {
                return Err(InvariantError::new(format!(
                    "entry {:?} has zero frequency",
                    id
                )));
            }
        }

        match (&self.frequencies, self.policy.tracks_frequency()) {
            (Some(frequencies), true) => {
                frequencies.check_invariants()?;
                if frequencies.len() != self.entries.len() {
                    return Err(InvariantError::new(format!(
                        "frequency index tracks {} entries, cache holds {}",
                        frequencies.len(),
                        self.entries.len()
                    )));
                }
                for (id, entry) in self.entries.iter_entries() {
                    if frequencies.frequency(id) != Some(entry.frequency) {
                        return Err(InvariantError::new(format!(
                            "entry {:?} has frequency {} but is filed under {:?}",
                            id,
                            entry.frequency,
                            frequencies.frequency(id)
                        )));
                    }
                }
                Ok(())
            },
            (None, false) => Ok(()),
            _ => Err(InvariantError::new(format!(
                "frequency index presence does not match policy {}",
                self.policy
            ))),
        }
    }

    /// Records an access on a live slot.
    fn touch(&mut self, id: SlotId) {
        if let Some(frequencies) = self.frequencies.as_mut() {
            if let Some(freq) = frequencies.touch(id) {
                if let Some(entry) = self.entries.get_mut(id) {
                    entry.frequency = freq;
                }
            }
        }
        self.entries.move_to_back(id);
    }

    /// Picks the policy's victim, without removing it.
    fn victim(&self) -> Option<SlotId> {
        match self.policy {
            EvictionPolicy::Lru => self.entries.front_id(),
            EvictionPolicy::Mru => self.entries.back_id(),
            EvictionPolicy::Lfu => self
                .frequencies
                .as_ref()
                .and_then(FrequencyIndex::peek_min)
                .map(|(id, _)| id),
        }
    }

    /// Removes one entry chosen by the policy.
    fn evict(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let id = self.victim()?;
        if let Some(frequencies) = self.frequencies.as_mut() {
            frequencies.remove(id);
        }
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);

        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
        debug!(
            policy = %self.policy,
            slot = id.index(),
            frequency = entry.frequency,
            "evicted entry"
        );
        Some((entry.key, entry.value))
    }
}

impl<K, V> fmt::Debug for EvictionEngine<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvictionEngine")
            .field("policy", &self.policy)
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

impl<K, V> ReadOnlyCache<K, V> for EvictionEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn contains(&self, key: &K) -> bool {
        EvictionEngine::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        EvictionEngine::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for EvictionEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        EvictionEngine::get(self, key)
    }

    fn clear(&mut self) {
        EvictionEngine::clear(self);
    }
}

impl<K, V> CacheStats for EvictionEngine<K, V> {
    fn hit_count(&self) -> u64 {
        self.hits
    }

    fn miss_count(&self) -> u64 {
        self.misses
    }
}

#[cfg(feature = "metrics")]
impl<K, V> EvictionEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Returns a snapshot of operation counters and gauges.
    pub fn metrics_snapshot(&self) -> EngineMetricsSnapshot {
        EngineMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            clear_calls: self.metrics.clear_calls,
            cache_len: self.len(),
            capacity: self.capacity,
            policy: self.policy,
            frequency_buckets: self
                .frequencies
                .as_ref()
                .map_or(0, FrequencyIndex::bucket_count),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<EngineMetricsSnapshot> for EvictionEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> EngineMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(capacity: usize, policy: EvictionPolicy) -> EvictionEngine<u64, u64> {
        EvictionEngine::new(capacity, policy).unwrap()
    }

    fn filled(policy: EvictionPolicy) -> EvictionEngine<u64, u64> {
        let mut cache = engine(3, policy);
        cache.put(1, 100);
        cache.put(2, 200);
        cache.put(3, 300);
        cache
    }

    // ==============================================
    // Construction
    // ==============================================

    mod construction {
        use super::*;

        #[test]
        fn zero_capacity_is_rejected_for_every_policy() {
            for policy in EvictionPolicy::ALL {
                let err = EvictionEngine::<u64, u64>::new(0, policy).unwrap_err();
                assert_eq!(err.message(), "Cache capacity must be greater than 0.");
            }
        }

        #[test]
        fn new_engine_is_empty() {
            let cache = engine(10, EvictionPolicy::Mru);
            assert!(cache.is_empty());
            assert_eq!(cache.size(), 0);
            assert_eq!(cache.capacity(), 10);
            assert_eq!(cache.policy(), EvictionPolicy::Mru);
            assert_eq!(cache.hit_count(), 0);
            assert_eq!(cache.miss_count(), 0);
        }

        #[test]
        fn frequency_index_only_for_lfu() {
            assert!(engine(2, EvictionPolicy::Lru).frequencies.is_none());
            assert!(engine(2, EvictionPolicy::Mru).frequencies.is_none());
            assert!(engine(2, EvictionPolicy::Lfu).frequencies.is_some());
        }
    }

    // ==============================================
    // Basic Operations
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn put_then_get() {
            for policy in EvictionPolicy::ALL {
                let mut cache = filled(policy);
                assert_eq!(cache.get(&1), Some(&100));
                assert_eq!(cache.get(&2), Some(&200));
                assert_eq!(cache.get(&3), Some(&300));
                assert_eq!(cache.size(), 3);
            }
        }

        #[test]
        fn overwrite_returns_old_value_and_keeps_size() {
            for policy in EvictionPolicy::ALL {
                let mut cache = filled(policy);
                assert_eq!(cache.put(2, 222), Some(200));
                assert_eq!(cache.size(), 3);
                assert_eq!(cache.peek(&2), Some(&222));
                assert!(cache.contains(&1));
                assert!(cache.contains(&3));
            }
        }

        #[test]
        fn overwrite_refreshes_recency() {
            let mut cache = filled(EvictionPolicy::Lru);
            cache.put(1, 111);
            let order: Vec<_> = cache.keys_by_recency().copied().collect();
            assert_eq!(order, vec![2, 3, 1]);
        }

        #[test]
        fn miss_leaves_state_untouched() {
            let mut cache = filled(EvictionPolicy::Lru);
            let before: Vec<_> = cache.keys_by_recency().copied().collect();
            assert_eq!(cache.get(&42), None);
            let after: Vec<_> = cache.keys_by_recency().copied().collect();
            assert_eq!(before, after);
            assert_eq!(cache.miss_count(), 1);
            assert_eq!(cache.hit_count(), 0);
        }

        #[test]
        fn peek_and_contains_have_no_side_effects() {
            let mut cache = filled(EvictionPolicy::Lfu);
            assert_eq!(cache.peek(&1), Some(&100));
            assert!(cache.contains(&1));
            assert_eq!(cache.frequency(&1), Some(1));
            assert_eq!(cache.hit_count() + cache.miss_count(), 0);

            cache.put(4, 400);
            assert!(!cache.contains(&1), "peeked key must still be the LFU victim");
        }

        #[test]
        fn get_refreshes_recency_under_every_policy() {
            for policy in EvictionPolicy::ALL {
                let mut cache = filled(policy);
                cache.get(&1);
                let order: Vec<_> = cache.keys_by_recency().copied().collect();
                assert_eq!(order, vec![2, 3, 1], "policy {}", policy);
            }
        }
    }

    // ==============================================
    // Eviction Behavior
    // ==============================================

    mod eviction_behavior {
        use super::*;

        #[test]
        fn lru_evicts_oldest_insert() {
            let mut cache = filled(EvictionPolicy::Lru);
            cache.put(4, 400);
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.get(&2), Some(&200));
            assert_eq!(cache.get(&3), Some(&300));
            assert_eq!(cache.get(&4), Some(&400));
        }

        #[test]
        fn lru_spares_recently_read_key() {
            let mut cache = filled(EvictionPolicy::Lru);
            cache.get(&1);
            cache.put(4, 400);
            assert_eq!(cache.get(&2), None);
            assert_eq!(cache.get(&1), Some(&100));
            assert_eq!(cache.get(&3), Some(&300));
            assert_eq!(cache.get(&4), Some(&400));
        }

        #[test]
        fn mru_evicts_last_touched() {
            let mut cache = filled(EvictionPolicy::Mru);
            cache.get(&1);
            cache.get(&2);
            cache.get(&3);
            cache.put(4, 400);
            assert_eq!(cache.get(&1), Some(&100));
            assert_eq!(cache.get(&2), Some(&200));
            assert_eq!(cache.get(&3), None);
            assert_eq!(cache.get(&4), Some(&400));
        }

        #[test]
        fn mru_evicts_previous_insert_when_full() {
            let mut cache = filled(EvictionPolicy::Mru);
            cache.put(4, 400);
            cache.put(5, 500);
            assert!(cache.contains(&1));
            assert!(cache.contains(&2));
            assert!(!cache.contains(&3));
            assert!(!cache.contains(&4));
            assert!(cache.contains(&5));
        }

        #[test]
        fn lfu_evicts_lowest_frequency() {
            let mut cache = filled(EvictionPolicy::Lfu);
            cache.get(&1);
            cache.get(&2);
            cache.get(&2);
            assert_eq!(cache.frequency(&1), Some(2));
            assert_eq!(cache.frequency(&2), Some(3));
            assert_eq!(cache.frequency(&3), Some(1));

            cache.put(4, 400);
            assert_eq!(cache.get(&3), None);
            assert_eq!(cache.get(&1), Some(&100));
            assert_eq!(cache.get(&2), Some(&200));
            assert_eq!(cache.get(&4), Some(&400));
        }

        #[test]
        fn lfu_ties_break_fifo() {
            let mut cache = filled(EvictionPolicy::Lfu);
            // all at frequency 1; key 1 entered that bucket first
            cache.put(4, 400);
            assert!(!cache.contains(&1));
            cache.put(5, 500);
            assert!(!cache.contains(&2));
        }

        #[test]
        fn lfu_overwrite_bumps_frequency() {
            let mut cache = filled(EvictionPolicy::Lfu);
            cache.put(1, 101);
            assert_eq!(cache.frequency(&1), Some(2));
            cache.put(4, 400);
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
        }

        #[test]
        fn capacity_one_replaces_for_every_policy() {
            for policy in EvictionPolicy::ALL {
                let mut cache = engine(1, policy);
                cache.put(1, 100);
                assert_eq!(cache.get(&1), Some(&100));
                cache.put(2, 200);
                assert_eq!(cache.get(&1), None, "policy {}", policy);
                assert_eq!(cache.get(&2), Some(&200));
                assert_eq!(cache.size(), 1);
            }
        }

        #[test]
        fn overwrite_at_capacity_never_evicts() {
            for policy in EvictionPolicy::ALL {
                let mut cache = filled(policy);
                cache.put(3, 333);
                cache.put(1, 111);
                assert_eq!(cache.size(), 3);
                assert!(cache.contains(&1) && cache.contains(&2) && cache.contains(&3));
            }
        }

        #[test]
        fn non_lfu_reports_no_frequency() {
            let mut cache = filled(EvictionPolicy::Lru);
            cache.get(&1);
            assert_eq!(cache.frequency(&1), None);
        }
    }

    // ==============================================
    // Counters and Clear
    // ==============================================

    mod counters {
        use super::*;

        #[test]
        fn hits_and_misses_are_counted() {
            let mut cache = engine(2, EvictionPolicy::Lru);
            cache.put(1, 100);
            cache.put(2, 200);
            assert_eq!(cache.get(&1), Some(&100));
            assert_eq!(cache.get(&2), Some(&200));
            assert_eq!(cache.hit_count(), 2);
            assert_eq!(cache.miss_count(), 0);

            assert_eq!(cache.get(&3), None);
            assert_eq!(cache.hit_count(), 2);
            assert_eq!(cache.miss_count(), 1);
            assert!((cache.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
        }

        #[test]
        fn put_does_not_touch_counters() {
            let mut cache = filled(EvictionPolicy::Lfu);
            cache.put(1, 1);
            cache.put(9, 9);
            assert_eq!(cache.lookups(), 0);
        }

        #[test]
        fn clear_keeps_counters_and_capacity() {
            let mut cache = filled(EvictionPolicy::Lfu);
            cache.get(&1);
            cache.get(&7);
            cache.clear();

            assert_eq!(cache.size(), 0);
            assert_eq!(cache.capacity(), 3);
            assert_eq!(cache.hit_count(), 1);
            assert_eq!(cache.miss_count(), 1);
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.get(&2), None);
            assert!(cache.check_invariants().is_ok());
        }

        #[test]
        fn reset_stats_zeroes_counters() {
            let mut cache = filled(EvictionPolicy::Mru);
            cache.get(&1);
            cache.get(&9);
            cache.reset_stats();
            assert_eq!(cache.hit_count(), 0);
            assert_eq!(cache.miss_count(), 0);
            assert_eq!(cache.size(), 3);
        }

        #[test]
        fn engine_is_reusable_after_clear() {
            for policy in EvictionPolicy::ALL {
                let mut cache = filled(policy);
                cache.clear();
                cache.put(10, 1);
                cache.put(11, 2);
                cache.put(12, 3);
                cache.put(13, 4);
                assert_eq!(cache.size(), 3);
                assert!(cache.check_invariants().is_ok(), "policy {}", policy);
            }
        }
    }

    #[test]
    fn invariants_hold_across_mixed_operations() {
        for policy in EvictionPolicy::ALL {
            let mut cache = engine(5, policy);
            for i in 0..50u64 {
                cache.put(i % 8, i);
                cache.get(&(i % 3));
                if i % 11 == 0 {
                    cache.put(i % 8, i * 2);
                }
                cache.check_invariants().unwrap();
            }
        }
    }

    #[test]
    fn trait_insert_returns_old_value() {
        let mut cache = engine(4, EvictionPolicy::Lru);
        assert_eq!(CoreCache::insert(&mut cache, 1, 10), None);
        assert_eq!(CoreCache::insert(&mut cache, 1, 20), Some(10));
        assert_eq!(ReadOnlyCache::len(&cache), 1);
    }

    #[test]
    fn debug_output_is_summary() {
        let cache = filled(EvictionPolicy::Lfu);
        let dbg = format!("{:?}", cache);
        assert!(dbg.contains("EvictionEngine"));
        assert!(dbg.contains("capacity: 3"));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_snapshot_tracks_operations() {
        let mut cache = filled(EvictionPolicy::Lfu);
        cache.get(&1);
        cache.get(&9);
        cache.put(1, 1);
        cache.put(4, 4);
        cache.clear();

        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.get_calls, 2);
        assert_eq!(snapshot.get_hits, 1);
        assert_eq!(snapshot.get_misses, 1);
        assert_eq!(snapshot.insert_calls, 5);
        assert_eq!(snapshot.insert_updates, 1);
        assert_eq!(snapshot.insert_new, 4);
        assert_eq!(snapshot.evict_calls, 1);
        assert_eq!(snapshot.evicted_entries, 1);
        assert_eq!(snapshot.clear_calls, 1);
        assert_eq!(snapshot.cache_len, 0);
        assert_eq!(snapshot.frequency_buckets, 0);
    }
}
