//! Thread-safe engine handle.
//!
//! [`ConcurrentEngine`] serializes every operation through one
//! `parking_lot::Mutex`. A plain read lock is not enough because `get`
//! reorders the recency list (and LFU buckets) on every hit.
//!
//! ```
//! use evictkit::concurrent::ConcurrentEngine;
//! use evictkit::EvictionPolicy;
//!
//! let cache = ConcurrentEngine::new(100, EvictionPolicy::Lru).unwrap();
//! let handle = cache.clone();
//! std::thread::spawn(move || {
//!     handle.put("key", 1);
//! })
//! .join()
//! .unwrap();
//! assert_eq!(cache.get(&"key"), Some(1));
//! ```

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::EvictionEngine;
use crate::error::ConfigError;
use crate::policy::EvictionPolicy;
use crate::traits::ConcurrentCache;

/// Cloneable, shared handle to one [`EvictionEngine`].
#[derive(Debug)]
pub struct ConcurrentEngine<K, V> {
    inner: Arc<Mutex<EvictionEngine<K, V>>>,
}

impl<K, V> Clone for ConcurrentEngine<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentEngine<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a shared engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self, ConfigError> {
        EvictionEngine::new(capacity, policy).map(Self::from_engine)
    }

    /// Wraps an existing engine, keeping its contents and counters.
    pub fn from_engine(engine: EvictionEngine<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Looks up `key` and returns a clone of the value.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up `key` and applies `f` to the value inside the lock.
    pub fn get_with<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    /// Inserts or overwrites `key`; see [`EvictionEngine::put`].
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.inner.lock().policy()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn hit_count(&self) -> u64 {
        self.inner.lock().hit_count()
    }

    pub fn miss_count(&self) -> u64 {
        self.inner.lock().miss_count()
    }

    /// Runs `f` with exclusive access, for compound operations that must
    /// not interleave with other threads.
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut EvictionEngine<K, V>) -> R,
    {
        f(&mut self.inner.lock())
    }
}

impl<K, V> ConcurrentCache for ConcurrentEngine<K, V>
where
    K: Send,
    V: Send,
{
}
