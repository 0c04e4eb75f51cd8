//! Fluent construction of [`EvictionEngine`]s.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::CacheBuilder;
//! use evictkit::EvictionPolicy;
//!
//! let mut cache = CacheBuilder::new(100)
//!     .policy(EvictionPolicy::Lfu)
//!     .build::<u64, String>()
//!     .unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::engine::EvictionEngine;
use crate::error::ConfigError;
use crate::policy::EvictionPolicy;

/// Builder for [`EvictionEngine`]. Policy defaults to [`EvictionPolicy::Lru`].
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
    policy: EvictionPolicy,
}

impl CacheBuilder {
    /// Starts a builder for an engine holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: EvictionPolicy::default(),
        }
    }

    /// Sets the eviction policy.
    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn build<K, V>(self) -> Result<EvictionEngine<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        EvictionEngine::new(self.capacity, self.policy)
    }
}
