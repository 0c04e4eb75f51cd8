//! Eviction policies understood by [`EvictionEngine`](crate::EvictionEngine).
//!
//! The policy is fixed when an engine is built. It decides only which entry
//! leaves when a new key arrives at a full cache:
//!
//! | Policy | Victim                                        |
//! |--------|-----------------------------------------------|
//! | `Lru`  | head of the recency list (least recently used) |
//! | `Mru`  | tail of the recency list (most recently used)  |
//! | `Lfu`  | oldest entry of the lowest frequency bucket    |
//!
//! Recency order is maintained under every policy; frequency counts are only
//! kept for `Lfu`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Closed set of replacement strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least Recently Used.
    #[default]
    Lru,
    /// Most Recently Used.
    Mru,
    /// Least Frequently Used, FIFO among equal frequencies.
    Lfu,
}

impl EvictionPolicy {
    /// Every policy, in declaration order.
    pub const ALL: [EvictionPolicy; 3] = [
        EvictionPolicy::Lru,
        EvictionPolicy::Mru,
        EvictionPolicy::Lfu,
    ];

    /// Long human-readable name, e.g. "Least Recently Used".
    pub fn description(self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "Least Recently Used",
            EvictionPolicy::Mru => "Most Recently Used",
            EvictionPolicy::Lfu => "Least Frequently Used",
        }
    }

    /// Short lowercase name, e.g. "lru".
    pub fn as_str(self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Mru => "mru",
            EvictionPolicy::Lfu => "lfu",
        }
    }

    /// Whether the engine must maintain per-entry frequency buckets.
    pub fn tracks_frequency(self) -> bool {
        matches!(self, EvictionPolicy::Lfu)
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "mru" => Ok(EvictionPolicy::Mru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            other => Err(ConfigError::new(format!(
                "unknown eviction policy '{}', expected one of: lru, mru, lfu",
                other
            ))),
        }
    }
}
