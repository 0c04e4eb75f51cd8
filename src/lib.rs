//! evictkit: fixed-capacity in-memory cache with LRU, MRU and LFU eviction.
//!
//! The policy is chosen per engine at construction; see [`EvictionEngine`]
//! for the data layout and [`policy`] for victim selection.

pub mod builder;
#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod ds;
pub mod engine;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;
pub mod workload;

pub use builder::CacheBuilder;
#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentEngine;
pub use engine::EvictionEngine;
pub use error::{ConfigError, InvariantError};
pub use policy::EvictionPolicy;
