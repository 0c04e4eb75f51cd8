pub use crate::builder::CacheBuilder;
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentEngine;
pub use crate::ds::{FrequencyIndex, RecencyList, SlotArena, SlotId};
pub use crate::engine::EvictionEngine;
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{EngineMetricsSnapshot, MetricsExporter, MetricsSnapshotProvider};
pub use crate::policy::EvictionPolicy;
pub use crate::traits::{CacheStats, ConcurrentCache, CoreCache, ReadOnlyCache};
pub use crate::workload::{HotsetConfig, WorkloadReport, XorShift64};
