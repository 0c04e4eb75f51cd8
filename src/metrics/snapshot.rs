use crate::policy::EvictionPolicy;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EngineMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
    pub policy: EvictionPolicy,
    /// Populated frequency buckets; always 0 unless the policy is LFU.
    pub frequency_buckets: usize,
}

impl EngineMetricsSnapshot {
    /// Hits over lookups, `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}
