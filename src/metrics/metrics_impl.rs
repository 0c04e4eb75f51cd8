use crate::metrics::traits::CoreMetricsRecorder;

/// Plain counters owned by one engine instance.
#[derive(Debug, Default, Clone)]
pub struct EngineMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,
}

impl CoreMetricsRecorder for EngineMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }
    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_outcomes_count_calls() {
        let mut metrics = EngineMetrics::default();
        metrics.record_get_hit();
        metrics.record_get_miss();
        metrics.record_get_miss();
        assert_eq!(metrics.get_calls, 3);
        assert_eq!(metrics.get_hits, 1);
        assert_eq!(metrics.get_misses, 2);
    }

    #[test]
    fn insert_and_evict_counters_are_independent() {
        let mut metrics = EngineMetrics::default();
        metrics.record_insert_call();
        metrics.record_insert_new();
        metrics.record_insert_call();
        metrics.record_insert_update();
        metrics.record_evict_call();
        metrics.record_evicted_entry();
        metrics.record_clear();
        assert_eq!(metrics.insert_calls, 2);
        assert_eq!(metrics.insert_new, 1);
        assert_eq!(metrics.insert_updates, 1);
        assert_eq!(metrics.evict_calls, 1);
        assert_eq!(metrics.evicted_entries, 1);
        assert_eq!(metrics.clear_calls, 1);
    }
}
