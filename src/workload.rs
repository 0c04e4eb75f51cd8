//! Synthetic traffic for exercising an engine.
//!
//! The hot-key workload reads from the keys currently cached: the first
//! `ceil(len * hot_key_fraction)` keys in recency order become the hot set.
//! Each access picks a hot key with probability `hot_access_probability`,
//! otherwise a cold key uniform in `[0, cold_key_universe)`.
//!
//! Key streams are deterministic for a given seed and need no RNG crate.

use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::EvictionEngine;
use crate::error::ConfigError;

/// Default upper bound (exclusive) for prefilled keys.
pub const DEFAULT_KEY_UNIVERSE: u64 = 1_000;
/// Default upper bound (exclusive) for prefilled values.
pub const DEFAULT_VALUE_UNIVERSE: u64 = 10_000;
/// Default upper bound (exclusive) for a randomly sized access run.
pub const DEFAULT_MAX_OPERATIONS: u64 = 100_000;

/// Hot/cold access split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotsetConfig {
    pub hot_key_fraction: f64,
    pub hot_access_probability: f64,
    pub cold_key_universe: u64,
}

impl Default for HotsetConfig {
    fn default() -> Self {
        Self {
            hot_key_fraction: 0.2,
            hot_access_probability: 0.8,
            cold_key_universe: 2_000,
        }
    }
}

impl HotsetConfig {
    /// Checks that both fractions lie in `[0, 1]` and the cold universe is
    /// non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = if !(0.0..=1.0).contains(&self.hot_key_fraction) {
            Err(ConfigError::new(format!(
                "hot_key_fraction must be in [0, 1], got {}",
                self.hot_key_fraction
            )))
        } else if !(0.0..=1.0).contains(&self.hot_access_probability) {
            Err(ConfigError::new(format!(
                "hot_access_probability must be in [0, 1], got {}",
                self.hot_access_probability
            )))
        } else if self.cold_key_universe == 0 {
            Err(ConfigError::new("cold_key_universe must be greater than 0"))
        } else {
            Ok(())
        };
        if let Err(err) = &result {
            warn!(error = %err, "rejected hotset config");
        }
        result
    }

    /// Number of hot keys drawn from a cache holding `len` entries.
    pub fn hot_key_count(&self, len: usize) -> usize {
        ((len as f64) * self.hot_key_fraction).ceil() as usize
    }
}

/// Xorshift generator; deterministic, never yields zero.
#[derive(Debug, Clone, Copy)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// A zero seed is replaced by 1.
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform in `[0, bound)`; `bound == 0` yields 0.
    pub fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            0
        } else {
            self.next_u64() % bound
        }
    }
}

/// Outcome of one access run, counted over that run only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorkloadReport {
    pub operations: u64,
    pub hits: u64,
    pub misses: u64,
}

impl WorkloadReport {
    pub fn hit_rate(&self) -> f64 {
        match self.operations {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    pub fn miss_rate(&self) -> f64 {
        match self.operations {
            0 => 0.0,
            n => self.misses as f64 / n as f64,
        }
    }
}

/// Issues `count` puts with keys in `[0, key_universe)` and values in
/// `[0, value_universe)`. Duplicate keys overwrite, so the cache may end up
/// holding fewer than `count` entries.
pub fn prefill_random(
    cache: &mut EvictionEngine<u64, u64>,
    rng: &mut XorShift64,
    count: usize,
    key_universe: u64,
    value_universe: u64,
) {
    for _ in 0..count {
        let key = rng.below(key_universe);
        let value = rng.below(value_universe);
        cache.put(key, value);
    }
    debug!(count, len = cache.len(), "prefilled cache");
}

/// Runs `operations` gets following the hot-key distribution.
///
/// Returns `None` without touching the cache if it is empty. A zero
/// `hot_key_fraction` leaves the hot set empty and sends every access to the
/// cold range.
///
/// # Errors
///
/// Returns [`ConfigError`] if `config` is invalid.
pub fn run_hotset<K, V>(
    cache: &mut EvictionEngine<K, V>,
    config: &HotsetConfig,
    rng: &mut XorShift64,
    operations: u64,
) -> Result<Option<WorkloadReport>, ConfigError>
where
    K: Eq + Hash + Clone + From<u64>,
{
    config.validate()?;
    let hot_count = config.hot_key_count(cache.len());
    if cache.is_empty() {
        return Ok(None);
    }
    let hot_keys: Vec<K> = cache.keys_by_recency().take(hot_count).cloned().collect();

    let mut report = WorkloadReport {
        operations,
        ..WorkloadReport::default()
    };
    for _ in 0..operations {
        let key = if !hot_keys.is_empty() && rng.next_f64() < config.hot_access_probability {
            hot_keys[rng.below(hot_keys.len() as u64) as usize].clone()
        } else {
            K::from(rng.below(config.cold_key_universe))
        };
        if cache.get(&key).is_some() {
            report.hits += 1;
        } else {
            report.misses += 1;
        }
    }
    debug!(
        operations,
        hot_keys = hot_keys.len(),
        hits = report.hits,
        misses = report.misses,
        "hotset run finished"
    );
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::EvictionPolicy;

    mod config {
        use super::*;

        #[test]
        fn defaults_match_eighty_twenty_split() {
            let config = HotsetConfig::default();
            assert_eq!(config.hot_key_fraction, 0.2);
            assert_eq!(config.hot_access_probability, 0.8);
            assert_eq!(config.cold_key_universe, 2_000);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn rejects_out_of_range_values() {
            let bad_fraction = HotsetConfig {
                hot_key_fraction: 1.5,
                ..HotsetConfig::default()
            };
            assert!(bad_fraction.validate().unwrap_err().message().contains("hot_key_fraction"));

            let bad_prob = HotsetConfig {
                hot_access_probability: -0.1,
                ..HotsetConfig::default()
            };
            assert!(bad_prob.validate().is_err());

            let nan = HotsetConfig {
                hot_key_fraction: f64::NAN,
                ..HotsetConfig::default()
            };
            assert!(nan.validate().is_err());

            let no_cold = HotsetConfig {
                cold_key_universe: 0,
                ..HotsetConfig::default()
            };
            assert!(no_cold.validate().is_err());
        }

        #[test]
        fn hot_key_count_rounds_up() {
            let config = HotsetConfig::default();
            assert_eq!(config.hot_key_count(0), 0);
            assert_eq!(config.hot_key_count(1), 1);
            assert_eq!(config.hot_key_count(10), 2);
            assert_eq!(config.hot_key_count(11), 3);
        }

        #[test]
        fn partial_json_fills_defaults() {
            let config: HotsetConfig = serde_json::from_str(r#"{"hot_key_fraction": 0.5}"#).unwrap();
            assert_eq!(config.hot_key_fraction, 0.5);
            assert_eq!(config.cold_key_universe, 2_000);
        }
    }

    mod rng {
        use super::*;

        #[test]
        fn same_seed_same_stream() {
            let mut a = XorShift64::new(42);
            let mut b = XorShift64::new(42);
            for _ in 0..100 {
                assert_eq!(a.next_u64(), b.next_u64());
            }
        }

        #[test]
        fn zero_seed_is_usable() {
            let mut rng = XorShift64::new(0);
            assert_ne!(rng.next_u64(), 0);
        }

        #[test]
        fn ranges_are_respected() {
            let mut rng = XorShift64::new(7);
            for _ in 0..1_000 {
                let f = rng.next_f64();
                assert!((0.0..1.0).contains(&f));
                assert!(rng.below(10) < 10);
            }
            assert_eq!(rng.below(0), 0);
        }
    }

    mod runs {
        use super::*;

        #[test]
        fn prefill_stays_within_universes_and_capacity() {
            let mut cache = EvictionEngine::new(100, EvictionPolicy::Lru).unwrap();
            let mut rng = XorShift64::new(1);
            prefill_random(&mut cache, &mut rng, 100, DEFAULT_KEY_UNIVERSE, DEFAULT_VALUE_UNIVERSE);
            assert!(cache.len() <= 100);
            assert!(!cache.is_empty());
            for key in cache.keys_by_recency() {
                assert!(*key < DEFAULT_KEY_UNIVERSE);
                assert!(*cache.peek(key).unwrap() < DEFAULT_VALUE_UNIVERSE);
            }
        }

        #[test]
        fn empty_cache_yields_no_report() {
            let mut cache: EvictionEngine<u64, u64> = EvictionEngine::new(4, EvictionPolicy::Lfu).unwrap();
            let mut rng = XorShift64::new(3);
            let report = run_hotset(&mut cache, &HotsetConfig::default(), &mut rng, 100).unwrap();
            assert_eq!(report, None);
            assert_eq!(cache.hit_count() + cache.miss_count(), 0);
        }

        #[test]
        fn report_accounts_for_every_operation() {
            for policy in EvictionPolicy::ALL {
                let mut cache = EvictionEngine::new(50, policy).unwrap();
                let mut rng = XorShift64::new(11);
                prefill_random(&mut cache, &mut rng, 50, 1_000, 10_000);
                let report = run_hotset(&mut cache, &HotsetConfig::default(), &mut rng, 5_000)
                    .unwrap()
                    .unwrap();
                assert_eq!(report.operations, 5_000);
                assert_eq!(report.hits + report.misses, 5_000);
                assert_eq!(cache.hit_count(), report.hits);
                assert_eq!(cache.miss_count(), report.misses);
                assert!((report.hit_rate() + report.miss_rate() - 1.0).abs() < 1e-9);
            }
        }

        #[test]
        fn all_hot_accesses_hit() {
            let mut cache = EvictionEngine::new(10, EvictionPolicy::Lru).unwrap();
            for k in 0..10u64 {
                cache.put(k, k);
            }
            let config = HotsetConfig {
                hot_access_probability: 1.0,
                ..HotsetConfig::default()
            };
            let mut rng = XorShift64::new(5);
            let report = run_hotset(&mut cache, &config, &mut rng, 1_000).unwrap().unwrap();
            assert_eq!(report.hits, 1_000);
            assert_eq!(report.miss_rate(), 0.0);
        }

        #[test]
        fn zero_hot_fraction_draws_only_cold_keys() {
            let mut cache = EvictionEngine::new(10, EvictionPolicy::Lru).unwrap();
            for k in 0..10u64 {
                cache.put(k, k);
            }
            let config = HotsetConfig {
                hot_key_fraction: 0.0,
                cold_key_universe: 5,
                ..HotsetConfig::default()
            };
            assert!(config.validate().is_ok());
            let mut rng = XorShift64::new(17);
            let report = run_hotset(&mut cache, &config, &mut rng, 500).unwrap().unwrap();
            assert_eq!(report.operations, 500);
            // cold range [0, 5) is fully cached
            assert_eq!(report.hits, 500);
            assert_eq!(cache.len(), 10);
        }

        #[test]
        fn zero_hot_probability_still_reports() {
            let mut cache = EvictionEngine::new(10, EvictionPolicy::Lfu).unwrap();
            for k in 0..10u64 {
                cache.put(k, k);
            }
            let config = HotsetConfig {
                hot_access_probability: 0.0,
                cold_key_universe: 1_000,
                ..HotsetConfig::default()
            };
            let mut rng = XorShift64::new(23);
            let report = run_hotset(&mut cache, &config, &mut rng, 200).unwrap().unwrap();
            assert_eq!(report.hits + report.misses, 200);
        }

        #[test]
        fn invalid_config_is_rejected_before_running() {
            let mut cache = EvictionEngine::new(10, EvictionPolicy::Lru).unwrap();
            cache.put(1u64, 1u64);
            let config = HotsetConfig {
                cold_key_universe: 0,
                ..HotsetConfig::default()
            };
            let mut rng = XorShift64::new(5);
            assert!(run_hotset(&mut cache, &config, &mut rng, 10).is_err());
            assert_eq!(cache.hit_count() + cache.miss_count(), 0);
        }
    }
}
