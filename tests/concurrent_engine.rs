// ==============================================
// CONCURRENT ENGINE TESTS (integration)
// ==============================================
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use evictkit::{ConcurrentEngine, EvictionPolicy};

mod thread_safe_wrapper {
    use super::*;

    #[test]
    fn test_parallel_puts_respect_capacity() {
        for policy in EvictionPolicy::ALL {
            let cache = ConcurrentEngine::new(64, policy).unwrap();
            let handles: Vec<_> = (0..8u64)
                .map(|thread_id| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for i in 0..1_000u64 {
                            cache.put(thread_id * 10_000 + i, i);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(cache.len(), 64);
            cache.with_engine(|engine| engine.check_invariants()).unwrap();
        }
    }

    #[test]
    fn test_counters_match_observed_gets() {
        let cache = ConcurrentEngine::new(32, EvictionPolicy::Lfu).unwrap();
        for key in 0..32u64 {
            cache.put(key, key * 2);
        }
        let observed_hits = Arc::new(AtomicU64::new(0));
        let observed_misses = Arc::new(AtomicU64::new(0));

        let handles: Vec<_> = (0..4u64)
            .map(|thread_id| {
                let cache = cache.clone();
                let hits = observed_hits.clone();
                let misses = observed_misses.clone();
                thread::spawn(move || {
                    for i in 0..2_000u64 {
                        let key = (thread_id * 7 + i) % 48;
                        match cache.get(&key) {
                            Some(value) => {
                                assert_eq!(value, key * 2);
                                hits.fetch_add(1, Ordering::Relaxed);
                            },
                            None => {
                                misses.fetch_add(1, Ordering::Relaxed);
                            },
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.hit_count(), observed_hits.load(Ordering::Relaxed));
        assert_eq!(cache.miss_count(), observed_misses.load(Ordering::Relaxed));
        assert_eq!(cache.hit_count() + cache.miss_count(), 8_000);
    }

    #[test]
    fn test_mixed_operations_keep_invariants() {
        let cache = ConcurrentEngine::new(16, EvictionPolicy::Mru).unwrap();
        let handles: Vec<_> = (0..6u64)
            .map(|thread_id| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500u64 {
                        let key = (thread_id + i) % 40;
                        match i % 5 {
                            0 => {
                                cache.get(&key);
                            },
                            4 if i % 100 == 4 => cache.clear(),
                            _ => {
                                cache.put(key, i);
                            },
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= cache.capacity());
        cache.with_engine(|engine| engine.check_invariants()).unwrap();
    }
}
