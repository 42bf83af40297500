//! Property-Based Tests for the in-memory cache engine
//!
//! Uses proptest to check counter accuracy, bound enforcement and memory
//! accounting over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const HOUR: Option<Duration> = Some(Duration::from_secs(3600));

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}"
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \\[\\]{}\":,]{0,128}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every lookup is counted exactly once, as a hit or a miss.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, 0);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key, value, HOUR).unwrap();
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
    }

    // The last write to a key is what a later read returns.
    #[test]
    fn prop_last_write_wins(
        key in valid_key_strategy(),
        values in prop::collection::vec(valid_value_strategy(), 1..10)
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, 0);
        for value in &values {
            store.set(key.clone(), value.clone(), HOUR).unwrap();
        }

        prop_assert_eq!(store.get(&key), values.last().cloned());
        prop_assert_eq!(store.len(), 1);
    }

    // Neither the entry bound nor the memory bound is ever exceeded, and the
    // tracked memory equals the footprint of what is actually stored.
    #[test]
    fn prop_bounds_and_memory_accounting(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        ),
        max_entries in 1usize..40,
        max_memory in 200u64..2000
    ) {
        let mut store = CacheStore::new(max_entries, max_memory);
        let mut shadow: HashMap<String, String> = HashMap::new();

        for (key, value) in entries {
            store.set(key.clone(), value.clone(), HOUR).unwrap();
            shadow.insert(key, value);

            prop_assert!(store.len() <= max_entries, "{} entries over {}", store.len(), max_entries);
            prop_assert!(
                store.used_memory() <= max_memory,
                "{} bytes over {}",
                store.used_memory(),
                max_memory
            );
        }

        // Surviving keys hold their latest value; their footprint sums to used_memory
        let mut footprint = 0u64;
        let keys: Vec<String> = shadow.keys().cloned().collect();
        for key in keys {
            if let Some(value) = store.get(&key) {
                prop_assert_eq!(Some(&value), shadow.get(&key));
                footprint += (key.len() + value.len()) as u64;
            }
        }
        prop_assert_eq!(footprint, store.used_memory());
    }

    // Expired entries never come back, whatever their TTL.
    #[test]
    fn prop_expired_entries_are_misses(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl_secs in 1u64..7200
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, 0);
        let now = Instant::now();
        let ttl = Duration::from_secs(ttl_secs);

        store.set_at(key.clone(), value.clone(), Some(ttl), now).unwrap();

        prop_assert_eq!(store.get_at(&key, now + ttl - Duration::from_millis(1)), Some(value));
        prop_assert_eq!(store.get_at(&key, now + ttl), None);
        prop_assert_eq!(store.used_memory(), 0);
    }
}
