//! Property-Based Tests for Cache Module
//!
//! Invariants of the in-process store that the cache-aside coordinator relies
//! on: payload bytes come back untouched, deletes are idempotent, entries die
//! at their deadline, and capacity is never exceeded.

use proptest::prelude::*;
use std::collections::HashSet;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{keys, CacheLayer, CacheStore, MemoryCache};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(keys::users_list()),
        (1i64..10_000).prop_map(keys::user),
        "[a-zA-Z0-9_:/]{1,64}",
    ]
}

fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), payload_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses are counted exactly once per lookup
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let _ = store.set(key, value, TEST_TTL);
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // A stored payload is returned byte-for-byte
    #[test]
    fn prop_payload_bytes_preserved(key in valid_key_strategy(), value in payload_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        store.set(key.clone(), value.clone(), TEST_TTL).unwrap();
        prop_assert_eq!(store.get(&key).unwrap(), value);
    }

    // Deleting twice, or deleting a key that was never set, is harmless
    #[test]
    fn prop_delete_is_idempotent(
        key in valid_key_strategy(),
        value in payload_strategy(),
        was_set in any::<bool>()
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        if was_set {
            store.set(key.clone(), value, TEST_TTL).unwrap();
        }

        prop_assert_eq!(store.delete(&key), was_set);
        prop_assert!(!store.delete(&key));
        prop_assert!(store.get(&key).is_none());
    }

    // Entry replacement never patches; the newest payload wins whole
    #[test]
    fn prop_overwrite_replaces_whole_value(
        key in valid_key_strategy(),
        value1 in payload_strategy(),
        value2 in payload_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        store.set(key.clone(), value1, TEST_TTL).unwrap();
        store.set(key.clone(), value2.clone(), TEST_TTL).unwrap();

        prop_assert_eq!(store.get(&key).unwrap(), value2);
        prop_assert_eq!(store.len(), 1);
    }

    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), payload_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let mut store = CacheStore::new(max_entries);

        for (key, value) in entries {
            let _ = store.set(key, value, TEST_TTL);
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
        }
    }

    // The least recently touched key is the one evicted
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 3..10),
        new_key in valid_key_strategy()
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();

        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = CacheStore::new(capacity);
        for key in &unique_keys {
            store.set(key.clone(), key.as_bytes().to_vec(), TEST_TTL).unwrap();
        }

        store.set(new_key.clone(), b"new".to_vec(), TEST_TTL).unwrap();

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.contains(&unique_keys[0]), "Oldest key should be evicted");
        prop_assert!(store.contains(&new_key));
        for key in unique_keys.iter().skip(1) {
            prop_assert!(store.contains(key), "Key '{}' should survive", key);
        }
    }
}

// Fewer cases for the time-sensitive expiry property
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // No entry is readable after its TTL
    #[test]
    fn prop_entry_never_outlives_ttl(key in valid_key_strategy(), value in payload_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES);
        store.set(key.clone(), value.clone(), Duration::from_millis(150)).unwrap();

        prop_assert_eq!(store.get(&key), Some(value));

        sleep(Duration::from_millis(250));

        prop_assert!(store.get(&key).is_none(), "Entry should be gone after TTL");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent callers through the shared handle only ever observe whole
    // payloads that some caller actually wrote
    #[test]
    fn prop_concurrent_reads_see_whole_payloads(
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let written: HashSet<Vec<u8>> = operations
            .iter()
            .filter_map(|op| match op {
                CacheOp::Set { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect();

        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let cache = MemoryCache::new(TEST_MAX_ENTRIES);
            let mut handles = vec![];

            for op in operations {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            let _ = cache.set(&key, &value, TEST_TTL).await;
                            None
                        }
                        CacheOp::Get { key } => cache.get(&key).await.ok().flatten(),
                        CacheOp::Delete { key } => {
                            let _ = cache.delete(&key).await;
                            None
                        }
                    }
                }));
            }

            for handle in handles {
                if let Some(value) = handle.await.expect("Task should not panic") {
                    prop_assert!(written.contains(&value), "Read a payload nobody wrote");
                }
            }

            let stats = cache.stats().await;
            prop_assert!(stats.total_entries <= TEST_MAX_ENTRIES);
            Ok(())
        })?;
    }
}
