//! Integration Tests for the public cache API
//!
//! Exercises the full get/put/evict protocol through the crate root.

use lru_index::{CacheError, Config, LruCache, Value};

// == Helper Functions ==

fn order(cache: &LruCache) -> Vec<String> {
    cache.dump().into_iter().map(|(key, _)| key).collect()
}

fn filled(capacity: usize, keys: &[(&str, Value)]) -> LruCache {
    let mut cache = LruCache::new(capacity, 16).unwrap();
    for (key, value) in keys {
        cache.put(key, *value).unwrap();
    }
    cache
}

// == Scenario Tests ==

#[test]
fn test_reference_scenario() {
    let mut cache = filled(4, &[("A", 10), ("B", 20), ("C", 30), ("D", 40)]);
    assert_eq!(order(&cache), vec!["D", "C", "B", "A"]);

    // A read is also a write to recency state
    assert_eq!(cache.get("B"), Some(20));
    assert_eq!(order(&cache), vec!["B", "D", "C", "A"]);

    cache.put("A", 15).unwrap();
    assert_eq!(order(&cache), vec!["A", "B", "D", "C"]);
    assert_eq!(cache.len(), 4);

    cache.put("E", 50).unwrap();
    assert_eq!(order(&cache), vec!["E", "A", "B", "D"]);

    cache.put("F", 60).unwrap();
    assert_eq!(order(&cache), vec!["F", "E", "A", "B"]);

    assert_eq!(cache.get("C"), None);
    assert_eq!(cache.get("Z"), None);
    assert_eq!(order(&cache), vec!["F", "E", "A", "B"]);

    assert_eq!(
        cache.dump(),
        vec![
            ("F".to_string(), 60),
            ("E".to_string(), 50),
            ("A".to_string(), 15),
            ("B".to_string(), 20),
        ]
    );

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.evictions, 2);
    assert_eq!(cache.destroy(), 4);
}

#[test]
fn test_reference_scenario_snapshot_text() {
    let mut cache = filled(4, &[("A", 10), ("B", 20), ("C", 30), ("D", 40)]);
    cache.get("B");

    let text = cache.snapshot().to_string();
    assert!(text.contains("Count: 4 / Capacity: 4"));
    assert!(text.ends_with("MRU -> ['B': 20] -> ['D': 40] -> ['C': 30] -> ['A': 10] -> LRU"));
}

// == Construction Tests ==

#[test]
fn test_create_rejects_zero_arguments() {
    for n in [0usize, 1, 16, 1024] {
        assert_eq!(LruCache::new(0, n).unwrap_err(), CacheError::InvalidCapacity);
        if n > 0 {
            assert_eq!(LruCache::new(n, 0).unwrap_err(), CacheError::InvalidBucketCount);
        }
    }
}

#[test]
fn test_create_reports_allocation_failure() {
    let err = LruCache::new(16, usize::MAX).unwrap_err();
    assert!(matches!(err, CacheError::AllocationFailure(_)));
}

#[test]
fn test_create_with_large_capacity() {
    let mut cache = LruCache::new(usize::MAX / 2, 16).unwrap();
    for i in 0..100 {
        cache.put(&format!("key{}", i), i).unwrap();
    }
    assert_eq!(cache.len(), 100);
    assert_eq!(cache.stats().evictions, 0);
}

#[test]
fn test_create_from_config() {
    let config = Config {
        capacity: 2,
        bucket_count: 3,
        ..Config::default()
    };
    let cache = LruCache::from_config(&config).unwrap();
    assert_eq!(cache.capacity(), 2);
    assert_eq!(cache.bucket_count(), 3);
}

// == Put / Get Tests ==

#[test]
fn test_update_is_idempotent_on_count() {
    let mut cache = filled(3, &[("k", 1)]);
    cache.put("k", 2).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("k"), Some(2));
}

#[test]
fn test_update_at_capacity_does_not_evict() {
    let mut cache = filled(2, &[("a", 1), ("b", 2)]);
    cache.put("a", 3).unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().evictions, 0);
    assert_eq!(order(&cache), vec!["a", "b"]);
}

#[test]
fn test_new_key_at_capacity_evicts_exactly_one() {
    let mut cache = filled(3, &[("a", 1), ("b", 2), ("c", 3)]);
    let tail = order(&cache).last().cloned().unwrap();

    cache.put("d", 4).unwrap();

    assert_eq!(cache.len(), 3);
    assert!(!cache.contains(&tail));
    assert!(cache.contains("b"));
    assert!(cache.contains("c"));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_many_collisions_single_bucket() {
    let mut cache = LruCache::new(16, 1).unwrap();
    for i in 0..16 {
        cache.put(&format!("key{}", i), i).unwrap();
    }
    for i in 0..16 {
        assert_eq!(cache.peek(&format!("key{}", i)), Some(i));
    }
    cache.put("overflow", -1).unwrap();
    assert!(!cache.contains("key0"));
    assert_eq!(cache.len(), 16);
}

#[test]
fn test_remove_then_reinsert() {
    let mut cache = filled(2, &[("a", 1), ("b", 2)]);

    assert_eq!(cache.remove("a"), Some(1));
    cache.put("c", 3).unwrap();

    // Room was freed by the removal, so nothing is evicted
    assert_eq!(cache.stats().evictions, 0);
    assert_eq!(order(&cache), vec!["c", "b"]);
}

#[test]
fn test_clear_and_reuse() {
    let mut cache = filled(2, &[("a", 1), ("b", 2)]);
    cache.clear();

    assert!(cache.is_empty());
    cache.put("a", 9).unwrap();
    assert_eq!(cache.get("a"), Some(9));
}

#[test]
fn test_destroy_empty_cache() {
    let cache = LruCache::new(1, 1).unwrap();
    assert_eq!(cache.destroy(), 0);
}
