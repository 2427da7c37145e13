//! Integration tests for the TTL cache
//!
//! Time is driven by a manual clock so expiry is checked without sleeping.

use chatbot_core::cache::{CacheConfig, TtlCache};
use chatbot_core::ManualClock;
use std::sync::Arc;
use std::time::Duration;

fn setup(ttl: Duration) -> (Arc<TtlCache>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let config = CacheConfig::builder().ttl(ttl).build();
    let cache = TtlCache::new(config, clock.clone()).unwrap();
    (Arc::new(cache), clock)
}

fn docs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Test: set immediately followed by get returns the stored value
#[tokio::test]
async fn test_set_then_get() {
    let (cache, _clock) = setup(Duration::from_secs(300));

    cache.set("u1", docs(&["birthday 25/12", "partner: B"])).await;
    assert_eq!(
        cache.get("u1").await,
        Some(docs(&["birthday 25/12", "partner: B"]))
    );
}

/// Test: get after the TTL has elapsed returns nothing
#[tokio::test]
async fn test_get_after_ttl_is_absent() {
    let (cache, clock) = setup(Duration::from_secs(300));
    cache.set("u1", docs(&["a"])).await;

    clock.advance(Duration::from_secs(301));
    assert!(cache.get("u1").await.is_none());
}

/// Test: invalidate removes the entry regardless of TTL
#[tokio::test]
async fn test_invalidate_regardless_of_ttl() {
    let (cache, _clock) = setup(Duration::from_secs(3600));
    cache.set("u1", docs(&["a"])).await;

    cache.invalidate("u1").await;
    assert!(cache.get("u1").await.is_none());
}

/// Test: stats reports entry count and configured TTL
#[tokio::test]
async fn test_stats_reports_entries_and_ttl() {
    let (cache, _clock) = setup(Duration::from_secs(120));
    cache.set("u1", docs(&["a"])).await;
    cache.set("u2", docs(&[])).await;

    let stats = cache.stats().await;
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.ttl, Duration::from_secs(120));
}

/// Test: concurrent writers and readers on distinct keys
#[tokio::test]
async fn test_concurrent_access() {
    let (cache, _clock) = setup(Duration::from_secs(300));

    let mut handles = vec![];
    for i in 0..16 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("user-{}", i);
            cache.set(key.clone(), vec![format!("doc-{}", i)]).await;
            cache.get(&key).await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let value = handle.await.unwrap();
        assert_eq!(value, Some(vec![format!("doc-{}", i)]));
    }
    assert_eq!(cache.len().await, 16);
}
