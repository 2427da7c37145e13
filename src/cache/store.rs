//! TTL cache store with lazy expiry

use crate::cache::{
    config::CacheConfig,
    entry::CacheEntry,
    types::{CacheKey, CacheStats, CacheValue},
};
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Time-bounded cache of per-owner document lists
///
/// Every operation runs under one mutex scoped to the whole structure.
/// Expiry is checked only on access: a stale entry that is never read
/// stays in memory until `clear`, `invalidate` or `purge_expired`.
pub struct TtlCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    store: Mutex<CacheStore>,
}

/// Internal cache storage
#[derive(Default)]
struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
    expirations: u64,
    invalidations: u64,
}

impl TtlCache {
    /// Create a new cache with the given configuration
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate().map_err(CoreError::ConfigError)?;
        info!("Initializing TTL cache (ttl: {:?})", config.ttl);

        Ok(Self {
            config,
            clock,
            store: Mutex::new(CacheStore::default()),
        })
    }

    /// Create a cache driven by the system clock
    pub fn with_system_clock(config: CacheConfig) -> Result<Self> {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> std::time::Duration {
        self.config.ttl
    }

    /// Get a value, evicting it first if it has outlived the TTL
    pub async fn get(&self, key: &str) -> Option<CacheValue> {
        let now = self.clock.now();
        let mut store = self.store.lock().await;

        let expired = match store.entries.get(key).map(|e| e.is_expired(now, self.config.ttl)) {
            Some(expired) => expired,
            None => {
                debug!("Cache miss: {}", key);
                store.misses += 1;
                return None;
            }
        };

        if expired {
            debug!("Cache entry expired: {}", key);
            store.entries.remove(key);
            store.expirations += 1;
            store.misses += 1;
            return None;
        }

        store.hits += 1;
        debug!("Cache hit: {}", key);
        store.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value, replacing any existing entry and resetting its timestamp
    pub async fn set(&self, key: impl Into<CacheKey>, value: CacheValue) {
        let key = key.into();
        let entry = CacheEntry::new(key.clone(), value, self.clock.now());

        let mut store = self.store.lock().await;
        debug!("Caching {} document(s) for {}", entry.value.len(), key);
        store.entries.insert(key, entry);
    }

    /// Drop a single entry; a missing key is a no-op
    pub async fn invalidate(&self, key: &str) -> bool {
        let mut store = self.store.lock().await;
        if store.entries.remove(key).is_some() {
            store.invalidations += 1;
            debug!("Cache invalidated: {}", key);
            true
        } else {
            false
        }
    }

    /// Clear all entries from the cache
    pub async fn clear(&self) {
        let mut store = self.store.lock().await;
        let count = store.entries.len();
        store.entries.clear();
        store.invalidations += count as u64;
        info!("Cleared {} entries from cache", count);
    }

    /// Remove every entry that has outlived the TTL, returning their keys
    pub async fn purge_expired(&self) -> Vec<CacheKey> {
        let now = self.clock.now();
        let ttl = self.config.ttl;
        let mut store = self.store.lock().await;

        let expired: Vec<CacheKey> = store
            .entries
            .values()
            .filter(|entry| entry.is_expired(now, ttl))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired {
            store.entries.remove(key);
        }
        store.expirations += expired.len() as u64;

        if !expired.is_empty() {
            debug!("Purged {} expired entries", expired.len());
        }
        expired
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.lock().await;
        CacheStats {
            entries: store.entries.len(),
            ttl: self.config.ttl,
            hits: store.hits,
            misses: store.misses,
            expirations: store.expirations,
            invalidations: store.invalidations,
        }
    }

    /// Number of physically held entries
    pub async fn len(&self) -> usize {
        self.store.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn cache_with_clock(ttl_secs: u64) -> (TtlCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let config = CacheConfig::builder().ttl_secs(ttl_secs).build();
        let cache = TtlCache::new(config, clock.clone()).unwrap();
        (cache, clock)
    }

    fn docs(items: &[&str]) -> CacheValue {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (cache, _clock) = cache_with_clock(60);

        cache.set("u1", docs(&["a", "b"])).await;
        assert_eq!(cache.get("u1").await, Some(docs(&["a", "b"])));

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let (cache, _clock) = cache_with_clock(60);
        assert_eq!(cache.get("nonexistent").await, None);
        assert_eq!(cache.stats().await.misses, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiration_evicts_lazily() {
        let (cache, clock) = cache_with_clock(60);
        cache.set("u1", docs(&["a"])).await;

        clock.advance(Duration::from_secs(59));
        assert!(cache.get("u1").await.is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("u1").await.is_none());
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.stats().await.expirations, 1);
    }

    #[tokio::test]
    async fn test_stale_entry_stays_until_accessed() {
        let (cache, clock) = cache_with_clock(10);
        cache.set("u1", docs(&["a"])).await;

        clock.advance(Duration::from_secs(30));
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.stats().await.entries, 1);
    }

    #[tokio::test]
    async fn test_set_resets_timestamp() {
        let (cache, clock) = cache_with_clock(10);
        cache.set("u1", docs(&["old"])).await;

        clock.advance(Duration::from_secs(8));
        cache.set("u1", docs(&["new"])).await;

        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get("u1").await, Some(docs(&["new"])));
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (cache, _clock) = cache_with_clock(60);
        cache.set("u1", docs(&["a"])).await;

        assert!(cache.invalidate("u1").await);
        assert!(cache.get("u1").await.is_none());
        assert!(!cache.invalidate("u1").await);
    }

    #[tokio::test]
    async fn test_clear() {
        let (cache, _clock) = cache_with_clock(60);
        cache.set("u1", docs(&["a"])).await;
        cache.set("u2", docs(&["b"])).await;

        cache.clear().await;

        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().await.invalidations, 2);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (cache, clock) = cache_with_clock(10);
        cache.set("old", docs(&["a"])).await;
        clock.advance(Duration::from_secs(6));
        cache.set("fresh", docs(&["b"])).await;
        clock.advance(Duration::from_secs(5));

        let purged = cache.purge_expired().await;
        assert_eq!(purged, vec!["old".to_string()]);
        assert_eq!(cache.len().await, 1);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = CacheConfig::builder().ttl(Duration::ZERO).build();
        assert!(matches!(
            TtlCache::with_system_clock(config),
            Err(CoreError::ConfigError(_))
        ));
    }
}
