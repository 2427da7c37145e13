//! Core type definitions for the cache

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache key type - the owner (entity) identifier
pub type CacheKey = String;

/// Cache value type - ordered text documents fetched for the owner
pub type CacheValue = Vec<String>;

/// Snapshot of cache state and counters
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries physically held, including not-yet-observed stale ones
    pub entries: usize,

    /// Configured time-to-live
    pub ttl: Duration,

    /// Total number of cache hits
    pub hits: u64,

    /// Total number of cache misses (including expired reads)
    pub misses: u64,

    /// Entries dropped because they outlived the TTL
    pub expirations: u64,

    /// Entries removed by `invalidate` or `clear`
    pub invalidations: u64,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ entries: {}, ttl: {}s, hits: {}, misses: {}, hit_rate: {:.2}%, expirations: {} }}",
            self.entries,
            self.ttl.as_secs(),
            self.hits,
            self.misses,
            self.hit_rate(),
            self.expirations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 80.0);
    }

    #[test]
    fn test_cache_stats_zero_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_cache_stats_display() {
        let stats = CacheStats {
            entries: 3,
            ttl: Duration::from_secs(300),
            hits: 10,
            misses: 5,
            expirations: 1,
            invalidations: 0,
        };

        let display = format!("{}", stats);
        assert!(display.contains("entries: 3"));
        assert!(display.contains("ttl: 300s"));
    }
}
