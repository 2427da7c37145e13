//! Cache entry with creation timestamp

use crate::cache::types::{CacheKey, CacheValue};
use crate::clock::elapsed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached value stamped with its creation instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cache key
    pub key: CacheKey,

    /// The cached value
    pub value: CacheValue,

    /// When the entry was stored
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: CacheKey, value: CacheValue, created_at: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            created_at,
        }
    }

    /// Age of the entry at `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        elapsed(self.created_at, now)
    }

    /// An entry is expired once its age reaches the TTL
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(created_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(
            "u1".to_string(),
            vec!["doc".to_string()],
            created_at,
        )
    }

    #[test]
    fn test_entry_expiration_boundary() {
        let start = Utc::now();
        let entry = entry_at(start);
        let ttl = Duration::from_secs(10);

        assert!(!entry.is_expired(start, ttl));
        assert!(!entry.is_expired(start + chrono::Duration::seconds(9), ttl));
        // Elapsed == TTL counts as expired
        assert!(entry.is_expired(start + chrono::Duration::seconds(10), ttl));
    }

    #[test]
    fn test_age_never_negative() {
        let start = Utc::now();
        let entry = entry_at(start);
        assert_eq!(entry.age(start - chrono::Duration::seconds(3)), Duration::ZERO);
    }
}
