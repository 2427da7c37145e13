//! # TTL Cache
//!
//! Read-through cache for personal context fetched from the remote document
//! store. Losing the cache only costs latency: the remote store stays the
//! source of truth.
//!
//! ## Example
//!
//! ```rust
//! use chatbot_core::cache::{CacheConfig, TtlCache};
//! use std::time::Duration;
//!
//! # async fn example() -> chatbot_core::Result<()> {
//! let config = CacheConfig::builder()
//!     .ttl(Duration::from_secs(300))
//!     .build();
//!
//! let cache = TtlCache::with_system_clock(config)?;
//!
//! cache.set("user-1", vec!["Birthday: 25/12".to_string()]).await;
//!
//! if let Some(docs) = cache.get("user-1").await {
//!     println!("Cache hit: {} docs", docs.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod store;
pub mod types;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use entry::CacheEntry;
pub use store::TtlCache;
pub use types::{CacheKey, CacheStats, CacheValue};
