//! # chatbot-core
//!
//! Resource admission and caching core for a personalized chatbot backend.
//!
//! ## Components
//!
//! - [`rotator`]: rotates outbound generative-API calls across rate-limited
//!   credentials using a sliding 60 second window per credential
//! - [`cache`]: TTL cache shielding the slow, metered remote document store
//! - [`store`]: per-owner document sets persisted as versioned records
//! - [`ranker`]: keyword-weighted top-k selection over an owner's documents
//! - [`retrieval`]: read-through facade composing the cache with a remote
//!   fetcher, plus the local ranked path
//!
//! ## Example
//!
//! ```no_run
//! use chatbot_core::{AppConfig, CoreContext};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let ctx = CoreContext::from_config(&config)?;
//!
//!     let credential = ctx.rotator.acquire();
//!     println!("Next request uses {}", credential.name);
//!
//!     ctx.store.upsert("user-1", "Kế hoạch: Đi Đà Lạt 25/12", "plan_dalat")?;
//!     let hits = chatbot_core::ranker::rank(&ctx.store, "user-1", "đà lạt", 3);
//!     println!("{} relevant document(s)", hits.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod ranker;
pub mod retrieval;
pub mod rotator;
pub mod store;

// Re-export main types for convenience
pub use cache::{CacheConfig, CacheStats, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use context::CoreContext;
pub use error::{CoreError, Result};
pub use retrieval::{RemoteFetcher, RetrievalFacade};
pub use rotator::{Credential, CredentialRotator, CredentialStats, RotatorConfig};
pub use store::{DocumentStore, StoreStats, UpsertOutcome, UserDocument};
