//! # Document Store
//!
//! Small per-owner document sets used as local personalization data when
//! the remote document database is unavailable or not configured.

pub mod backend;
pub mod document;
pub mod record;
pub mod user_store;

pub use backend::{FsBackend, MemoryBackend, StorageBackend};
pub use document::{DocumentMetadata, StoreStats, UpsertOutcome, UserDocument};
pub use record::{DocumentRecord, CURRENT_VERSION};
pub use user_store::DocumentStore;
