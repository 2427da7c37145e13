//! Error types for the admission and caching core
//!
//! Cache and rotator operations have no external I/O and never fail once
//! constructed. Document store read paths swallow storage and corruption
//! errors; only write paths surface [`CoreError::Storage`].

use thiserror::Error;

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid or missing configuration, fatal at startup
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// `create` called for an owner that already has a document set
    #[error("Document set already exists for owner: {owner}")]
    AlreadyExists { owner: String },

    /// Administrative operation on an owner with no document set
    #[error("No document set found for owner: {owner}")]
    NotFound { owner: String },

    /// Persisted record could not be decoded
    #[error("Corrupt record for owner {owner}: {reason}")]
    Corruption { owner: String, reason: String },

    /// Durable storage failure on a write path
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Remote fetch collaborator failed
    #[error("Remote fetch failed: {0}")]
    Fetch(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
