//! Personalization document types

use serde::{Deserialize, Serialize};

/// One piece of personal context owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub owner_id: String,
    pub doc_id: String,
}

impl UserDocument {
    pub fn new(
        owner_id: impl Into<String>,
        doc_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                owner_id: owner_id.into(),
                doc_id: doc_id.into(),
            },
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.metadata.doc_id
    }

    pub fn owner_id(&self) -> &str {
        &self.metadata.owner_id
    }
}

/// Aggregate counts across every owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub owners: usize,
    pub documents: usize,
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}
