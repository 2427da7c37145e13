//! Versioned on-disk record for one owner's document set
//!
//! Version 1 is a JSON object tagged with `"version": 1`. Records written
//! before versioning are a bare JSON array of
//! `{"page_content", "metadata": {"user_id", "doc_id"}}` objects and are
//! treated as version 0.

use crate::error::{CoreError, Result};
use crate::store::document::UserDocument;
use serde::{Deserialize, Serialize};

pub const CURRENT_VERSION: u32 = 1;

/// Current persisted shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub version: u32,
    pub owner: String,
    pub documents: Vec<UserDocument>,
}

impl DocumentRecord {
    pub fn new(owner: impl Into<String>, documents: Vec<UserDocument>) -> Self {
        Self {
            version: CURRENT_VERSION,
            owner: owner.into(),
            documents,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[derive(Debug, Deserialize)]
struct LegacyDocument {
    page_content: String,
    #[serde(default)]
    metadata: LegacyMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyMetadata {
    user_id: Option<String>,
    doc_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShape {
    Versioned(DocumentRecord),
    Legacy(Vec<LegacyDocument>),
}

/// Documents read back from storage
#[derive(Debug)]
pub struct Decoded {
    pub documents: Vec<UserDocument>,
    /// True when the bytes were in an older shape and should be rewritten
    pub needs_rewrite: bool,
}

/// Decode a persisted record, upgrading older versions in memory
pub fn decode(owner: &str, bytes: &[u8]) -> Result<Decoded> {
    let shape: StoredShape = serde_json::from_slice(bytes).map_err(|e| CoreError::Corruption {
        owner: owner.to_string(),
        reason: e.to_string(),
    })?;

    match shape {
        StoredShape::Versioned(record) => match record.version {
            CURRENT_VERSION => Ok(Decoded {
                documents: record.documents,
                needs_rewrite: false,
            }),
            other => Err(CoreError::Corruption {
                owner: owner.to_string(),
                reason: format!("unsupported record version {}", other),
            }),
        },
        StoredShape::Legacy(documents) => Ok(Decoded {
            documents: documents
                .into_iter()
                .map(|doc| upgrade_legacy(owner, doc))
                .collect(),
            needs_rewrite: true,
        }),
    }
}

fn upgrade_legacy(owner: &str, doc: LegacyDocument) -> UserDocument {
    let owner_id = doc.metadata.user_id.unwrap_or_else(|| owner.to_string());
    // Sets created before doc ids existed used the owner id for the base document
    let doc_id = doc.metadata.doc_id.unwrap_or_else(|| owner_id.clone());
    UserDocument::new(owner_id, doc_id, doc.page_content)
}
