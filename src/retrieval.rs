//! Retrieval facade for personal context
//!
//! Remote lookups go through the TTL cache first; on a miss the remote
//! fetcher is called and its result repopulates the cache. The facade sets
//! no timeout of its own: callers that need one wrap the returned future.

use crate::cache::{CacheValue, TtlCache};
use crate::error::Result;
use crate::ranker;
use crate::store::{DocumentStore, UserDocument};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Authoritative source of an owner's personal documents
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch the owner's documents as rendered text, in source order
    async fn fetch_documents(&self, owner: &str) -> Result<Vec<String>>;
}

/// Phrases that mark a question as being about the user, their partner or
/// their plans
const PERSONAL_KEYWORDS: &[&str] = &[
    // the user
    "tôi", "mình", "em", "của tôi", "của mình", "của em",
    "sinh nhật", "ngày sinh", "tuổi", "bao nhiêu tuổi",
    "tên tôi", "tên mình", "tên em",
    // partner
    "người yêu", "bạn trai", "bạn gái", "ny", "crush",
    "của anh ấy", "của cô ấy", "của bạn ấy",
    // relationship
    "hẹn hò", "yêu nhau", "bắt đầu yêu", "kỷ niệm",
    "chúng tôi", "hai đứa", "hai người", "cả hai",
    // plans
    "kế hoạch của tôi", "kế hoạch của mình", "kế hoạch của em",
    "kế hoạch chúng tôi", "định làm gì", "sắp đi đâu",
    "dự định", "có kế hoạch nào",
];

const PERSONAL_CONTEXT_HEADER: &str = "THÔNG TIN CÁ NHÂN CỦA NGƯỜI DÙNG:";

/// Whether a chat message asks about personal data worth fetching
pub fn is_personal_question(message: &str) -> bool {
    let message = message.to_lowercase();
    PERSONAL_KEYWORDS.iter().any(|kw| message.contains(*kw))
}

/// Render documents as a bulleted block for prompt assembly
pub fn format_personal_context(documents: &[String]) -> String {
    if documents.is_empty() {
        return String::new();
    }

    let mut out = String::from(PERSONAL_CONTEXT_HEADER);
    for doc in documents {
        out.push_str("\n- ");
        out.push_str(doc);
    }
    out
}

pub struct RetrievalFacade {
    cache: Arc<TtlCache>,
    fetcher: Arc<dyn RemoteFetcher>,
    store: Arc<DocumentStore>,
}

impl RetrievalFacade {
    pub fn new(
        cache: Arc<TtlCache>,
        fetcher: Arc<dyn RemoteFetcher>,
        store: Arc<DocumentStore>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            store,
        }
    }

    /// Read-through lookup of the owner's remote documents
    ///
    /// A fetch error is returned as-is and leaves the cache untouched.
    pub async fn personal_context(&self, owner: &str) -> Result<CacheValue> {
        if let Some(docs) = self.cache.get(owner).await {
            return Ok(docs);
        }

        self.fetch_and_cache(owner).await
    }

    /// Bypass the cache, fetch fresh documents and repopulate it
    pub async fn refresh(&self, owner: &str) -> Result<CacheValue> {
        debug!("Forcing remote refresh for {}", owner);
        self.fetch_and_cache(owner).await
    }

    /// Drop the cached entry after the remote source changed
    pub async fn invalidate(&self, owner: &str) -> bool {
        self.cache.invalidate(owner).await
    }

    /// Ranked local documents for the secondary personalization path
    pub fn local_context(&self, owner: &str, query: &str, k: usize) -> Vec<UserDocument> {
        ranker::rank(&self.store, owner, query, k)
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    async fn fetch_and_cache(&self, owner: &str) -> Result<CacheValue> {
        let docs = self.fetcher.fetch_documents(owner).await?;
        info!("Fetched {} remote document(s) for {}", docs.len(), owner);
        self.cache.set(owner, docs.clone()).await;
        Ok(docs)
    }
}
