//! Keyword relevance ranking over an owner's documents
//!
//! A naive lexical scorer for low-volume personalization data: each
//! whitespace-separated query token contributes the number of times it
//! occurs (as a substring, case-insensitively) in the document content.

use crate::store::{DocumentStore, UserDocument};
use tracing::debug;

/// Score `content` against `query`
pub fn score(content: &str, query: &str) -> usize {
    let content = content.to_lowercase();
    let query = query.to_lowercase();
    score_lowered(&content, &query)
}

fn score_lowered(content: &str, query: &str) -> usize {
    query
        .split_whitespace()
        .map(|token| content.matches(token).count())
        .sum()
}

/// Top `k` documents by descending score; zero scores are dropped and ties
/// keep their original order
pub fn rank_documents(documents: Vec<UserDocument>, query: &str, k: usize) -> Vec<UserDocument> {
    let query = query.to_lowercase();

    let mut scored: Vec<(usize, UserDocument)> = documents
        .into_iter()
        .filter_map(|doc| {
            let s = score_lowered(&doc.content.to_lowercase(), &query);
            (s > 0).then_some((s, doc))
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(k);
    scored.into_iter().map(|(_, doc)| doc).collect()
}

/// Rank the owner's stored documents against `query`
pub fn rank(store: &DocumentStore, owner: &str, query: &str, k: usize) -> Vec<UserDocument> {
    let documents = store.list(owner);
    let total = documents.len();
    let ranked = rank_documents(documents, query, k);
    debug!(
        "Ranked {} of {} document(s) for {} (k = {})",
        ranked.len(),
        total,
        owner,
        k
    );
    ranked
}
