//! Per-owner document store
//!
//! Each owner's documents persist as one record. Reads favor availability:
//! unreadable or malformed records are logged and treated as empty.

use crate::error::{CoreError, Result};
use crate::store::{
    backend::{FsBackend, StorageBackend},
    document::{StoreStats, UpsertOutcome, UserDocument},
    record::{self, Decoded, DocumentRecord},
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub struct DocumentStore {
    backend: Arc<dyn StorageBackend>,
    owner_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocumentStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            owner_locks: Mutex::new(HashMap::new()),
        }
    }

    /// File-backed store rooted at `base_dir`
    pub fn open(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        info!("Opening document store at {:?}", base_dir);
        Self::new(Arc::new(FsBackend::new(base_dir)))
    }

    /// Whether the owner has a persisted document set
    pub fn exists(&self, owner: &str) -> bool {
        self.backend.exists(owner)
    }

    /// Start a new set holding one base document whose id is the owner id
    pub fn create(&self, owner: &str, content: &str) -> Result<UserDocument> {
        self.with_owner(owner, || {
            if self.backend.exists(owner) {
                warn!("Document set already exists for {}", owner);
                return Err(CoreError::AlreadyExists {
                    owner: owner.to_string(),
                });
            }

            let doc = UserDocument::new(owner, owner, content);
            self.save(owner, vec![doc.clone()])?;
            info!("Created document set for {}", owner);
            Ok(doc)
        })
    }

    /// Insert or replace the document with `doc_id`, creating the set if needed
    pub fn upsert(&self, owner: &str, content: &str, doc_id: &str) -> Result<UpsertOutcome> {
        self.with_owner(owner, || {
            // A corrupt record is replaced rather than blocking new writes
            let mut documents = self.load_or_empty(owner);
            let doc = UserDocument::new(owner, doc_id, content);

            let outcome = match documents.iter().position(|d| d.doc_id() == doc_id) {
                Some(idx) => {
                    documents[idx] = doc;
                    UpsertOutcome::Replaced
                }
                None => {
                    documents.push(doc);
                    UpsertOutcome::Inserted
                }
            };

            self.save(owner, documents)?;
            debug!("Upserted doc {} for {} ({:?})", doc_id, owner, outcome);
            Ok(outcome)
        })
    }

    /// Remove the document with `doc_id`; returns whether anything was removed
    pub fn delete(&self, owner: &str, doc_id: &str) -> Result<bool> {
        self.with_owner(owner, || {
            let mut documents = match self.load(owner) {
                Ok(Some(decoded)) => decoded.documents,
                Ok(None) => return Ok(false),
                Err(e) => {
                    // Rewriting here would silently drop the unreadable record
                    warn!("Skipping delete of {} for {}: {}", doc_id, owner, e);
                    return Ok(false);
                }
            };

            let before = documents.len();
            documents.retain(|d| d.doc_id() != doc_id);
            if documents.len() == before {
                return Ok(false);
            }

            self.save(owner, documents)?;
            debug!("Deleted doc {} for {}", doc_id, owner);
            Ok(true)
        })
    }

    /// Remove the owner's whole document set
    pub fn delete_owner(&self, owner: &str) -> Result<()> {
        self.with_owner(owner, || {
            if !self.backend.remove(owner)? {
                return Err(CoreError::NotFound {
                    owner: owner.to_string(),
                });
            }
            info!("Deleted document set for {}", owner);
            Ok(())
        })
    }

    /// All documents for the owner in insertion order, empty if unknown
    pub fn list(&self, owner: &str) -> Vec<UserDocument> {
        self.with_owner(owner, || match self.load(owner) {
            Ok(Some(decoded)) => {
                if decoded.needs_rewrite {
                    self.migrate(owner, &decoded);
                }
                decoded.documents
            }
            Ok(None) => vec![],
            Err(e) => {
                warn!("Treating document set for {} as empty: {}", owner, e);
                vec![]
            }
        })
    }

    /// Owner ids with a persisted set, sorted
    pub fn list_owners(&self) -> Vec<String> {
        match self.backend.keys() {
            Ok(mut owners) => {
                owners.sort();
                owners
            }
            Err(e) => {
                warn!("Failed to enumerate owners: {}", e);
                vec![]
            }
        }
    }

    pub fn stats(&self) -> StoreStats {
        let owners = self.list_owners();
        let documents = owners.iter().map(|owner| self.list(owner).len()).sum();
        StoreStats {
            owners: owners.len(),
            documents,
        }
    }

    fn load(&self, owner: &str) -> Result<Option<Decoded>> {
        match self.backend.read(owner)? {
            Some(bytes) => record::decode(owner, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn load_or_empty(&self, owner: &str) -> Vec<UserDocument> {
        match self.load(owner) {
            Ok(Some(decoded)) => decoded.documents,
            Ok(None) => vec![],
            Err(e) => {
                warn!("Recreating document set for {}: {}", owner, e);
                vec![]
            }
        }
    }

    fn migrate(&self, owner: &str, decoded: &Decoded) {
        match self.save(owner, decoded.documents.clone()) {
            Ok(()) => info!(
                "Migrated document set for {} to version {}",
                owner,
                record::CURRENT_VERSION
            ),
            Err(e) => warn!("Failed to migrate document set for {}: {}", owner, e),
        }
    }

    fn save(&self, owner: &str, documents: Vec<UserDocument>) -> Result<()> {
        let bytes = DocumentRecord::new(owner, documents).encode()?;
        self.backend.write(owner, &bytes)?;
        Ok(())
    }

    /// Run `op` while holding the owner's lock. The map entry is dropped once
    /// no other caller holds or waits on it.
    fn with_owner<T>(&self, owner: &str, op: impl FnOnce() -> T) -> T {
        let lock = self
            .locks()
            .entry(owner.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock_ignoring_poison(&lock);
            op()
        };

        // Clones are only handed out under the map lock, so a count of two
        // (map + ours) means nobody else is waiting on this owner
        let mut locks = self.locks();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(owner);
        }
        result
    }

    fn locks(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        self.owner_locks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn lock_ignoring_poison(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backend::MemoryBackend;

    fn memory_store() -> (DocumentStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        (DocumentStore::new(backend.clone()), backend)
    }

    #[test]
    fn test_upsert_is_idempotent_per_doc_id() {
        let (store, _) = memory_store();

        assert_eq!(store.upsert("u1", "A", "id1").unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert("u1", "B", "id1").unwrap(), UpsertOutcome::Replaced);

        let docs = store.list("u1");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "B");
        assert_eq!(docs[0].doc_id(), "id1");
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (store, _) = memory_store();
        assert!(!store.delete("nobody", "id1").unwrap());

        store.upsert("u1", "X", "id1").unwrap();
        assert!(!store.delete("u1", "other").unwrap());
        assert_eq!(store.list("u1").len(), 1);
    }

    #[test]
    fn test_corrupt_record_reads_as_empty() {
        let (store, backend) = memory_store();
        backend.write("u1", b"{\"version\": 1, \"own").unwrap();

        assert!(store.list("u1").is_empty());
        // Delete must not overwrite what it cannot read
        assert!(!store.delete("u1", "id1").unwrap());
        assert_eq!(
            backend.read("u1").unwrap().unwrap(),
            b"{\"version\": 1, \"own".to_vec()
        );
    }

    #[test]
    fn test_upsert_replaces_corrupt_record() {
        let (store, backend) = memory_store();
        backend.write("u1", b"garbage").unwrap();

        store.upsert("u1", "fresh", "p1").unwrap();
        let docs = store.list("u1");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "fresh");
    }

    #[test]
    fn test_legacy_record_migrated_on_read() {
        let (store, backend) = memory_store();
        backend
            .write(
                "u1",
                br#"[{"page_content": "base", "metadata": {"user_id": "u1", "doc_id": "u1"}}]"#,
            )
            .unwrap();

        let docs = store.list("u1");
        assert_eq!(docs.len(), 1);

        let rewritten = backend.read("u1").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&rewritten).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["documents"][0]["content"], "base");
    }

    #[test]
    fn test_delete_owner_unknown_is_not_found() {
        let (store, _) = memory_store();
        assert!(matches!(
            store.delete_owner("ghost"),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_owner_locks_released_after_use() {
        let (store, _) = memory_store();
        for i in 0..1_000 {
            assert!(store.list(&format!("stranger-{i}")).is_empty());
        }
        assert_eq!(store.locks().len(), 0);

        store.upsert("u1", "X", "id1").unwrap();
        assert!(!store.delete("u1", "missing").unwrap());
        store.delete_owner("u1").unwrap();
        assert!(store.delete_owner("u1").is_err());
        assert_eq!(store.locks().len(), 0);
    }

    #[test]
    fn test_owner_locks_released_after_contention() {
        let (store, _) = memory_store();
        let store = Arc::new(store);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.upsert("shared", "X", &format!("id{i}")).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list("shared").len(), 8);
        assert_eq!(store.locks().len(), 0);
    }

    #[test]
    fn test_stats() {
        let (store, _) = memory_store();
        store.create("u1", "base").unwrap();
        store.upsert("u1", "plan", "p1").unwrap();
        store.create("u2", "base").unwrap();

        assert_eq!(store.list_owners(), vec!["u1".to_string(), "u2".to_string()]);
        assert_eq!(
            store.stats(),
            StoreStats {
                owners: 2,
                documents: 3
            }
        );
    }
}
