//! Process-wide context object
//!
//! Built once at startup and shared by handle. Nothing here owns external
//! resources, so there is no teardown.

use crate::cache::TtlCache;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::error::Result;
use crate::retrieval::{RemoteFetcher, RetrievalFacade};
use crate::rotator::CredentialRotator;
use crate::store::DocumentStore;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct CoreContext {
    pub cache: Arc<TtlCache>,
    pub rotator: Arc<CredentialRotator>,
    pub store: Arc<DocumentStore>,
}

impl CoreContext {
    pub fn new(cache: TtlCache, rotator: CredentialRotator, store: DocumentStore) -> Self {
        Self {
            cache: Arc::new(cache),
            rotator: Arc::new(rotator),
            store: Arc::new(store),
        }
    }

    /// Build every component from configuration using the system clock.
    /// Fails with `ConfigError` when no credentials are configured.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let rotator = CredentialRotator::new(
            config.credentials.clone(),
            config.rotator.clone(),
            clock.clone(),
        )?;
        let cache = TtlCache::new(config.cache.clone(), clock)?;
        let store = DocumentStore::open(&config.user_data_dir);

        info!(
            "Core context ready ({} credential(s), cache ttl {:?}, data dir {:?})",
            rotator.pool_size(),
            cache.ttl(),
            config.user_data_dir
        );

        Ok(Self::new(cache, rotator, store))
    }

    /// Retrieval facade over this context's cache and store
    pub fn retrieval(&self, fetcher: Arc<dyn RemoteFetcher>) -> RetrievalFacade {
        RetrievalFacade::new(self.cache.clone(), fetcher, self.store.clone())
    }
}
