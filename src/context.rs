// Process-wide context.
// Created once at startup and handed explicitly to the page layer and the TUI.

use std::sync::Arc;

use tracing::debug;

use crate::breakdown::LocBreakdown;
use crate::cache::{Clock, FileStore, KvStore, LocCache, SystemClock};
use crate::client::LocClient;
use crate::config::Config;
use crate::error::Result;
use crate::locator::{CacheKey, RepositoryLocator};

/// Configuration, cache and client shared by everything that shows LOC data.
pub struct AppContext {
    pub config: Config,
    client: LocClient,
}

impl AppContext {
    /// Build the context with a filesystem store under the configured cache directory.
    pub fn init(config: Config) -> Result<Arc<Self>> {
        let dir = config.cache_dir()?;
        debug!(cache_dir = %dir.display(), "Initializing context");
        Self::with_store(config, Box::new(FileStore::new(dir)), Box::new(SystemClock))
    }

    /// Build the context over an arbitrary store and clock.
    pub fn with_store(
        config: Config,
        store: Box<dyn KvStore>,
        clock: Box<dyn Clock>,
    ) -> Result<Arc<Self>> {
        let cache = Arc::new(LocCache::with_clock(store, clock, config.cache_ttl()));
        let client = LocClient::new(&config, cache)?;
        Ok(Arc::new(Self { config, client }))
    }

    pub fn client(&self) -> &LocClient {
        &self.client
    }

    pub fn cache(&self) -> &LocCache {
        self.client.cache()
    }

    /// Breakdown for `key`, from the cache when fresh.
    pub async fn locs(&self, key: &CacheKey) -> Result<LocBreakdown> {
        self.client.get_or_fetch(key).await
    }

    /// Link to the companion statistics page for `locator`.
    pub fn stats_link(&self, locator: &RepositoryLocator) -> Result<String> {
        crate::page::stats_link(&self.config.stats_url, locator)
    }
}
