//! Transport-agnostic service operations.
//!
//! [`LyricService`] wires the index store, query cache, search engine, reload
//! coordinator and file store together and exposes the operations a transport
//! binds to: search, status, formats, download and update.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache::QueryCache;
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::files::{DEFAULT_FORMAT, FileStore, LocalFileStore, LyricFile, SUPPORTED_FORMATS};
use crate::indexer::IndexStore;
use crate::models::{ReloadReport, SearchResponse, StatusReport};
use crate::reload::{
    DatasetProvider, GitDatasetProvider, LocalDatasetProvider, ReloadCoordinator, ReloadOutcome,
    ReloadTrigger,
};
use crate::search::SearchEngine;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct LyricService {
    config: ServiceConfig,
    store: Arc<IndexStore>,
    cache: Arc<QueryCache>,
    engine: SearchEngine,
    coordinator: Arc<ReloadCoordinator>,
    files: Box<dyn FileStore>,
}

impl LyricService {
    /// Git-backed when sync is enabled, otherwise a fixed local directory
    pub fn new(config: ServiceConfig) -> Self {
        let provider: Arc<dyn DatasetProvider> = if config.sync_enabled {
            Arc::new(GitDatasetProvider::new(
                &config.repo_url,
                config.data_dir.clone(),
                config.layout.clone(),
            ))
        } else {
            Arc::new(LocalDatasetProvider::new(config.data_dir.clone(), config.layout.clone()))
        };
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: ServiceConfig, provider: Arc<dyn DatasetProvider>) -> Self {
        let store = Arc::new(IndexStore::new());
        let cache = Arc::new(QueryCache::new(config.cache_ttl, config.cache_capacity));
        let engine = SearchEngine::new(
            store.clone(),
            cache.clone(),
            config.layout.names(),
            config.search_timeout,
        );
        let coordinator = Arc::new(ReloadCoordinator::new(
            provider,
            store.clone(),
            cache.clone(),
            config.layout.clone(),
        ));
        let files = Box::new(LocalFileStore::new(store.clone()));

        Self { config, store, cache, engine, coordinator, files }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn coordinator(&self) -> &Arc<ReloadCoordinator> {
        &self.coordinator
    }

    /// Load the index once, then keep it fresh in the background if sync is enabled.
    ///
    /// Returns the periodic loop handle when one was started.
    pub async fn start(&self, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
        self.coordinator.reload(ReloadTrigger::Startup).await;

        if !self.coordinator.sync_enabled() {
            return None;
        }
        Some(self.coordinator.clone().spawn_periodic(self.config.sync_interval, shutdown))
    }

    pub async fn search(
        &self,
        query: &str,
        platforms: &[String],
    ) -> Result<SearchResponse, ServiceError> {
        let outcome = self.engine.search(query, platforms).await?;
        let results = outcome.results.as_ref().clone();
        Ok(SearchResponse {
            count: results.len(),
            results,
            served_from_cache: outcome.served_from_cache,
        })
    }

    pub fn status(&self) -> StatusReport {
        let snapshot = self.store.snapshot();
        StatusReport {
            status: "active".to_string(),
            last_update_time: snapshot.updated_at().map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            total_entries: snapshot.total_entries(),
            platform_stats: snapshot.platform_counts(),
            cache_size: self.cache.len(),
            repo_url: self.config.repo_url.clone(),
            data_root: snapshot.root().map(|p| p.display().to_string()),
        }
    }

    pub fn list_formats(&self) -> &'static [&'static str] {
        &SUPPORTED_FORMATS
    }

    /// `format` defaults to ttml when absent or blank
    pub fn download(
        &self,
        platform: &str,
        id: &str,
        format: Option<&str>,
    ) -> Result<LyricFile, ServiceError> {
        if !self.config.download_enabled {
            return Err(ServiceError::DownloadDisabled);
        }

        let format = format.map(str::trim).filter(|f| !f.is_empty()).unwrap_or(DEFAULT_FORMAT);
        self.files.open(platform, id, format)
    }

    pub async fn trigger_reload(&self) -> Result<ReloadReport, ServiceError> {
        let report = match self.coordinator.trigger().await? {
            ReloadOutcome::Published { .. } => ReloadReport {
                changed: true,
                message: "Update successful and metadata reloaded".to_string(),
            },
            ReloadOutcome::UpToDate => {
                ReloadReport { changed: false, message: "Already up to date".to_string() }
            }
            ReloadOutcome::Failed(reason) => {
                ReloadReport { changed: false, message: format!("Update failed: {}", reason) }
            }
        };
        Ok(report)
    }
}
