use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::provider::{DatasetProvider, SyncStatus};
use crate::cache::QueryCache;
use crate::error::ServiceError;
use crate::indexer::{IndexStore, PlatformLayout, build_snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTrigger {
    /// Always rebuilds, whatever the sync reports
    Startup,
    Periodic,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    Idle,
    Syncing,
    Rebuilding,
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Published { generation: u64, total_entries: usize },
    UpToDate,
    /// Nothing was published; the previous snapshot is still served
    Failed(String),
}

impl ReloadOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ReloadOutcome::Published { .. })
    }
}

/// Rebuilds and republishes the index when the dataset changes.
pub struct ReloadCoordinator {
    provider: Arc<dyn DatasetProvider>,
    store: Arc<IndexStore>,
    cache: Arc<QueryCache>,
    layout: PlatformLayout,
    state: Mutex<ReloadState>,
    // One reload at a time; searches never take this
    reload_lock: tokio::sync::Mutex<()>,
}

impl ReloadCoordinator {
    pub fn new(
        provider: Arc<dyn DatasetProvider>,
        store: Arc<IndexStore>,
        cache: Arc<QueryCache>,
        layout: PlatformLayout,
    ) -> Self {
        Self {
            provider,
            store,
            cache,
            layout,
            state: Mutex::new(ReloadState::Idle),
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> ReloadState {
        *self.state.lock()
    }

    pub fn sync_enabled(&self) -> bool {
        self.provider.sync_enabled()
    }

    /// Handle an explicit reload request
    pub async fn trigger(&self) -> Result<ReloadOutcome, ServiceError> {
        if !self.provider.sync_enabled() {
            return Err(ServiceError::SyncDisabled);
        }
        Ok(self.reload(ReloadTrigger::Manual).await)
    }

    /// Run one sync/rebuild/publish pass.
    ///
    /// Idle → Syncing → (Rebuilding → Published) → Idle. An unchanged dataset stops
    /// after syncing and touches neither the store nor the cache.
    pub async fn reload(&self, trigger: ReloadTrigger) -> ReloadOutcome {
        let _guard = self.reload_lock.lock().await;
        let outcome = self.run_reload(trigger).await;
        self.set_state(ReloadState::Idle);
        outcome
    }

    async fn run_reload(&self, trigger: ReloadTrigger) -> ReloadOutcome {
        self.set_state(ReloadState::Syncing);

        let provider = self.provider.clone();
        let synced = tokio::task::spawn_blocking(move || provider.sync())
            .await
            .map_err(|e| anyhow!("Sync task failed: {}", e))
            .and_then(|result| result);

        let changed = match synced {
            Ok(status) => status == SyncStatus::Changed,
            Err(e) => {
                tracing::warn!("Dataset sync failed ({:?}): {:#}", trigger, e);
                if trigger != ReloadTrigger::Startup {
                    return ReloadOutcome::Failed(format!("{:#}", e));
                }
                false
            }
        };

        if !changed && trigger != ReloadTrigger::Startup {
            tracing::info!("Dataset already up to date");
            return ReloadOutcome::UpToDate;
        }

        self.set_state(ReloadState::Rebuilding);

        let provider = self.provider.clone();
        let layout = self.layout.clone();
        let built = tokio::task::spawn_blocking(move || {
            let root = provider
                .data_root()
                .ok_or_else(|| anyhow!("No valid data directory found"))?;
            Ok::<_, anyhow::Error>(build_snapshot(&root, &layout))
        })
        .await
        .map_err(|e| anyhow!("Rebuild task failed: {}", e))
        .and_then(|result| result);

        let snapshot = match built {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Index rebuild failed, keeping previous index: {:#}", e);
                return ReloadOutcome::Failed(format!("{:#}", e));
            }
        };

        let published = self.store.publish(snapshot);
        self.set_state(ReloadState::Published);
        self.cache.clear();

        tracing::info!(
            "Metadata reloaded. Root: {}, Total entries: {}, generation {}",
            published.root().map(|p| p.display().to_string()).unwrap_or_default(),
            published.total_entries(),
            published.generation()
        );

        ReloadOutcome::Published {
            generation: published.generation(),
            total_entries: published.total_entries(),
        }
    }

    /// Reload every `interval` until `shutdown` is cancelled. The first reload
    /// happens one full interval after the call.
    pub fn spawn_periodic(
        self: Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::debug!("Periodic reload loop stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.reload(ReloadTrigger::Periodic).await;
                    }
                }
            }
        })
    }

    fn set_state(&self, state: ReloadState) {
        *self.state.lock() = state;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::Result;
    use tempfile::TempDir;

    use super::*;
    use crate::cache::CacheKey;
    use crate::models::{Metadata, SearchResult};

    /// Provider that replays scripted sync results
    struct ScriptedProvider {
        root: Option<PathBuf>,
        script: parking_lot::Mutex<VecDeque<Result<SyncStatus>>>,
        syncs: AtomicUsize,
        enabled: bool,
    }

    impl ScriptedProvider {
        fn new(root: Option<&Path>, script: Vec<Result<SyncStatus>>) -> Arc<Self> {
            Arc::new(Self {
                root: root.map(Path::to_path_buf),
                script: parking_lot::Mutex::new(script.into()),
                syncs: AtomicUsize::new(0),
                enabled: true,
            })
        }
    }

    impl DatasetProvider for ScriptedProvider {
        fn sync(&self) -> Result<SyncStatus> {
            self.syncs.fetch_add(1, Ordering::SeqCst);
            self.script.lock().pop_front().unwrap_or(Ok(SyncStatus::Unchanged))
        }

        fn data_root(&self) -> Option<PathBuf> {
            self.root.clone()
        }

        fn sync_enabled(&self) -> bool {
            self.enabled
        }
    }

    fn dataset(lines: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("ncm-lyrics");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.jsonl"), lines).unwrap();
        temp
    }

    fn coordinator(provider: Arc<ScriptedProvider>) -> (ReloadCoordinator, Arc<IndexStore>, Arc<QueryCache>) {
        let store = Arc::new(IndexStore::new());
        let cache = Arc::new(QueryCache::new(Duration::from_secs(300), 1000));
        let coordinator =
            ReloadCoordinator::new(provider, store.clone(), cache.clone(), PlatformLayout::default());
        (coordinator, store, cache)
    }

    fn seed_cache(cache: &QueryCache) {
        cache.store(
            CacheKey::new("roy", &["ncm".to_string()]),
            1,
            vec![SearchResult {
                id: "1".to_string(),
                raw_lyric_file: "a.ttml".to_string(),
                metadata: Metadata::default(),
                platforms: vec!["ncm".to_string()],
            }],
        );
    }

    const ONE_RECORD: &str = r#"{"id":"1","rawLyricFile":"a.ttml","metadata":[]}"#;

    #[tokio::test]
    async fn test_startup_publishes_even_when_unchanged() {
        let data = dataset(ONE_RECORD);
        let provider = ScriptedProvider::new(Some(data.path()), vec![Ok(SyncStatus::Unchanged)]);
        let (coordinator, store, _) = coordinator(provider);

        let outcome = coordinator.reload(ReloadTrigger::Startup).await;
        assert_eq!(outcome, ReloadOutcome::Published { generation: 1, total_entries: 1 });
        assert_eq!(store.total_entries(), 1);
        assert_eq!(coordinator.state(), ReloadState::Idle);
    }

    #[tokio::test]
    async fn test_startup_rebuilds_after_sync_failure() {
        let data = dataset(ONE_RECORD);
        let provider = ScriptedProvider::new(Some(data.path()), vec![Err(anyhow!("network down"))]);
        let (coordinator, store, _) = coordinator(provider);

        let outcome = coordinator.reload(ReloadTrigger::Startup).await;
        assert!(outcome.changed());
        assert_eq!(store.total_entries(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_leaves_everything_untouched() {
        let data = dataset(ONE_RECORD);
        let provider = ScriptedProvider::new(
            Some(data.path()),
            vec![Ok(SyncStatus::Changed), Ok(SyncStatus::Unchanged)],
        );
        let (coordinator, store, cache) = coordinator(provider);
        coordinator.reload(ReloadTrigger::Startup).await;
        seed_cache(&cache);

        let before = store.snapshot();
        let outcome = coordinator.reload(ReloadTrigger::Periodic).await;

        assert_eq!(outcome, ReloadOutcome::UpToDate);
        let after = store.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(before.updated_at(), after.updated_at());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_changed_republishes_and_clears_cache() {
        let data = dataset(ONE_RECORD);
        let provider = ScriptedProvider::new(
            Some(data.path()),
            vec![Ok(SyncStatus::Unchanged), Ok(SyncStatus::Changed)],
        );
        let (coordinator, store, cache) = coordinator(provider);
        coordinator.reload(ReloadTrigger::Startup).await;
        seed_cache(&cache);

        fs::write(
            data.path().join("ncm-lyrics/index.jsonl"),
            format!("{}\n{}", ONE_RECORD, r#"{"id":"2","rawLyricFile":"b.ttml","metadata":[]}"#),
        )
        .unwrap();

        let outcome = coordinator.reload(ReloadTrigger::Manual).await;
        assert_eq!(outcome, ReloadOutcome::Published { generation: 2, total_entries: 2 });
        assert_eq!(store.total_entries(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_previous_index() {
        let data = dataset(ONE_RECORD);
        let provider = ScriptedProvider::new(
            Some(data.path()),
            vec![Ok(SyncStatus::Changed), Err(anyhow!("git pull failed"))],
        );
        let (coordinator, store, cache) = coordinator(provider);
        coordinator.reload(ReloadTrigger::Startup).await;
        seed_cache(&cache);
        let before = store.snapshot();

        let outcome = coordinator.reload(ReloadTrigger::Periodic).await;
        assert!(matches!(outcome, ReloadOutcome::Failed(ref msg) if msg.contains("git pull failed")));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(cache.len(), 1);
        assert_eq!(coordinator.state(), ReloadState::Idle);
    }

    #[tokio::test]
    async fn test_missing_root_keeps_previous_index() {
        let provider = ScriptedProvider::new(None, vec![Ok(SyncStatus::Changed)]);
        let (coordinator, store, _) = coordinator(provider);

        let outcome = coordinator.reload(ReloadTrigger::Manual).await;
        assert!(matches!(outcome, ReloadOutcome::Failed(ref msg) if msg.contains("No valid data directory")));
        assert_eq!(store.snapshot().generation(), 0);
    }

    #[tokio::test]
    async fn test_trigger_refused_when_sync_disabled() {
        let provider = Arc::new(ScriptedProvider {
            root: None,
            script: parking_lot::Mutex::new(VecDeque::new()),
            syncs: AtomicUsize::new(0),
            enabled: false,
        });
        let (coordinator, _, _) = coordinator(provider.clone());

        let result = coordinator.trigger().await;
        assert!(matches!(result, Err(ServiceError::SyncDisabled)));
        assert_eq!(provider.syncs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_periodic_loop_runs_until_cancelled() {
        let data = dataset(ONE_RECORD);
        let provider = ScriptedProvider::new(Some(data.path()), Vec::new());
        let (coordinator, _, _) = coordinator(provider.clone());
        let coordinator = Arc::new(coordinator);

        let shutdown = CancellationToken::new();
        let handle = coordinator.spawn_periodic(Duration::from_millis(20), shutdown.clone());

        for _ in 0..200 {
            if provider.syncs.load(Ordering::SeqCst) >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        shutdown.cancel();
        handle.await.unwrap();

        let syncs = provider.syncs.load(Ordering::SeqCst);
        assert!(syncs >= 2, "expected at least two periodic syncs, got {}", syncs);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(provider.syncs.load(Ordering::SeqCst), syncs);
    }
}
