//! The published index: one immutable snapshot behind a swappable reference.
//!
//! Readers clone the `Arc` under a read lock and release it immediately, so long
//! scans never hold the lock. A reload builds a fresh [`IndexSnapshot`] elsewhere
//! and [`IndexStore::publish`] replaces the reference in one step. Old snapshots
//! are dropped once the last in-flight search lets go of them.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::builder::PlatformIndex;

/// One generation of the full index
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    root: Option<PathBuf>,
    platforms: HashMap<String, Arc<PlatformIndex>>,
    updated_at: Option<DateTime<Utc>>,
    generation: u64,
}

impl IndexSnapshot {
    pub fn new(root: Option<PathBuf>, platforms: HashMap<String, Arc<PlatformIndex>>) -> Self {
        Self { root, platforms, updated_at: None, generation: 0 }
    }

    /// Dataset root the snapshot was built from
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn platform(&self, name: &str) -> Option<&Arc<PlatformIndex>> {
        self.platforms.get(name)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Arc<PlatformIndex>> {
        self.platforms.values()
    }

    pub fn source_dir(&self, name: &str) -> Option<&Path> {
        self.platforms.get(name).and_then(|p| p.source_dir.as_deref())
    }

    pub fn total_entries(&self) -> usize {
        self.platforms.values().map(|p| p.len()).sum()
    }

    pub fn platform_counts(&self) -> BTreeMap<String, usize> {
        self.platforms.iter().map(|(name, p)| (name.clone(), p.len())).collect()
    }

    /// Time of publication; `None` for a snapshot that was never published
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Starts at 0 (nothing loaded) and increases by one per publish
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct IndexStore {
    current: RwLock<Arc<IndexSnapshot>>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently published generation
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.current.read().clone()
    }

    pub fn platform(&self, name: &str) -> Option<Arc<PlatformIndex>> {
        self.snapshot().platform(name).cloned()
    }

    pub fn source_dir(&self, name: &str) -> Option<PathBuf> {
        self.snapshot().source_dir(name).map(Path::to_path_buf)
    }

    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        self.snapshot().updated_at()
    }

    pub fn total_entries(&self) -> usize {
        self.snapshot().total_entries()
    }

    pub fn platform_counts(&self) -> BTreeMap<String, usize> {
        self.snapshot().platform_counts()
    }

    /// Stamp `snapshot` with the next generation and the current time, then make it
    /// the published one.
    pub fn publish(&self, mut snapshot: IndexSnapshot) -> Arc<IndexSnapshot> {
        snapshot.updated_at = Some(Utc::now());

        let mut current = self.current.write();
        snapshot.generation = current.generation + 1;
        let published = Arc::new(snapshot);
        *current = published.clone();
        published
    }
}
