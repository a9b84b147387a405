//! Index builder for the per-platform lyric metadata files.
//!
//! Each platform is a pure function of its index file: records in, entries out,
//! in file order. Platforms are independent, so a rebuild loads them in parallel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use super::layout::PlatformLayout;
use super::store::IndexSnapshot;
use crate::models::IndexEntry;
use crate::parsers::parse_index_file;

/// One platform's entries plus the directory its lyric files are served from
#[derive(Debug, Clone, Default)]
pub struct PlatformIndex {
    pub name: String,
    pub entries: Vec<IndexEntry>,
    /// `None` when the platform had no readable index file
    pub source_dir: Option<PathBuf>,
}

impl PlatformIndex {
    pub fn empty(name: &str) -> Self {
        Self { name: name.to_string(), entries: Vec::new(), source_dir: None }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose search blob contains `query` (already normalized), in index order
    pub fn matching<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a IndexEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.matches(query))
    }
}

/// Load one platform from `root/index_file`.
///
/// A missing or unreadable file yields an empty index without a source directory.
pub fn build_platform_index(root: &Path, name: &str, index_file: &Path) -> PlatformIndex {
    let path = root.join(index_file);
    if !path.is_file() {
        tracing::debug!("No index for platform {} at {}", name, path.display());
        return PlatformIndex::empty(name);
    }

    match parse_index_file(&path) {
        Ok(parsed) => PlatformIndex {
            name: name.to_string(),
            entries: parsed.entries,
            source_dir: path.parent().map(Path::to_path_buf),
        },
        Err(e) => {
            tracing::warn!("Failed to load index for platform {}: {:#}", name, e);
            PlatformIndex::empty(name)
        }
    }
}

/// Build a complete, unpublished snapshot of every platform in `layout`
pub fn build_snapshot(root: &Path, layout: &PlatformLayout) -> IndexSnapshot {
    let platforms: HashMap<String, Arc<PlatformIndex>> = layout
        .entries()
        .par_iter()
        .map(|(name, index_file)| {
            (name.clone(), Arc::new(build_platform_index(root, name, index_file)))
        })
        .collect();

    let snapshot = IndexSnapshot::new(Some(root.to_path_buf()), platforms);
    tracing::info!(
        "Indexed {} entries from {} ({} of {} platforms present)",
        snapshot.total_entries(),
        root.display(),
        snapshot.platforms().filter(|p| p.source_dir.is_some()).count(),
        layout.len()
    );
    snapshot
}
