use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use parking_lot::Mutex;

use crate::indexer::PlatformLayout;

/// Marker git prints when a pull brought nothing new
const GIT_UP_TO_DATE: &str = "Already up to date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Changed,
    Unchanged,
}

/// Source of the on-disk dataset.
///
/// `sync` may block (network, subprocesses); callers run it off the async workers.
pub trait DatasetProvider: Send + Sync {
    /// Bring the local copy up to date and report whether anything changed
    fn sync(&self) -> Result<SyncStatus>;

    /// Readable dataset root, if one can be found
    fn data_root(&self) -> Option<PathBuf>;

    /// Whether syncing is possible at all; manual reload requests are refused otherwise
    fn sync_enabled(&self) -> bool {
        true
    }
}

/// A directory managed by someone else. It never reports changes.
#[derive(Debug, Clone)]
pub struct LocalDatasetProvider {
    preferred: PathBuf,
    layout: PlatformLayout,
}

impl LocalDatasetProvider {
    pub fn new(preferred: impl Into<PathBuf>, layout: PlatformLayout) -> Self {
        Self { preferred: preferred.into(), layout }
    }
}

impl DatasetProvider for LocalDatasetProvider {
    fn sync(&self) -> Result<SyncStatus> {
        Ok(SyncStatus::Unchanged)
    }

    fn data_root(&self) -> Option<PathBuf> {
        self.layout.find_data_root(&self.preferred)
    }

    fn sync_enabled(&self) -> bool {
        false
    }
}

/// A shallow git clone kept current with `git pull`
#[derive(Debug)]
pub struct GitDatasetProvider {
    repo_url: String,
    target_dir: PathBuf,
    layout: PlatformLayout,
    // Serializes git operations on the checkout
    git_lock: Mutex<()>,
}

impl GitDatasetProvider {
    pub fn new(repo_url: &str, target_dir: impl Into<PathBuf>, layout: PlatformLayout) -> Self {
        Self {
            repo_url: repo_url.to_string(),
            target_dir: target_dir.into(),
            layout,
            git_lock: Mutex::new(()),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    fn clone_repo(&self, target: &Path) -> Result<SyncStatus> {
        tracing::info!("Repository not found. Initializing clone to {}...", target.display());
        let output = Command::new("git")
            .arg("clone")
            .arg("--depth")
            .arg("1")
            .arg(&self.repo_url)
            .arg(target)
            .output()
            .context("Failed to run git clone")?;

        if !output.status.success() {
            bail!("Git clone failed: {}", String::from_utf8_lossy(&output.stderr).trim());
        }
        Ok(SyncStatus::Changed)
    }

    fn pull(&self, target: &Path) -> Result<SyncStatus> {
        tracing::info!("Performing incremental update (git pull) in {}", target.display());
        let output = Command::new("git")
            .arg("-C")
            .arg(target)
            .arg("pull")
            .output()
            .context("Failed to run git pull")?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            bail!("Git pull failed: {}", combined.trim());
        }
        Ok(pull_status(&combined))
    }
}

impl DatasetProvider for GitDatasetProvider {
    fn sync(&self) -> Result<SyncStatus> {
        let _guard = self.git_lock.lock();

        let target = std::path::absolute(&self.target_dir).with_context(|| {
            format!("Failed to resolve data directory: {}", self.target_dir.display())
        })?;

        if target.join(".git").exists() {
            self.pull(&target)
        } else {
            self.clone_repo(&target)
        }
    }

    fn data_root(&self) -> Option<PathBuf> {
        self.layout.find_data_root(&self.target_dir)
    }
}

/// Interpret `git pull` output
fn pull_status(output: &str) -> SyncStatus {
    if output.contains(GIT_UP_TO_DATE) { SyncStatus::Unchanged } else { SyncStatus::Changed }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_pull_status_parsing() {
        assert_eq!(pull_status("Already up to date.\n"), SyncStatus::Unchanged);
        assert_eq!(
            pull_status("Updating 1a2b3c..4d5e6f\nFast-forward\n ncm-lyrics/index.jsonl | 2 +-\n"),
            SyncStatus::Changed
        );
    }

    #[test]
    fn test_local_provider_never_changes() {
        let temp = TempDir::new().unwrap();
        let provider = LocalDatasetProvider::new(temp.path(), PlatformLayout::default());
        assert_eq!(provider.sync().unwrap(), SyncStatus::Unchanged);
        assert!(!provider.sync_enabled());
    }

    #[test]
    fn test_local_provider_resolves_root() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("qq-lyrics")).unwrap();

        let provider = LocalDatasetProvider::new(temp.path(), PlatformLayout::default());
        assert_eq!(provider.data_root(), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn test_git_provider_is_sync_enabled() {
        let provider =
            GitDatasetProvider::new("https://example.invalid/repo.git", "unused", PlatformLayout::default());
        assert!(provider.sync_enabled());
        assert_eq!(provider.target_dir(), Path::new("unused"));
    }
}
