use std::path::{Component, Path, PathBuf};

/// Sub-directories of the current directory probed when the preferred data dir is not usable
const FALLBACK_DATA_DIRS: [&str; 3] = ["lyric-data", "amll-ttml-db", "data"];

/// Where each platform's index file lives, relative to the dataset root.
///
/// The set of platforms is data: the search engine and the reload coordinator
/// only ever iterate over whatever the layout contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLayout {
    platforms: Vec<(String, PathBuf)>,
}

impl Default for PlatformLayout {
    fn default() -> Self {
        Self::empty()
            .with_platform("ncm", "ncm-lyrics/index.jsonl")
            .with_platform("qq", "qq-lyrics/index.jsonl")
            .with_platform("am", "am-lyrics/index.jsonl")
            .with_platform("spotify", "spotify-lyrics/index.jsonl")
            .with_platform("raw", "metadata/raw-lyrics-index.jsonl")
    }
}

impl PlatformLayout {
    pub fn empty() -> Self {
        Self { platforms: Vec::new() }
    }

    /// Add or replace a platform
    pub fn with_platform(mut self, name: &str, index_file: impl Into<PathBuf>) -> Self {
        let index_file = index_file.into();
        match self.platforms.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = index_file,
            None => self.platforms.push((name.to_string(), index_file)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Platform names in declaration order
    pub fn names(&self) -> Vec<String> {
        self.platforms.iter().map(|(n, _)| n.clone()).collect()
    }

    /// `(platform, relative index file)` pairs in declaration order
    pub fn entries(&self) -> &[(String, PathBuf)] {
        &self.platforms
    }

    /// Whether `dir` looks like a dataset root: at least one platform's top-level
    /// directory exists inside it.
    pub fn is_data_dir(&self, dir: &Path) -> bool {
        self.platforms.iter().any(|(_, rel)| match rel.components().next() {
            Some(Component::Normal(top)) => dir.join(top).is_dir(),
            _ => false,
        })
    }

    /// Locate the dataset root, probing relative candidates against the current directory.
    pub fn find_data_root(&self, preferred: &Path) -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        self.find_data_root_from(preferred, &cwd)
    }

    /// Probe order: `preferred`, `base`, the parent of `base`, then the well-known
    /// sub-directories of `base`. Returns the first match as an absolute path.
    pub fn find_data_root_from(&self, preferred: &Path, base: &Path) -> Option<PathBuf> {
        let mut candidates = vec![base.join(preferred), base.to_path_buf()];
        if let Some(parent) = base.parent() {
            candidates.push(parent.to_path_buf());
        }
        candidates.extend(FALLBACK_DATA_DIRS.iter().map(|sub| base.join(sub)));

        candidates
            .into_iter()
            .find(|dir| self.is_data_dir(dir))
            .and_then(|dir| std::path::absolute(&dir).ok())
    }
}
