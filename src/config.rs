//! Service configuration.
//!
//! Defaults mirror the reference deployment of the lyric database API; the CLI
//! overrides individual fields from flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::indexer::PlatformLayout;

pub const DEFAULT_REPO_URL: &str = "https://github.com/Steve-xmh/amll-ttml-db.git";
pub const DEFAULT_DATA_DIR: &str = "lyric-data";
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Preferred dataset location; probing falls back to well-known directories
    pub data_dir: PathBuf,
    pub repo_url: String,
    pub sync_enabled: bool,
    pub download_enabled: bool,
    pub sync_interval: Duration,
    pub search_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub layout: PlatformLayout,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            repo_url: DEFAULT_REPO_URL.to_string(),
            sync_enabled: true,
            download_enabled: true,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            layout: PlatformLayout::default(),
        }
    }
}

impl ServiceConfig {
    /// Config for a fixed local directory: no git sync, downloads allowed
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), sync_enabled: false, ..Self::default() }
    }
}
