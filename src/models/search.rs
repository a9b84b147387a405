use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entry::{IndexEntry, Metadata};

/// One song, merged across every platform where it matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "rawLyricFile")]
    pub raw_lyric_file: String,
    pub metadata: Metadata,
    /// Discovery order, never contains duplicates
    pub platforms: Vec<String>,
}

impl SearchResult {
    pub fn from_entry(entry: &IndexEntry, platform: &str) -> Self {
        Self {
            id: entry.id.clone(),
            raw_lyric_file: entry.raw_lyric_file.clone(),
            metadata: entry.metadata.clone(),
            platforms: vec![platform.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: usize,
    pub results: Vec<SearchResult>,
    #[serde(rename = "servedFromCache")]
    pub served_from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: String,
    /// `None` until the first successful load
    #[serde(rename = "lastUpdateTime")]
    pub last_update_time: Option<String>,
    #[serde(rename = "totalEntries")]
    pub total_entries: usize,
    #[serde(rename = "platformStats")]
    pub platform_stats: BTreeMap<String, usize>,
    #[serde(rename = "cacheSize")]
    pub cache_size: usize,
    #[serde(rename = "repoUrl")]
    pub repo_url: String,
    #[serde(rename = "dataRoot")]
    pub data_root: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadReport {
    pub changed: bool,
    pub message: String,
}
