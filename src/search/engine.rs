use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use super::merge::merge_platform_hits;
use crate::cache::{CacheKey, QueryCache};
use crate::error::ServiceError;
use crate::indexer::{IndexSnapshot, IndexStore, PlatformIndex};
use crate::models::SearchResult;

/// Results of one search call
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Arc<Vec<SearchResult>>,
    pub served_from_cache: bool,
}

impl SearchOutcome {
    pub fn empty() -> Self {
        Self { results: Arc::new(Vec::new()), served_from_cache: false }
    }
}

/// Trim surrounding whitespace and lowercase
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Concurrent multi-platform substring search with result caching.
pub struct SearchEngine {
    store: Arc<IndexStore>,
    cache: Arc<QueryCache>,
    /// Used when a request names no platforms
    default_platforms: Vec<String>,
    timeout: Duration,
}

impl SearchEngine {
    pub fn new(
        store: Arc<IndexStore>,
        cache: Arc<QueryCache>,
        default_platforms: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self { store, cache, default_platforms, timeout }
    }

    /// Search `platforms` (all known platforms when empty) for `query`.
    ///
    /// An empty query returns no results without touching the cache or the index.
    /// If the scans do not finish before the deadline the whole call fails with
    /// [`ServiceError::SearchTimeout`]; partial results are never returned.
    pub async fn search(
        &self,
        query: &str,
        platforms: &[String],
    ) -> Result<SearchOutcome, ServiceError> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Ok(SearchOutcome::empty());
        }

        let platforms = self.resolve_platforms(platforms);
        let key = CacheKey::new(&query, &platforms);

        // Pin one generation for the whole call, cache lookup included
        let snapshot = self.store.snapshot();
        let generation = snapshot.generation();
        if let Some(results) = self.cache.lookup(&key, generation) {
            tracing::debug!("Cache hit for query: {}", query);
            return Ok(SearchOutcome { results, served_from_cache: true });
        }

        let started = Instant::now();
        let per_platform =
            match tokio::time::timeout(self.timeout, scan_platforms(snapshot, &query, &platforms))
                .await
            {
                Ok(scanned) => scanned?,
                Err(_) => {
                    let elapsed = started.elapsed();
                    tracing::warn!(
                        "Search for {:?} timed out after {}ms across {} platforms",
                        query,
                        elapsed.as_millis(),
                        platforms.len()
                    );
                    return Err(ServiceError::SearchTimeout { elapsed });
                }
            };

        let results = Arc::new(merge_platform_hits(per_platform));
        tracing::debug!(
            "Query {:?} matched {} songs in {}ms",
            query,
            results.len(),
            started.elapsed().as_millis()
        );

        if self.store.snapshot().generation() == generation {
            self.cache.store(key, generation, results.clone());
        } else {
            tracing::debug!("Index reloaded during query {:?}, not caching", query);
        }
        Ok(SearchOutcome { results, served_from_cache: false })
    }

    /// Requested platforms in request order without duplicates, or the defaults
    fn resolve_platforms(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            return self.default_platforms.clone();
        }

        let mut platforms: Vec<String> = Vec::with_capacity(requested.len());
        for name in requested {
            if !platforms.contains(name) {
                platforms.push(name.clone());
            }
        }
        platforms
    }
}

/// Scan each platform on its own blocking task. Lists come back in `platforms` order.
///
/// Dropping the returned future (on timeout) drops the `JoinSet`: queued scans are
/// aborted and running ones finish on their own with their result discarded.
async fn scan_platforms(
    snapshot: Arc<IndexSnapshot>,
    query: &str,
    platforms: &[String],
) -> Result<Vec<Vec<SearchResult>>, ServiceError> {
    let query: Arc<str> = Arc::from(query);
    let mut tasks = JoinSet::new();

    for (position, name) in platforms.iter().enumerate() {
        let index = snapshot.platform(name).cloned();
        let query = query.clone();
        let name = name.clone();
        tasks.spawn_blocking(move || (position, scan_platform(index.as_deref(), &name, &query)));
    }

    let mut per_platform = vec![Vec::new(); platforms.len()];
    while let Some(joined) = tasks.join_next().await {
        let (position, hits) = joined
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Platform scan failed: {}", e)))?;
        per_platform[position] = hits;
    }

    Ok(per_platform)
}

/// Unknown platforms scan as empty
fn scan_platform(index: Option<&PlatformIndex>, name: &str, query: &str) -> Vec<SearchResult> {
    let Some(index) = index else {
        return Vec::new();
    };

    index.matching(query).map(|entry| SearchResult::from_entry(entry, name)).collect()
}
