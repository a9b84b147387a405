use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::models::SearchResult;

/// Normalized query text plus the sorted, de-duplicated platform set it ran against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    platforms: Vec<String>,
}

impl CacheKey {
    /// `query` is expected to be normalized already; `platforms` may be in any order
    pub fn new(query: &str, platforms: &[String]) -> Self {
        let mut platforms = platforms.to_vec();
        platforms.sort();
        platforms.dedup();
        Self { query: query.to_string(), platforms }
    }

    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }
}

#[derive(Debug)]
struct CacheEntry {
    results: Arc<Vec<SearchResult>>,
    /// Index generation the results were computed against
    generation: u64,
    inserted_at: Instant,
}

#[derive(Debug)]
pub struct QueryCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl QueryCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self { entries: RwLock::new(HashMap::new()), ttl, capacity }
    }

    /// Cached results for `key`, if present, younger than the TTL and computed
    /// against `generation`
    pub fn lookup(&self, key: &CacheKey, generation: u64) -> Option<Arc<Vec<SearchResult>>> {
        self.lookup_at(key, generation, Instant::now())
    }

    /// Insert or overwrite. Empty result sets are not cached.
    pub fn store(
        &self,
        key: CacheKey,
        generation: u64,
        results: impl Into<Arc<Vec<SearchResult>>>,
    ) {
        self.store_at(key, generation, results.into(), Instant::now());
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        tracing::info!("Query cache cleared");
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub(crate) fn lookup_at(
        &self,
        key: &CacheKey,
        generation: u64,
        now: Instant,
    ) -> Option<Arc<Vec<SearchResult>>> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.generation == generation
            && now.saturating_duration_since(entry.inserted_at) < self.ttl
        {
            Some(entry.results.clone())
        } else {
            None
        }
    }

    pub(crate) fn store_at(
        &self,
        key: CacheKey,
        generation: u64,
        results: Arc<Vec<SearchResult>>,
        now: Instant,
    ) {
        if results.is_empty() {
            return;
        }

        let mut entries = self.entries.write();
        entries.insert(key, CacheEntry { results, generation, inserted_at: now });

        // Over the soft cap: drop what has expired or belongs to an older generation
        if entries.len() > self.capacity {
            let ttl = self.ttl;
            let newest = entries.values().map(|e| e.generation).max().unwrap_or(generation);
            let before = entries.len();
            entries.retain(|_, entry| {
                entry.generation == newest
                    && now.saturating_duration_since(entry.inserted_at) <= ttl
            });
            tracing::debug!(
                "Query cache over capacity ({}), swept {} stale entries",
                self.capacity,
                before - entries.len()
            );
        }
    }
}
