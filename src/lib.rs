//! Lyric Meta Search - metadata search over a multi-platform lyric dataset
//!
//! The dataset is a directory (usually a git checkout) holding one JSON-lines index
//! per music platform. This library loads those indexes into an immutable snapshot,
//! answers case-insensitive substring queries across platforms concurrently, caches
//! recent answers, and keeps the snapshot fresh by periodically syncing the dataset.
//!
//! # Example
//!
//! ```no_run
//! use lyric_meta_search::{LyricService, ServiceConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let service = LyricService::new(ServiceConfig::local("lyric-data"));
//! service.start(CancellationToken::new()).await;
//!
//! let response = service.search("roy", &[]).await?;
//! println!("{} songs matched", response.count);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod reload;
pub mod search;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use cache::{CacheKey, QueryCache};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use indexer::{IndexSnapshot, IndexStore, PlatformLayout, build_snapshot};
pub use models::{SearchResponse, SearchResult, StatusReport};
pub use reload::{ReloadCoordinator, ReloadTrigger};
pub use search::SearchEngine;
pub use service::LyricService;
