//! Data models for the lyric metadata index.
//!
//! This module defines the data structures used throughout the service:
//!
//! - [`RawRecord`] - One line of a platform's `index.jsonl`
//! - [`Metadata`] - Verbatim `[key, [values...]]` pairs attached to a record
//! - [`IndexEntry`] - Query-ready record with its precomputed search blob
//! - [`SearchResult`] - Merged, cross-platform result returned to callers
//! - [`SearchResponse`], [`StatusReport`], [`ReloadReport`] - operation responses
//!
//! Records are deserialized with serde; metadata values stay as raw
//! [`serde_json::Value`]s so they can be echoed back untouched.

pub mod entry;
pub mod search;

pub use entry::{IndexEntry, Metadata, RawRecord};
pub use search::{ReloadReport, SearchResponse, SearchResult, StatusReport};
