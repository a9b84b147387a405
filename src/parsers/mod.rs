//! JSONL parser for per-platform lyric index files
//!
//! # Error Handling Strategy
//!
//! Ingestion is best-effort:
//!
//! - **Individual line failures**: Malformed JSON lines are logged at debug level and
//!   skipped, so one bad record never costs the rest of the file.
//!
//! - **File-level failures**: A file that cannot be opened or read returns an error;
//!   the index builder turns that into an empty platform rather than aborting a rebuild.
//!
//! - **Summary reporting**: When lines were skipped a single warning with the counts is
//!   emitted, so operators can tell the index is smaller than the source.

pub mod deserializers;
pub mod index_file;

pub use index_file::{ParsedIndex, parse_index_file, parse_index_reader};
