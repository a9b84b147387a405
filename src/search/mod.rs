//! Search Module
//!
//! Executes free-text queries against the published index.
//!
//! ## Overview
//! A query is normalized (trimmed, lowercased), checked against the query cache,
//! and on a miss scanned on every requested platform concurrently. A match is a
//! plain substring hit on the entry's precomputed search blob; there is no scoring.
//! Per-platform hits are merged by `rawLyricFile` so one song found on several
//! platforms comes back once, tagged with every platform where it matched.
//!
//! ## Submodules
//! - **`engine`**: fan-out, deadline handling and cache mediation.
//! - **`merge`**: cross-platform de-duplication.

pub mod engine;
pub mod merge;

pub use engine::{SearchEngine, SearchOutcome, normalize_query};
pub use merge::merge_platform_hits;
