//! Query-result cache
//!
//! Merged result sets are cached per normalized query and requested platform set.
//! Entries expire by age only: reading an entry does not extend its life. The
//! capacity is a soft cap; going over it triggers a sweep of expired entries rather
//! than evicting live ones, so the cache can briefly hold more than `capacity`
//! entries when nothing has expired yet.
//!
//! The cache has its own lock, separate from the index store, and is cleared by the
//! reload coordinator every time a new index generation is published.

pub mod query_cache;

pub use query_cache::{CacheKey, QueryCache};
