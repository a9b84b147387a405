//! Index building for the multi-platform lyric dataset
//!
//! # Error Handling Strategy
//!
//! A rebuild never fails because of one platform:
//!
//! - **Missing sources**: A platform whose index file is absent contributes an empty
//!   index with no download directory. This is the normal state for platforms a
//!   dataset does not carry.
//!
//! - **Unreadable sources**: Open/read failures are logged as warnings and the platform
//!   is treated as missing.
//!
//! - **Malformed records**: Delegated to the parser, which skips bad lines.
//!
//! - **Publication**: Snapshots are built completely before they are handed to
//!   [`IndexStore::publish`], so readers only ever see whole generations.

pub mod builder;
pub mod layout;
pub mod store;

pub use builder::{PlatformIndex, build_platform_index, build_snapshot};
pub use layout::PlatformLayout;
pub use store::{IndexSnapshot, IndexStore};
