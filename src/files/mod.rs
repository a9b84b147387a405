//! Lyric file lookup for downloads
//!
//! Resolves `(platform, music id, format)` to a file under the platform's source
//! directory from the currently published index. Ids and formats are validated as
//! plain file names before they touch the filesystem.

pub mod store;

pub use store::{DEFAULT_FORMAT, FileStore, LocalFileStore, LyricFile, SUPPORTED_FORMATS};
