use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::indexer::IndexStore;
use crate::utils::validate_file_name_component;

/// Download formats offered to clients, in display order
pub const SUPPORTED_FORMATS: [&str; 5] = ["ttml", "lrc", "yrc", "qrc", "lys"];

pub const DEFAULT_FORMAT: &str = "ttml";

/// A resolved lyric file, read fully into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricFile {
    pub path: PathBuf,
    /// `<id>.<format>`, suitable for a download name
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub trait FileStore: Send + Sync {
    fn open(&self, platform: &str, id: &str, format: &str) -> Result<LyricFile, ServiceError>;
}

/// Serves files from the source directories of the published index
pub struct LocalFileStore {
    store: Arc<IndexStore>,
}

impl LocalFileStore {
    pub fn new(store: Arc<IndexStore>) -> Self {
        Self { store }
    }
}

impl FileStore for LocalFileStore {
    fn open(&self, platform: &str, id: &str, format: &str) -> Result<LyricFile, ServiceError> {
        let dir = self
            .store
            .source_dir(platform)
            .ok_or_else(|| ServiceError::InvalidPlatform(platform.to_string()))?;

        validate_file_name_component(id)
            .map_err(|e| ServiceError::InvalidRequest(format!("musicId: {}", e)))?;
        validate_file_name_component(format)
            .map_err(|e| ServiceError::InvalidRequest(format!("format: {}", e)))?;

        let file_name = format!("{}.{}", id, format);
        let path = dir.join(&file_name);

        match fs::read(&path) {
            Ok(bytes) => Ok(LyricFile { path, file_name, bytes }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ServiceError::NotFound {
                platform: platform.to_string(),
                id: id.to_string(),
                format: format.to_string(),
            }),
            Err(e) => Err(ServiceError::Internal(
                anyhow::Error::new(e)
                    .context(format!("Failed to read lyric file: {}", path.display())),
            )),
        }
    }
}
