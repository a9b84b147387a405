//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for on-disk dataset directories laid out like the lyric database
pub struct DatasetBuilder {
    temp_dir: TempDir,
}

impl DatasetBuilder {
    /// Create a new builder with an empty dataset root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the dataset root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write raw content to `<platform>-lyrics/index.jsonl`
    pub fn with_raw_index(self, platform: &str, content: &str) -> Self {
        let dir = self.temp_dir.path().join(format!("{}-lyrics", platform));
        fs::create_dir_all(&dir).expect("Failed to create platform dir");
        fs::write(dir.join("index.jsonl"), content).expect("Failed to write index");
        self
    }

    /// Write records as one JSON object per line
    pub fn with_platform(self, platform: &str, records: &[RecordBuilder]) -> Self {
        let content = records.iter().map(|r| r.to_json()).collect::<Vec<_>>().join("\n");
        self.with_raw_index(platform, &content)
    }

    /// Add a lyric file next to a platform's index
    pub fn with_lyric_file(self, platform: &str, file_name: &str, content: &str) -> Self {
        let dir = self.temp_dir.path().join(format!("{}-lyrics", platform));
        fs::create_dir_all(&dir).expect("Failed to create platform dir");
        fs::write(dir.join(file_name), content).expect("Failed to write lyric file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for index records
pub struct RecordBuilder {
    id: String,
    raw_lyric_file: String,
    metadata: Vec<(String, Vec<String>)>,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            raw_lyric_file: format!("{}.ttml", id),
            metadata: Vec::new(),
        }
    }

    pub fn file(mut self, raw_lyric_file: &str) -> Self {
        self.raw_lyric_file = raw_lyric_file.to_string();
        self
    }

    /// Add a metadata pair
    pub fn meta(mut self, key: &str, values: &[&str]) -> Self {
        self.metadata.push((key.to_string(), values.iter().map(|v| v.to_string()).collect()));
        self
    }

    pub fn to_value(&self) -> Value {
        let metadata: Vec<Value> =
            self.metadata.iter().map(|(k, v)| json!([k, v])).collect();
        json!({ "id": self.id, "rawLyricFile": self.raw_lyric_file, "metadata": metadata })
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// The two-platform dataset used across scenarios: song 1 is on ncm and qq under
/// the same file, song 2 only on qq.
pub fn roy_and_blue() -> DatasetBuilder {
    DatasetBuilder::new()
        .with_platform(
            "ncm",
            &[RecordBuilder::new("1").file("a.ttml").meta("artists", &["Roy"])],
        )
        .with_platform(
            "qq",
            &[
                RecordBuilder::new("1").file("a.ttml").meta("artists", &["Roy"]),
                RecordBuilder::new("2").file("b.ttml").meta("musicName", &["Blue"]),
            ],
        )
}
