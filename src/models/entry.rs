use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered `[key, [values...]]` pairs, kept exactly as they appear in the source file.
///
/// Only pairs with at least two elements whose second element is an array are
/// considered when extracting searchable text; everything else is carried along
/// for output but otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub Vec<Vec<Value>>);

impl Metadata {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value list of the first pair whose key equals `key`
    pub fn values(&self, key: &str) -> Option<&[Value]> {
        self.0.iter().find_map(|pair| match pair.as_slice() {
            [Value::String(k), Value::Array(values), ..] if k == key => Some(values.as_slice()),
            _ => None,
        })
    }

    /// Every string found inside the value lists, in source order
    pub fn string_values(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter_map(|pair| match pair.get(1) {
                Some(Value::Array(values)) => Some(values),
                _ => None,
            })
            .flat_map(|values| values.iter().filter_map(Value::as_str))
    }
}

/// One line of a platform `index.jsonl` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "rawLyricFile", default)]
    pub raw_lyric_file: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_metadata")]
    pub metadata: Metadata,
}

/// A record normalized for substring search.
///
/// The search blob is computed once in [`IndexEntry::from_record`] and never
/// rebuilt afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub raw_lyric_file: String,
    pub metadata: Metadata,
    search_blob: String,
}

impl IndexEntry {
    pub fn from_record(record: RawRecord) -> Self {
        let search_blob = build_search_blob(&record);
        Self {
            id: record.id,
            raw_lyric_file: record.raw_lyric_file,
            metadata: record.metadata,
            search_blob,
        }
    }

    /// Lowercase `id`, `rawLyricFile` and string metadata values joined by spaces
    pub fn search_blob(&self) -> &str {
        &self.search_blob
    }

    /// `query` must already be trimmed and lowercased
    pub fn matches(&self, query: &str) -> bool {
        self.search_blob.contains(query)
    }
}

fn build_search_blob(record: &RawRecord) -> String {
    let parts: Vec<&str> = [record.id.as_str(), record.raw_lyric_file.as_str()]
        .into_iter()
        .chain(record.metadata.string_values())
        .collect();

    // Pre-allocate: all parts plus one separator between each
    let capacity =
        parts.iter().map(|s| s.len()).sum::<usize>() + parts.len().saturating_sub(1);
    let mut blob = String::with_capacity(capacity);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            blob.push(' ');
        }
        blob.push_str(&part.to_lowercase());
    }
    blob
}
