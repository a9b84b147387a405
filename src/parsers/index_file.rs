use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{IndexEntry, RawRecord};
use crate::utils::validate_file_size;

/// Entries read from one index file, in file order
#[derive(Debug, Default)]
pub struct ParsedIndex {
    pub entries: Vec<IndexEntry>,
    /// Non-blank lines that failed to parse
    pub skipped: usize,
}

/// Parse a platform `index.jsonl` file into search-ready entries.
///
/// Malformed lines are skipped; only open/read failures are errors.
pub fn parse_index_file(path: &Path) -> Result<ParsedIndex> {
    // Open first, then check the size on the same handle
    let file = File::open(path)
        .with_context(|| format!("Failed to open index file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    // 64 KiB buffer; records with long metadata lists are common
    let reader = BufReader::with_capacity(64 * 1024, file);
    parse_index_reader(reader, &path.display().to_string())
}

/// Parse JSONL records from any buffered reader. `source` is only used in log messages.
pub fn parse_index_reader<R: BufRead>(reader: R, source: &str) -> Result<ParsedIndex> {
    let mut parsed = ParsedIndex::default();

    for (line_num, line) in reader.split(b'\n').enumerate() {
        let line = line.with_context(|| format!("Failed to read line from {}", source))?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line);

        // Skip empty lines
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<RawRecord>(line) {
            Ok(record) => parsed.entries.push(IndexEntry::from_record(record)),
            Err(e) => {
                tracing::debug!("Skipping malformed record on line {} in {}: {}", line_num + 1, source, e);
                parsed.skipped += 1;
            }
        }
    }

    if parsed.skipped > 0 {
        tracing::warn!(
            "Parsed {}: {} entries ({} malformed lines skipped)",
            source,
            parsed.entries.len(),
            parsed.skipped
        );
    }

    Ok(parsed)
}
