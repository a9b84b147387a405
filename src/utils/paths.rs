use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::path::{Component, Path};

use anyhow::{Context, Result, bail};

// Maximum size for a platform index file: 256MB
const MAX_FILE_SIZE_BYTES: u64 = 256 * 1024 * 1024;

/// Validates that a caller-supplied value is safe to use as a single file name component
///
/// Used for music ids and format names before they are joined onto a platform directory.
///
/// # Errors
///
/// Returns an error if:
/// - The value is empty
/// - The value contains a path separator or a NUL byte
/// - The value is `.` or `..`
pub fn validate_file_name_component(value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("Value must not be empty");
    }
    if value.contains(['/', '\\', '\0']) {
        bail!("Value contains a path separator: {}", value);
    }

    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => bail!("Value is not a plain file name: {}", value),
    }
}

/// Validates that a file's size is within acceptable limits (256MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 256MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use lyric_meta_search::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/home/alice/lyric-data");
/// // Returns "~/lyric-data" if HOME=/home/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    // Avoid double allocation when converting Cow to String
    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
