//! # File Access
//!
//! Every file the binary reads or writes goes through here. Inputs are
//! canonicalised and size-capped before a byte is read; outputs must land in
//! an existing directory.

use std::path::{Path, PathBuf};
use tierstate_core::TierError;

/// Read `path` in full if it is a regular file of at most `limit` bytes.
///
/// An oversized file is reported through `too_large`, so config and snapshot
/// reads keep their own error kinds.
pub fn read_capped(
    path: &Path,
    limit: u64,
    too_large: fn(String) -> TierError,
) -> Result<Vec<u8>, TierError> {
    let resolved = path
        .canonicalize()
        .map_err(|e| TierError::IoError(format!("Cannot open '{}': {}", path.display(), e)))?;
    let metadata = std::fs::metadata(&resolved)
        .map_err(|e| TierError::IoError(format!("Cannot open '{}': {}", path.display(), e)))?;

    if !metadata.is_file() {
        return Err(TierError::IoError(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > limit {
        return Err(too_large(format!(
            "'{}' is {} bytes, limit is {}",
            path.display(),
            metadata.len(),
            limit
        )));
    }

    std::fs::read(&resolved)
        .map_err(|e| TierError::IoError(format!("Cannot read '{}': {}", path.display(), e)))
}

/// Resolve where an output file will be written.
///
/// The parent directory (the working directory for a bare file name) must
/// already exist.
pub fn output_target(path: &Path) -> Result<PathBuf, TierError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TierError::IoError(format!("'{}' names no file", path.display())))?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let dir = dir.canonicalize().map_err(|e| {
        TierError::IoError(format!("Cannot write into '{}': {}", dir.display(), e))
    })?;
    if !dir.is_dir() {
        return Err(TierError::IoError(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    Ok(dir.join(file_name))
}

// =============================================================================
// TESTS
// =============================================================================
