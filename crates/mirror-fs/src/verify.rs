//! Artifact verification primitives
//!
//! The sync engine treats these as the ground truth for whether a
//! previously transferred artifact is actually present. Transfer reports
//! are not trusted on their own; truncated or silently failed writes are
//! caught by re-checking the filesystem.

use std::path::Path;

/// Check whether an artifact (or symlink) exists at `path`.
///
/// Uses `symlink_metadata` so a dangling mirror link still counts as
/// present for removal purposes.
pub fn verify_exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Check that the file at `path` exists and has the expected byte size.
///
/// A size mismatch indicates a truncated or corrupted transfer.
pub fn verify_size(path: &Path, expected: u64) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.len() == expected,
        Err(_) => false,
    }
}
