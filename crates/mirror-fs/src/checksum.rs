//! SHA-256 checksum utilities
//!
//! Used to fingerprint downloaded artifacts. Checksums advertised by a
//! remote catalog are plain hex digests, so no algorithm prefix is added
//! here; the algorithm travels alongside the digest in the record.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Compute the SHA-256 digest of in-memory content as lowercase hex.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 digest of a file's contents as lowercase hex.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> crate::Result<String> {
    let content = std::fs::read(path).map_err(|e| crate::Error::io(path, e))?;
    Ok(compute_content_checksum(&content))
}
