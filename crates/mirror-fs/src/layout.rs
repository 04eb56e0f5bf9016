//! On-disk storage layout for mirrored artifacts
//!
//! Every package artifact lives at a deterministic path under the storage
//! root. The checksum component keeps parallel variants of the same
//! name/version (different signatures, rebuilt artifacts) from colliding.

use std::path::{Path, PathBuf};

/// Fields needed to place a package artifact under the storage root.
///
/// Kept as a plain borrow-struct so this layer stays independent of the
/// catalog's record types.
#[derive(Debug, Clone, Copy)]
pub struct PackageLocation<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub release: &'a str,
    pub arch: &'a str,
    pub checksum: &'a str,
    pub file_name: &'a str,
}

/// Resolve the canonical storage path for a package artifact.
///
/// Layout: `<root>/<name>/<version>-<release>/<arch>/<checksum>/<file_name>`
pub fn package_storage_path(root: &Path, location: &PackageLocation<'_>) -> PathBuf {
    root.join(location.name)
        .join(format!("{}-{}", location.version, location.release))
        .join(location.arch)
        .join(location.checksum)
        .join(location.file_name)
}

/// Resolve the name-based mirror link for an artifact.
///
/// The mirror link is a flat, human-browsable view of the repository kept
/// under the working directory: `<working_dir>/<repo_id>/<file_name>`.
pub fn mirror_link_path(working_dir: &Path, repo_id: &str, file_name: &str) -> PathBuf {
    working_dir.join(repo_id).join(file_name)
}
