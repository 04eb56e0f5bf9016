//! Post-transfer verification
//!
//! After the orchestrator reports completion, every record marked for
//! transfer is re-checked against the filesystem at its assigned storage
//! path. The orchestrator's own success flags are not trusted: transfer
//! failures can be silent (truncated writes, vanished mounts), and a
//! persisted unit must never reference a nonexistent or corrupted file.
//!
//! This is the verify step of the two-phase commit: intent (assign path)
//! → transfer → verify → commit (save) or discard.

use std::collections::BTreeMap;
use std::path::Path;

use mirror_catalog::{ChecksumKind, PackageKey, PackageRecord};
use mirror_fs::{compute_file_checksum, verify_size};

/// Check a transferred artifact against the record that described it.
///
/// The file must exist with the advertised byte size, and for SHA-256
/// records its digest must match. Legacy checksum algorithms have no
/// local hasher, so for those the size check stands alone.
pub fn artifact_matches(record: &PackageRecord, path: &Path) -> bool {
    if !verify_size(path, record.size) {
        return false;
    }
    match record.checksum_kind {
        ChecksumKind::Sha256 => match compute_file_checksum(path) {
            Ok(digest) => digest == record.checksum,
            Err(_) => false,
        },
        kind => {
            tracing::debug!(
                "No local hasher for {}; accepting {} on size alone",
                kind,
                record.file_name
            );
            true
        }
    }
}

/// Prune records whose artifact fails verification after transfer.
///
/// Unverified records are moved out of `new` and `missing` and returned
/// as the `not_synced` set; the caller must not persist anything for
/// them. A record with no assigned storage path counts as unverified.
pub fn prune_unverified<F>(
    new: &mut BTreeMap<PackageKey, PackageRecord>,
    missing: &mut BTreeMap<PackageKey, PackageRecord>,
    verified: F,
) -> BTreeMap<PackageKey, PackageRecord>
where
    F: Fn(&PackageRecord, &Path) -> bool,
{
    let mut not_synced = BTreeMap::new();

    for set in [new, missing] {
        let unverified: Vec<PackageKey> = set
            .iter()
            .filter(|(_, record)| match &record.storage_path {
                Some(path) => !verified(record, path),
                None => true,
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in unverified {
            if let Some(record) = set.remove(&key) {
                tracing::warn!(
                    "Artifact failed verification after transfer: {}",
                    record.file_name
                );
                not_synced.insert(key, record);
            }
        }
    }

    not_synced
}
