//! Identity-key derivation
//!
//! Every set operation in the reconciliation engine runs over derived
//! identity keys rather than whole records. Derivation is a pure function
//! of record fields: equal inputs always yield equal keys, across process
//! restarts, which is what makes the set-diff deterministic and
//! re-runnable.
//!
//! Package and advisory keys are distinct types and live in separate
//! maps; the two domains never share a key namespace.

use std::collections::BTreeMap;
use std::fmt;

use crate::record::{AdvisoryRecord, ChecksumKind, PackageRecord};
use crate::{Error, Result};

/// Identity of a package artifact
///
/// Deliberately excludes `release`: the lookup identity of an artifact is
/// its name/epoch/version/arch plus the exact file and digest. Distinct
/// checksums for the same name/version are distinct artifacts, which is
/// what allows parallel signed/unsigned variants to coexist.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageKey {
    pub name: String,
    pub epoch: String,
    pub version: String,
    pub arch: String,
    pub file_name: String,
    pub checksum_kind: ChecksumKind,
    pub checksum: String,
}

impl PackageKey {
    /// Derive the identity key for a package record.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedRecord` if a required field is empty.
    pub fn derive(record: &PackageRecord) -> Result<Self> {
        fn require(record: &'static str, field: &'static str, value: &str) -> Result<String> {
            if value.is_empty() {
                Err(Error::MalformedRecord { record, field })
            } else {
                Ok(value.to_string())
            }
        }

        Ok(Self {
            name: require("package", "name", &record.name)?,
            // Epoch is allowed to be empty; sources that omit it mean "0"
            epoch: record.epoch.clone(),
            version: require("package", "version", &record.version)?,
            arch: require("package", "arch", &record.arch)?,
            file_name: require("package", "file_name", &record.file_name)?,
            checksum_kind: record.checksum_kind,
            checksum: require("package", "checksum", &record.checksum)?,
        })
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}.{} [{}:{}]",
            self.name, self.epoch, self.version, self.arch, self.checksum_kind, self.checksum
        )
    }
}

/// Identity of an advisory: the advisory id alone
///
/// Later advisories carrying the same id supersede earlier ones, so the
/// id is the whole identity; versioning happens via the `updated`
/// timestamp during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdvisoryKey(pub String);

impl AdvisoryKey {
    /// Derive the identity key for an advisory record.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedRecord` if the advisory id is empty.
    pub fn derive(record: &AdvisoryRecord) -> Result<Self> {
        if record.id.is_empty() {
            return Err(Error::MalformedRecord {
                record: "advisory",
                field: "id",
            });
        }
        Ok(Self(record.id.clone()))
    }
}

impl fmt::Display for AdvisoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index package records by identity key.
///
/// Records whose key derivation fails are skipped with a logged anomaly;
/// one bad record never blocks the reconciliation of the rest.
pub fn index_packages(records: Vec<PackageRecord>) -> BTreeMap<PackageKey, PackageRecord> {
    let mut indexed = BTreeMap::new();
    for record in records {
        match PackageKey::derive(&record) {
            Ok(key) => {
                indexed.insert(key, record);
            }
            Err(e) => {
                tracing::warn!("Skipping package record '{}': {}", record.file_name, e);
            }
        }
    }
    indexed
}

/// Index advisory records by identity key, skipping malformed records.
pub fn index_advisories(records: Vec<AdvisoryRecord>) -> BTreeMap<AdvisoryKey, AdvisoryRecord> {
    let mut indexed = BTreeMap::new();
    for record in records {
        match AdvisoryKey::derive(&record) {
            Ok(key) => {
                indexed.insert(key, record);
            }
            Err(e) => {
                tracing::warn!("Skipping advisory record '{}': {}", record.title, e);
            }
        }
    }
    indexed
}
