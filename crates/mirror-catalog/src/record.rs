//! Typed catalog records
//!
//! A remote repository advertises two kinds of content: package artifacts
//! (rpm/srpm binaries) and errata advisories. Both arrive from the loader
//! as fully typed records; field access is total and invalid input is
//! rejected at parse time rather than surfacing as lookup failures deep
//! in the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Checksum algorithm advertised alongside a package digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumKind {
    Sha256,
    Sha1,
    Md5,
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumKind::Sha256 => write!(f, "sha256"),
            ChecksumKind::Sha1 => write!(f, "sha1"),
            ChecksumKind::Md5 => write!(f, "md5"),
        }
    }
}

/// Advisory category
///
/// Sources occasionally ship nonstandard type strings; those map to
/// `Other` instead of failing the whole feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryKind {
    Bugfix,
    Security,
    Enhancement,
    #[serde(other)]
    Other,
}

impl fmt::Display for AdvisoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisoryKind::Bugfix => write!(f, "bugfix"),
            AdvisoryKind::Security => write!(f, "security"),
            AdvisoryKind::Enhancement => write!(f, "enhancement"),
            AdvisoryKind::Other => write!(f, "other"),
        }
    }
}

/// Record domain selector for inventory queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Binary package artifacts
    Package,
    /// Source package artifacts (`arch == "src"`)
    SrcPackage,
    /// Errata advisories
    Advisory,
}

/// One package artifact as advertised by the remote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub epoch: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub file_name: String,
    pub checksum: String,
    pub checksum_kind: ChecksumKind,
    pub size: u64,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub description: String,
    /// Target storage path, assigned by the engine before the record is
    /// handed to the transfer orchestrator. Never recomputed after
    /// transfer begins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

impl PackageRecord {
    /// Whether this artifact is a source package
    pub fn is_source(&self) -> bool {
        self.arch == "src"
    }

    /// The inventory domain this record belongs to
    pub fn domain(&self) -> Domain {
        if self.is_source() {
            Domain::SrcPackage
        } else {
            Domain::Package
        }
    }
}

/// One package referenced by an advisory's affected-package list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedPackage {
    pub name: String,
    #[serde(default)]
    pub epoch: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    #[serde(default)]
    pub file_name: String,
}

/// One errata advisory as advertised by the remote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub release: String,
    pub kind: AdvisoryKind,
    #[serde(default)]
    pub status: String,
    /// Supersession comparisons use this timestamp; later advisories with
    /// the same id replace earlier ones.
    pub updated: DateTime<Utc>,
    pub issued: DateTime<Utc>,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub packages: Vec<AffectedPackage>,
    #[serde(default)]
    pub rights: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub pushcount: u32,
}
