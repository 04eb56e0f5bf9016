//! Shared test utilities for the mirror-manager workspace.
//!
//! Provides record builders and feed-directory writers so crate test
//! suites and integration tests construct identical fixtures. This crate
//! is a dev-dependency only — never published.

use chrono::{TimeZone, Utc};
use std::path::Path;

use mirror_catalog::loader::{ADVISORIES_FEED, PACKAGES_FEED};
use mirror_catalog::{AdvisoryKind, AdvisoryRecord, ChecksumKind, PackageRecord};
use mirror_fs::compute_content_checksum;

/// The artifact bytes belonging to a sample package of the given name.
///
/// Distinct names yield distinct payloads, so distinct sample packages
/// always get distinct checksums and identity keys.
pub fn package_payload(name: &str) -> Vec<u8> {
    format!("{} artifact payload", name).into_bytes()
}

/// Build a package record named `<name>` whose checksum and size match
/// the bytes returned by [`package_payload`], so post-transfer
/// verification passes for artifacts seeded from it.
pub fn sample_package(name: &str) -> PackageRecord {
    let payload = package_payload(name);
    PackageRecord {
        name: name.to_string(),
        epoch: "0".to_string(),
        version: "1.0.0".to_string(),
        release: "1.el9".to_string(),
        arch: "x86_64".to_string(),
        file_name: format!("{}.rpm", name),
        checksum: compute_content_checksum(&payload),
        checksum_kind: ChecksumKind::Sha256,
        size: payload.len() as u64,
        provides: vec![name.to_string()],
        requires: vec!["glibc".to_string()],
        vendor: "Test Vendor".to_string(),
        license: "MIT".to_string(),
        description: format!("Test package {}", name),
        storage_path: None,
    }
}

/// Build a security advisory with the given id and a fixed timestamp pair.
pub fn sample_advisory(id: &str) -> AdvisoryRecord {
    AdvisoryRecord {
        id: id.to_string(),
        title: format!("Update advisory {}", id),
        description: "An update is available.".to_string(),
        version: "1".to_string(),
        release: "1".to_string(),
        kind: AdvisoryKind::Security,
        status: "final".to_string(),
        updated: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        issued: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        severity: "Important".to_string(),
        references: vec![format!("https://errata.example.com/{}", id)],
        packages: Vec::new(),
        rights: String::new(),
        summary: "Test advisory".to_string(),
        solution: "Update the affected packages.".to_string(),
        origin: "updates@example.com".to_string(),
        pushcount: 1,
    }
}

/// Write a package feed file into `feed_dir`.
pub fn write_package_feed(feed_dir: &Path, records: &[PackageRecord]) {
    std::fs::create_dir_all(feed_dir).unwrap();
    std::fs::write(
        feed_dir.join(PACKAGES_FEED),
        serde_json::to_string_pretty(records).unwrap(),
    )
    .unwrap();
}

/// Write an advisory feed file into `feed_dir`.
pub fn write_advisory_feed(feed_dir: &Path, records: &[AdvisoryRecord]) {
    std::fs::create_dir_all(feed_dir).unwrap();
    std::fs::write(
        feed_dir.join(ADVISORIES_FEED),
        serde_json::to_string_pretty(records).unwrap(),
    )
    .unwrap();
}
