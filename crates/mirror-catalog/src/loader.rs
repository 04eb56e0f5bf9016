//! Feed loading
//!
//! A feed directory holds the normalized catalog a remote source
//! advertises: `packages.json` (one entry per artifact) and
//! `advisories.json` (one entry per advisory).
//!
//! Loading is fail-soft: a missing feed file means the source publishes
//! nothing for that domain, and an unparsable feed is logged and treated
//! as empty so the sync still runs to completion and produces a report.
//! An empty-looking source is then distinguishable from a crash only by
//! log inspection, which is an accepted limitation.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::record::{AdvisoryRecord, PackageRecord};

/// File name of the package feed inside a feed directory
pub const PACKAGES_FEED: &str = "packages.json";

/// File name of the advisory feed inside a feed directory
pub const ADVISORIES_FEED: &str = "advisories.json";

fn load_feed<T: DeserializeOwned>(feed_dir: &Path, file_name: &str) -> Vec<T> {
    let path = feed_dir.join(file_name);
    if !path.exists() {
        tracing::debug!("No {} feed at {}; treating as empty", file_name, path.display());
        return Vec::new();
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Failed to read feed {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to parse feed {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Load the package feed from a feed directory.
///
/// Returns an empty catalog if the feed is absent or unparsable.
pub fn load_packages(feed_dir: &Path) -> Vec<PackageRecord> {
    let records = load_feed(feed_dir, PACKAGES_FEED);
    tracing::info!(
        "Loaded {} package records from {}",
        records.len(),
        feed_dir.display()
    );
    records
}

/// Load the advisory feed from a feed directory.
///
/// Returns an empty catalog if the feed is absent or unparsable.
pub fn load_advisories(feed_dir: &Path) -> Vec<AdvisoryRecord> {
    let records = load_feed(feed_dir, ADVISORIES_FEED);
    tracing::info!(
        "Loaded {} advisory records from {}",
        records.len(),
        feed_dir.display()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::tests::{sample_advisory, sample_package};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_feed_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_packages(dir.path()).is_empty());
        assert!(load_advisories(dir.path()).is_empty());
    }

    #[test]
    fn unparsable_feed_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PACKAGES_FEED), "not json at all {{{").unwrap();
        assert!(load_packages(dir.path()).is_empty());
    }

    #[test]
    fn package_feed_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![sample_package()];
        std::fs::write(
            dir.path().join(PACKAGES_FEED),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();

        let loaded = load_packages(dir.path());
        assert_eq!(loaded, records);
    }

    #[test]
    fn advisory_feed_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![sample_advisory("RHSA-2024:0001")];
        std::fs::write(
            dir.path().join(ADVISORIES_FEED),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();

        let loaded = load_advisories(dir.path());
        assert_eq!(loaded, records);
    }

    #[test]
    fn partial_feed_failure_does_not_block_other_domain() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ADVISORIES_FEED), "garbage").unwrap();
        let records = vec![sample_package()];
        std::fs::write(
            dir.path().join(PACKAGES_FEED),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();

        assert_eq!(load_packages(dir.path()).len(), 1);
        assert!(load_advisories(dir.path()).is_empty());
    }
}
