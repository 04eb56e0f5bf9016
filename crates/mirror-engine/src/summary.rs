//! Sync report building
//!
//! Every count here is derived from the reconciliation maps the engine
//! actually acted on, never recounted from the raw catalog or inventory;
//! the summary can therefore never drift from the actions taken. A
//! report is always produced, even under partial failure — `success:
//! false` is the operator's signal, and per-item errors stay in the
//! details for diagnosis.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use mirror_catalog::{AdvisoryKey, AdvisoryKind, AdvisoryRecord, PackageKey, PackageRecord};

use crate::apply::RemovalError;
use crate::inventory::{AdvisoryItem, PackageItem};
use crate::transfer::TransferReport;

/// Wall-clock timings of a package sync's phases
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub metadata: Duration,
    pub transfer: Duration,
    pub total: Duration,
}

/// Aggregated counts of a package sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageSyncSummary {
    pub num_available: u64,
    pub num_existing: u64,
    pub num_synced_new_rpms: u64,
    pub num_synced_new_srpms: u64,
    pub num_resynced_rpms: u64,
    pub num_resynced_srpms: u64,
    pub num_not_synced_rpms: u64,
    pub num_not_synced_srpms: u64,
    pub num_orphaned_rpms: u64,
    pub num_orphaned_srpms: u64,
    pub removal_errors: Vec<RemovalError>,
    pub time_metadata_secs: f64,
    pub time_transfer_secs: f64,
    pub time_total_secs: f64,
}

/// Per-item details of a package sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageSyncDetails {
    /// Total bytes advertised for the records that needed transfer
    pub size_total: u64,
    /// File names that were intended for transfer but never verified
    pub not_synced: Vec<String>,
    pub transfer: TransferReport,
}

/// Exit contract of a package sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageSyncReport {
    pub success: bool,
    pub summary: PackageSyncSummary,
    pub details: PackageSyncDetails,
}

fn split_rpm_srpm<'a, I>(records: I) -> (u64, u64)
where
    I: Iterator<Item = &'a PackageRecord>,
{
    let mut rpms = 0;
    let mut srpms = 0;
    for record in records {
        if record.is_source() {
            srpms += 1;
        } else {
            rpms += 1;
        }
    }
    (rpms, srpms)
}

impl PackageSyncReport {
    /// Build the report from the reconciliation maps and transfer outcome.
    ///
    /// `new`, `missing`, and `not_synced` must be the post-verification
    /// maps: `new`/`missing` hold only items that verified on disk.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        available: &BTreeMap<PackageKey, PackageRecord>,
        existing: &BTreeMap<PackageKey, PackageItem>,
        new: &BTreeMap<PackageKey, PackageRecord>,
        missing: &BTreeMap<PackageKey, PackageRecord>,
        orphaned: &BTreeMap<PackageKey, PackageItem>,
        not_synced: &BTreeMap<PackageKey, PackageRecord>,
        removal_errors: Vec<RemovalError>,
        transfer: TransferReport,
        timings: PhaseTimings,
    ) -> Self {
        let (new_rpms, new_srpms) = split_rpm_srpm(new.values());
        let (resynced_rpms, resynced_srpms) = split_rpm_srpm(missing.values());
        let (not_synced_rpms, not_synced_srpms) = split_rpm_srpm(not_synced.values());
        let (orphaned_rpms, orphaned_srpms) =
            split_rpm_srpm(orphaned.values().map(|item| &item.package));

        let size_total: u64 = new
            .values()
            .chain(missing.values())
            .chain(not_synced.values())
            .map(|record| record.size)
            .sum();

        let success = removal_errors.is_empty() && transfer.is_clean();

        Self {
            success,
            summary: PackageSyncSummary {
                num_available: available.len() as u64,
                num_existing: existing.len() as u64,
                num_synced_new_rpms: new_rpms,
                num_synced_new_srpms: new_srpms,
                num_resynced_rpms: resynced_rpms,
                num_resynced_srpms: resynced_srpms,
                num_not_synced_rpms: not_synced_rpms,
                num_not_synced_srpms: not_synced_srpms,
                num_orphaned_rpms: orphaned_rpms,
                num_orphaned_srpms: orphaned_srpms,
                removal_errors,
                time_metadata_secs: timings.metadata.as_secs_f64(),
                time_transfer_secs: timings.transfer.as_secs_f64(),
                time_total_secs: timings.total.as_secs_f64(),
            },
            details: PackageSyncDetails {
                size_total,
                not_synced: not_synced.values().map(|r| r.file_name.clone()).collect(),
                transfer,
            },
        }
    }
}

/// Aggregated counts of an advisory sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdvisorySyncSummary {
    pub num_available: u64,
    pub num_existing: u64,
    pub num_new: u64,
    pub num_orphaned: u64,
    pub num_superseded: u64,
    pub num_bugfix: u64,
    pub num_security: u64,
    pub num_enhancement: u64,
    pub num_other: u64,
    pub removal_errors: Vec<RemovalError>,
    pub time_total_secs: f64,
}

/// Exit contract of an advisory sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdvisorySyncReport {
    pub success: bool,
    pub summary: AdvisorySyncSummary,
}

impl AdvisorySyncReport {
    /// Build the report from the reconciliation maps.
    ///
    /// `new` is the combined map of brand-new and superseding advisories
    /// that were saved; `superseded` counts replacements within it.
    pub fn build(
        available: &BTreeMap<AdvisoryKey, AdvisoryRecord>,
        existing: &BTreeMap<AdvisoryKey, AdvisoryItem>,
        new: &BTreeMap<AdvisoryKey, AdvisoryRecord>,
        orphaned: &BTreeMap<AdvisoryKey, AdvisoryItem>,
        superseded: &BTreeMap<AdvisoryKey, AdvisoryItem>,
        removal_errors: Vec<RemovalError>,
        elapsed: Duration,
    ) -> Self {
        let mut by_kind = BTreeMap::new();
        for record in new.values() {
            *by_kind.entry(record.kind).or_insert(0u64) += 1;
        }
        let count = |kind: AdvisoryKind| by_kind.get(&kind).copied().unwrap_or(0);

        let success = removal_errors.is_empty();

        Self {
            success,
            summary: AdvisorySyncSummary {
                num_available: available.len() as u64,
                num_existing: existing.len() as u64,
                num_new: new.len() as u64,
                num_orphaned: orphaned.len() as u64,
                num_superseded: superseded.len() as u64,
                num_bugfix: count(AdvisoryKind::Bugfix),
                num_security: count(AdvisoryKind::Security),
                num_enhancement: count(AdvisoryKind::Enhancement),
                num_other: count(AdvisoryKind::Other),
                removal_errors,
                time_total_secs: elapsed.as_secs_f64(),
            },
        }
    }
}

/// Combined exit contract of a full sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub success: bool,
    pub packages: PackageSyncReport,
    pub advisories: AdvisorySyncReport,
}

impl SyncReport {
    pub fn combine(packages: PackageSyncReport, advisories: AdvisorySyncReport) -> Self {
        Self {
            success: packages.success && advisories.success,
            packages,
            advisories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_catalog::{index_advisories, index_packages};
    use mirror_test_utils::{sample_advisory, sample_package};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn item_of(record: &PackageRecord) -> PackageItem {
        let storage_path = PathBuf::from(format!("/var/mirror/{}", record.file_name));
        let mut package = record.clone();
        package.storage_path = Some(storage_path.clone());
        PackageItem {
            package,
            storage_path,
        }
    }

    #[test]
    fn counts_come_from_the_maps() {
        let mut src = sample_package("pkg-src");
        src.arch = "src".to_string();
        let available = index_packages(vec![sample_package("pkg-a"), src.clone()]);
        let existing: BTreeMap<_, _> = available
            .iter()
            .map(|(k, r)| (k.clone(), item_of(r)))
            .collect();
        let new = index_packages(vec![sample_package("pkg-a")]);
        let missing = index_packages(vec![src]);
        let orphaned = BTreeMap::new();
        let not_synced = BTreeMap::new();

        let report = PackageSyncReport::build(
            &available,
            &existing,
            &new,
            &missing,
            &orphaned,
            &not_synced,
            Vec::new(),
            TransferReport::default(),
            PhaseTimings::default(),
        );

        assert!(report.success);
        assert_eq!(report.summary.num_available, 2);
        assert_eq!(report.summary.num_existing, 2);
        assert_eq!(report.summary.num_synced_new_rpms, 1);
        assert_eq!(report.summary.num_synced_new_srpms, 0);
        assert_eq!(report.summary.num_resynced_srpms, 1);
        assert_eq!(report.summary.num_resynced_rpms, 0);
    }

    #[test]
    fn removal_error_flips_success() {
        let empty = BTreeMap::new();
        let empty_items = BTreeMap::new();
        let report = PackageSyncReport::build(
            &empty,
            &empty_items,
            &empty,
            &empty,
            &empty_items,
            &empty,
            vec![RemovalError {
                item: "pkg-a.rpm".to_string(),
                message: "permission denied".to_string(),
            }],
            TransferReport::default(),
            PhaseTimings::default(),
        );
        assert!(!report.success);
    }

    #[test]
    fn transfer_errors_flip_success() {
        let empty = BTreeMap::new();
        let empty_items = BTreeMap::new();
        let transfer = TransferReport {
            successes: 0,
            bytes_transferred: 0,
            errors: vec![crate::transfer::TransferFailure {
                file_name: "pkg-a.rpm".to_string(),
                message: "connection reset".to_string(),
            }],
        };
        let report = PackageSyncReport::build(
            &empty,
            &empty_items,
            &empty,
            &empty,
            &empty_items,
            &empty,
            Vec::new(),
            transfer,
            PhaseTimings::default(),
        );
        assert!(!report.success);
    }

    #[test]
    fn advisory_kind_breakdown_counts_new_only() {
        let mut bugfix = sample_advisory("RHBA-2024:0001");
        bugfix.kind = AdvisoryKind::Bugfix;
        let security = sample_advisory("RHSA-2024:0002");

        let available = index_advisories(vec![bugfix.clone(), security.clone()]);
        let new = index_advisories(vec![bugfix, security]);
        let existing = BTreeMap::new();
        let orphaned = BTreeMap::new();
        let superseded = BTreeMap::new();

        let report = AdvisorySyncReport::build(
            &available,
            &existing,
            &new,
            &orphaned,
            &superseded,
            Vec::new(),
            Duration::from_secs(1),
        );

        assert!(report.success);
        assert_eq!(report.summary.num_new, 2);
        assert_eq!(report.summary.num_bugfix, 1);
        assert_eq!(report.summary.num_security, 1);
        assert_eq!(report.summary.num_enhancement, 0);
    }

    #[test]
    fn combined_report_requires_both_successes() {
        let packages = PackageSyncReport {
            success: true,
            ..Default::default()
        };
        let advisories = AdvisorySyncReport {
            success: false,
            ..Default::default()
        };
        let combined = SyncReport::combine(packages, advisories);
        assert!(!combined.success);
    }
}
