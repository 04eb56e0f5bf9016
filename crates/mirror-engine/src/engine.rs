//! Sync orchestration
//!
//! `SyncEngine` wires the pure reconciliation functions to the external
//! collaborators: feed loading, the transfer orchestrator, and the
//! mutation applier. All state is scoped to one run; the engine itself
//! holds only the storage root configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mirror_catalog::{
    AdvisoryKey, PackageKey, PackageRecord, index_advisories, index_packages, load_advisories,
    load_packages,
};
use mirror_fs::layout::PackageLocation;
use mirror_fs::{package_storage_path, verify_exists};

use crate::apply::MutationApplier;
use crate::inventory::{AdvisoryItem, InventoryItem, PackageItem};
use crate::progress::{ProgressSink, SyncStatus, SyncStep};
use crate::reconcile::{diff_new_advisories, diff_new_and_missing, diff_orphaned, diff_superseded};
use crate::summary::{AdvisorySyncReport, PackageSyncReport, PhaseTimings};
use crate::transfer::{TransferOrchestrator, TransferRequest};
use crate::verify::{artifact_matches, prune_unverified};
use crate::Result;

/// Coordinates one sync run against a feed directory
pub struct SyncEngine {
    storage_root: PathBuf,
}

impl SyncEngine {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }

    /// The root under which package artifacts are stored
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    fn assign_storage_path(&self, record: &mut PackageRecord) {
        let path = package_storage_path(
            &self.storage_root,
            &PackageLocation {
                name: &record.name,
                version: &record.version,
                release: &record.release,
                arch: &record.arch,
                checksum: &record.checksum,
                file_name: &record.file_name,
            },
        );
        record.storage_path = Some(path);
    }

    /// Run a full package sync: load the feed, reconcile against the
    /// inventory snapshot, transfer, verify, and apply mutations.
    ///
    /// Per-item failures (transfer, verification, removal) are data in
    /// the returned report, never errors; only environmental failures
    /// (the applier unable to persist at all) surface as `Err`.
    pub fn sync_packages(
        &self,
        feed_dir: &Path,
        inventory: BTreeMap<PackageKey, PackageItem>,
        orchestrator: &dyn TransferOrchestrator,
        applier: &mut dyn MutationApplier,
        progress: &dyn ProgressSink,
    ) -> Result<PackageSyncReport> {
        let total_start = Instant::now();
        progress.update(&SyncStatus::phase(SyncStep::ImportMetadata));

        let metadata_start = Instant::now();
        let records = load_packages(feed_dir);
        let available = index_packages(records);
        let metadata_elapsed = metadata_start.elapsed();
        tracing::info!(
            "{} packages available in the source feed, indexed in {:.2}s",
            available.len(),
            metadata_elapsed.as_secs_f64()
        );

        let orphaned = diff_orphaned(&available, &inventory);
        let (mut new, mut missing) = diff_new_and_missing(&available, &inventory, verify_exists);
        tracing::info!(
            "{} existing, {} orphaned, {} new, {} missing",
            inventory.len(),
            orphaned.len(),
            new.len(),
            missing.len()
        );

        // Storage paths are assigned once, before hand-off to the
        // orchestrator, and never recomputed afterwards.
        for record in new.values_mut() {
            self.assign_storage_path(record);
        }

        let requests: Vec<TransferRequest> = new
            .values()
            .chain(missing.values())
            .filter_map(|record| {
                let Some(target) = record.storage_path.clone() else {
                    tracing::warn!("No storage path for {}; skipping", record.file_name);
                    return None;
                };
                Some(TransferRequest {
                    record: record.clone(),
                    target,
                })
            })
            .collect();

        let transfer_start = Instant::now();
        let transfer_report = orchestrator.transfer(&requests, progress);
        let transfer_elapsed = transfer_start.elapsed();
        tracing::info!(
            "Finished transfer of {} items in {:.2}s ({} errors)",
            requests.len(),
            transfer_elapsed.as_secs_f64(),
            transfer_report.errors.len()
        );

        // Two-phase commit: only records whose artifact verifies on disk
        // (size and checksum, not just presence) are persisted; the rest
        // become not_synced.
        let not_synced = prune_unverified(&mut new, &mut missing, artifact_matches);
        if !not_synced.is_empty() {
            tracing::warn!("{} packages were not transferred", not_synced.len());
        }

        let accepted: Vec<InventoryItem> = new
            .values()
            .filter_map(|record| {
                let storage_path = record.storage_path.clone()?;
                Some(InventoryItem::Package(PackageItem {
                    package: record.clone(),
                    storage_path,
                }))
            })
            .collect();
        applier.save(accepted)?;

        let mut removal_errors = Vec::new();
        for item in orphaned.values() {
            if let Err(e) = applier.remove(&InventoryItem::Package(item.clone())) {
                tracing::error!("Unable to remove {}: {}", e.item, e.message);
                removal_errors.push(e);
            }
        }

        let report = PackageSyncReport::build(
            &available,
            &inventory,
            &new,
            &missing,
            &orphaned,
            &not_synced,
            removal_errors,
            transfer_report,
            PhaseTimings {
                metadata: metadata_elapsed,
                transfer: transfer_elapsed,
                total: total_start.elapsed(),
            },
        );

        progress.update(&SyncStatus {
            status: "finished".to_string(),
            error_count: report.details.transfer.errors.len() as u64,
            success_count: report.details.transfer.successes,
            step: SyncStep::Complete,
            ..SyncStatus::default()
        });

        Ok(report)
    }

    /// Run a full advisory sync: load the feed, reconcile (including
    /// supersession), and apply mutations. Advisories have no backing
    /// artifact, so there is no transfer or verification phase.
    pub fn sync_advisories(
        &self,
        feed_dir: &Path,
        inventory: BTreeMap<AdvisoryKey, AdvisoryItem>,
        applier: &mut dyn MutationApplier,
        progress: &dyn ProgressSink,
    ) -> Result<AdvisorySyncReport> {
        let start = Instant::now();
        progress.update(&SyncStatus::phase(SyncStep::ImportAdvisories));

        let records = load_advisories(feed_dir);
        let available = index_advisories(records);
        tracing::info!(
            "{} advisories available, {} existing",
            available.len(),
            inventory.len()
        );

        let orphaned = diff_orphaned(&available, &inventory);
        let (superseded_old, superseded_new) = diff_superseded(&available, &inventory);

        let mut new = diff_new_advisories(&available, &inventory);
        new.extend(superseded_new);

        let mut removal_errors = Vec::new();

        // Superseded advisories are removed first so the newer record is
        // a clean re-add.
        for item in superseded_old.values() {
            if let Err(e) = applier.remove(&InventoryItem::Advisory(item.clone())) {
                tracing::error!("Unable to remove {}: {}", e.item, e.message);
                removal_errors.push(e);
            }
        }

        let accepted: Vec<InventoryItem> = new
            .values()
            .map(|record| {
                InventoryItem::Advisory(AdvisoryItem {
                    advisory: record.clone(),
                })
            })
            .collect();
        applier.save(accepted)?;

        for item in orphaned.values() {
            if let Err(e) = applier.remove(&InventoryItem::Advisory(item.clone())) {
                tracing::error!("Unable to remove {}: {}", e.item, e.message);
                removal_errors.push(e);
            }
        }

        let report = AdvisorySyncReport::build(
            &available,
            &inventory,
            &new,
            &orphaned,
            &superseded_old,
            removal_errors,
            start.elapsed(),
        );

        progress.update(&SyncStatus {
            status: "finished".to_string(),
            success_count: report.summary.num_new,
            step: SyncStep::Complete,
            ..SyncStatus::default()
        });

        Ok(report)
    }
}
