//! End-to-end sync lifecycle tests
//!
//! Each test drives the full pipeline the CLI drives: load feeds from a
//! directory, reconcile against the inventory ledger, transfer through
//! the file-copy orchestrator, verify, apply mutations, and persist the
//! ledger. The ledger is reloaded from disk between runs to exercise the
//! same restart path a real operator hits.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

use mirror_catalog::PackageRecord;
use mirror_engine::{
    AdvisorySyncReport, FileCopyOrchestrator, InventoryLedger, LedgerApplier, NullSink,
    PackageSyncReport, SyncEngine,
};
use mirror_test_utils::{
    package_payload, sample_advisory, sample_package, write_advisory_feed, write_package_feed,
};

struct Mirror {
    _root: TempDir,
    feed_dir: PathBuf,
    source_dir: PathBuf,
    storage_root: PathBuf,
    working_dir: PathBuf,
    ledger_path: PathBuf,
}

impl Mirror {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let mirror = Self {
            feed_dir: root.path().join("feed"),
            source_dir: root.path().join("feed/artifacts"),
            storage_root: root.path().join("mirror/packages"),
            working_dir: root.path().join("mirror/.mirror/work"),
            ledger_path: root.path().join("mirror/.mirror/ledger.toml"),
            _root: root,
        };
        std::fs::create_dir_all(&mirror.source_dir).unwrap();
        mirror
    }

    fn seed_artifact(&self, pkg: &PackageRecord) {
        std::fs::write(self.source_dir.join(&pkg.file_name), package_payload(&pkg.name)).unwrap();
    }

    /// Run a package sync against a freshly loaded ledger, saving it after.
    fn sync_packages(&self) -> PackageSyncReport {
        let mut ledger = InventoryLedger::load_or_default(&self.ledger_path).unwrap();
        let engine = SyncEngine::new(&self.storage_root);
        let orchestrator = FileCopyOrchestrator::new(&self.source_dir);
        let inventory = ledger.package_index();
        let report = {
            let mut applier = LedgerApplier::new(&mut ledger, &self.working_dir, "it-repo");
            engine
                .sync_packages(&self.feed_dir, inventory, &orchestrator, &mut applier, &NullSink)
                .unwrap()
        };
        ledger.save(&self.ledger_path).unwrap();
        report
    }

    fn sync_advisories(&self) -> AdvisorySyncReport {
        let mut ledger = InventoryLedger::load_or_default(&self.ledger_path).unwrap();
        let engine = SyncEngine::new(&self.storage_root);
        let inventory = ledger.advisory_index();
        let report = {
            let mut applier = LedgerApplier::new(&mut ledger, &self.working_dir, "it-repo");
            engine
                .sync_advisories(&self.feed_dir, inventory, &mut applier, &NullSink)
                .unwrap()
        };
        ledger.save(&self.ledger_path).unwrap();
        report
    }

    fn ledger(&self) -> InventoryLedger {
        InventoryLedger::load_or_default(&self.ledger_path).unwrap()
    }
}

fn storage_paths(ledger: &InventoryLedger) -> Vec<PathBuf> {
    ledger
        .package_index()
        .into_values()
        .map(|item| item.storage_path)
        .collect()
}

#[test]
fn full_package_lifecycle_across_restarts() {
    let mirror = Mirror::new();

    // Run 1: two packages, both new
    let pkg_a = sample_package("pkg-a");
    let pkg_b = sample_package("pkg-b");
    mirror.seed_artifact(&pkg_a);
    mirror.seed_artifact(&pkg_b);
    write_package_feed(&mirror.feed_dir, &[pkg_a.clone(), pkg_b.clone()]);

    let report = mirror.sync_packages();
    assert!(report.success);
    assert_eq!(report.summary.num_synced_new_rpms, 2);
    for path in storage_paths(&mirror.ledger()) {
        assert!(path.exists(), "artifact missing at {}", path.display());
    }

    // Run 2 (fresh ledger load): unchanged feed is a no-op
    let report = mirror.sync_packages();
    assert!(report.success);
    assert_eq!(report.summary.num_existing, 2);
    assert_eq!(report.summary.num_synced_new_rpms, 0);
    assert_eq!(report.summary.num_resynced_rpms, 0);
    assert_eq!(report.summary.num_orphaned_rpms, 0);

    // Run 3: pkg-b leaves the feed, pkg-c joins, pkg-a's artifact vanishes
    let pkg_c = sample_package("pkg-c");
    mirror.seed_artifact(&pkg_c);
    write_package_feed(&mirror.feed_dir, &[pkg_a.clone(), pkg_c.clone()]);
    let stored: Vec<PathBuf> = storage_paths(&mirror.ledger())
        .into_iter()
        .filter(|p| p.to_string_lossy().contains("pkg-a"))
        .collect();
    std::fs::remove_file(&stored[0]).unwrap();

    let report = mirror.sync_packages();
    assert!(report.success);
    assert_eq!(report.summary.num_synced_new_rpms, 1); // pkg-c
    assert_eq!(report.summary.num_resynced_rpms, 1); // pkg-a
    assert_eq!(report.summary.num_orphaned_rpms, 1); // pkg-b

    let ledger = mirror.ledger();
    let names: Vec<String> = ledger
        .package_index()
        .into_values()
        .map(|item| item.package.name)
        .collect();
    assert_eq!(names, vec!["pkg-a".to_string(), "pkg-c".to_string()]);
    assert!(stored[0].exists(), "resynced artifact should be back");
}

#[test]
fn src_packages_are_counted_separately() {
    let mirror = Mirror::new();
    let rpm = sample_package("tool");
    let mut srpm = sample_package("tool-src");
    srpm.arch = "src".to_string();
    mirror.seed_artifact(&rpm);
    mirror.seed_artifact(&srpm);
    write_package_feed(&mirror.feed_dir, &[rpm, srpm]);

    let report = mirror.sync_packages();
    assert!(report.success);
    assert_eq!(report.summary.num_synced_new_rpms, 1);
    assert_eq!(report.summary.num_synced_new_srpms, 1);
}

#[test]
fn advisory_supersession_lifecycle() {
    let mirror = Mirror::new();

    // Inventory gets the January revision of the advisory
    let mut advisory = sample_advisory("RHSA-2024:0001");
    advisory.updated = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    write_advisory_feed(&mirror.feed_dir, &[advisory.clone()]);
    let report = mirror.sync_advisories();
    assert_eq!(report.summary.num_new, 1);
    assert_eq!(report.summary.num_security, 1);

    // The June revision supersedes it
    advisory.updated = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    advisory.pushcount = 2;
    write_advisory_feed(&mirror.feed_dir, &[advisory.clone()]);
    let report = mirror.sync_advisories();
    assert!(report.success);
    assert_eq!(report.summary.num_superseded, 1);
    assert_eq!(report.summary.num_new, 1);

    let stored = mirror.ledger().advisory_index().into_values().next().unwrap();
    assert_eq!(stored.advisory.updated, advisory.updated);
    assert_eq!(stored.advisory.pushcount, 2);

    // Re-presenting the same revision is a no-op
    let report = mirror.sync_advisories();
    assert_eq!(report.summary.num_new, 0);
    assert_eq!(report.summary.num_superseded, 0);
    assert_eq!(report.summary.num_existing, 1);
}

#[test]
fn unverified_transfer_never_reaches_the_ledger() {
    let mirror = Mirror::new();
    let present = sample_package("pkg-present");
    let absent = sample_package("pkg-absent");
    mirror.seed_artifact(&present);
    // pkg-absent has no source artifact: its transfer fails silently from
    // the engine's point of view and verification must catch it.
    write_package_feed(&mirror.feed_dir, &[present, absent]);

    let report = mirror.sync_packages();
    assert!(!report.success);
    assert_eq!(report.summary.num_not_synced_rpms, 1);
    assert_eq!(report.details.not_synced, vec!["pkg-absent.rpm".to_string()]);

    let ledger = mirror.ledger();
    assert_eq!(ledger.package_index().len(), 1);
    for path in storage_paths(&ledger) {
        assert!(path.exists());
    }
}

#[test]
fn corrupted_source_artifact_is_rejected_by_verification() {
    let mirror = Mirror::new();
    let good = sample_package("pkg-good");
    let corrupt = sample_package("pkg-corrupt");
    mirror.seed_artifact(&good);
    // Right file name and size, wrong bytes: the copy itself succeeds and
    // only the checksum comparison can catch it.
    std::fs::write(
        mirror.source_dir.join(&corrupt.file_name),
        vec![b'?'; corrupt.size as usize],
    )
    .unwrap();
    write_package_feed(&mirror.feed_dir, &[good, corrupt]);

    let report = mirror.sync_packages();
    assert_eq!(report.summary.num_synced_new_rpms, 1);
    assert_eq!(report.summary.num_not_synced_rpms, 1);
    assert_eq!(report.details.not_synced, vec!["pkg-corrupt.rpm".to_string()]);
    assert_eq!(mirror.ledger().package_index().len(), 1);
}

#[test]
fn garbled_feed_still_yields_a_report() {
    let mirror = Mirror::new();
    std::fs::create_dir_all(&mirror.feed_dir).unwrap();
    std::fs::write(mirror.feed_dir.join("packages.json"), "}{ garbled").unwrap();
    std::fs::write(mirror.feed_dir.join("advisories.json"), "[1, 2, oops").unwrap();

    let packages = mirror.sync_packages();
    let advisories = mirror.sync_advisories();

    assert!(packages.success);
    assert_eq!(packages.summary.num_available, 0);
    assert!(advisories.success);
    assert_eq!(advisories.summary.num_available, 0);
}

#[test]
fn orphan_removal_cleans_storage_and_mirror_link() {
    let mirror = Mirror::new();
    let pkg = sample_package("pkg-gone");
    mirror.seed_artifact(&pkg);
    write_package_feed(&mirror.feed_dir, &[pkg.clone()]);
    mirror.sync_packages();

    let stored = storage_paths(&mirror.ledger());
    assert!(stored[0].exists());

    // Simulate the flat mirror link a publisher would have created
    let link = mirror_fs::mirror_link_path(&mirror.working_dir, "it-repo", &pkg.file_name);
    std::fs::create_dir_all(link.parent().unwrap()).unwrap();
    std::fs::write(&link, b"link").unwrap();

    write_package_feed(&mirror.feed_dir, &[]);
    let report = mirror.sync_packages();
    assert!(report.success);
    assert_eq!(report.summary.num_orphaned_rpms, 1);
    assert!(mirror.ledger().package_index().is_empty());
    assert!(!stored[0].exists());
    assert!(!link.exists());
}

#[test]
fn combined_report_reflects_both_domains() {
    let mirror = Mirror::new();
    let pkg = sample_package("pkg-a");
    mirror.seed_artifact(&pkg);
    write_package_feed(&mirror.feed_dir, &[pkg]);
    write_advisory_feed(&mirror.feed_dir, &[sample_advisory("RHSA-2024:0001")]);

    let packages = mirror.sync_packages();
    let advisories = mirror.sync_advisories();
    let combined = mirror_engine::SyncReport::combine(packages, advisories);

    assert!(combined.success);
    assert_eq!(combined.packages.summary.num_synced_new_rpms, 1);
    assert_eq!(combined.advisories.summary.num_new, 1);
}

#[test]
fn check_equivalent_walk_finds_missing_artifacts() {
    let mirror = Mirror::new();
    let pkg = sample_package("pkg-a");
    mirror.seed_artifact(&pkg);
    write_package_feed(&mirror.feed_dir, &[pkg]);
    mirror.sync_packages();

    let ledger = mirror.ledger();
    let all_present = storage_paths(&ledger)
        .iter()
        .all(|p| mirror_fs::verify_exists(p));
    assert!(all_present);

    for path in storage_paths(&ledger) {
        std::fs::remove_file(&path).unwrap();
    }
    let any_present = storage_paths(&ledger)
        .iter()
        .any(|p| mirror_fs::verify_exists(p));
    assert!(!any_present);
}
