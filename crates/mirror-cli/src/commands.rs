//! Command implementations

use colored::Colorize;
use std::path::{Path, PathBuf};

use mirror_catalog::Domain;
use mirror_engine::{
    FileCopyOrchestrator, InventoryItem, InventoryLedger, LedgerApplier, LogSink, SyncEngine,
    SyncReport,
};
use mirror_fs::verify_exists;

use crate::error::Result;

pub fn default_ledger_path(root: &Path) -> PathBuf {
    root.join(".mirror").join("ledger.toml")
}

fn working_dir(root: &Path) -> PathBuf {
    root.join(".mirror").join("work")
}

/// Run a full package + advisory sync. Returns the overall success flag.
pub fn run_sync(
    feed: &Path,
    root: &Path,
    source: Option<PathBuf>,
    ledger_path: Option<PathBuf>,
    repo_id: &str,
    json: bool,
) -> Result<bool> {
    let ledger_path = ledger_path.unwrap_or_else(|| default_ledger_path(root));
    let source = source.unwrap_or_else(|| feed.join("artifacts"));
    let work = working_dir(root);

    let mut ledger = InventoryLedger::load_or_default(&ledger_path)?;
    let engine = SyncEngine::new(root.join("packages"));
    let orchestrator = FileCopyOrchestrator::new(&source);
    let sink = LogSink;

    let package_inventory = ledger.package_index();
    let advisory_inventory = ledger.advisory_index();

    let packages = {
        let mut applier = LedgerApplier::new(&mut ledger, &work, repo_id);
        engine.sync_packages(feed, package_inventory, &orchestrator, &mut applier, &sink)?
    };
    let advisories = {
        let mut applier = LedgerApplier::new(&mut ledger, &work, repo_id);
        engine.sync_advisories(feed, advisory_inventory, &mut applier, &sink)?
    };

    ledger.save(&ledger_path)?;

    let report = SyncReport::combine(packages, advisories);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(report.success)
}

fn print_report(report: &SyncReport) {
    let pkg = &report.packages.summary;
    let adv = &report.advisories.summary;

    let headline = if report.success {
        "Sync complete".green().bold()
    } else {
        "Sync finished with errors".red().bold()
    };
    println!("{}", headline);
    println!();
    println!(
        "Packages:   {} available, {} new, {} resynced, {} orphaned, {} not synced",
        pkg.num_available,
        pkg.num_synced_new_rpms + pkg.num_synced_new_srpms,
        pkg.num_resynced_rpms + pkg.num_resynced_srpms,
        pkg.num_orphaned_rpms + pkg.num_orphaned_srpms,
        pkg.num_not_synced_rpms + pkg.num_not_synced_srpms,
    );
    println!(
        "Advisories: {} available, {} new ({} security, {} bugfix, {} enhancement, {} other), {} orphaned",
        adv.num_available,
        adv.num_new,
        adv.num_security,
        adv.num_bugfix,
        adv.num_enhancement,
        adv.num_other,
        adv.num_orphaned,
    );
    println!(
        "Elapsed:    metadata {:.2}s, transfer {:.2}s, total {:.2}s",
        pkg.time_metadata_secs, pkg.time_transfer_secs, pkg.time_total_secs
    );

    for failure in &report.packages.details.transfer.errors {
        println!(
            "  {} transfer failed: {} ({})",
            "!".red(),
            failure.file_name,
            failure.message
        );
    }
    for error in &pkg.removal_errors {
        println!("  {} removal failed: {}", "!".red(), error);
    }
    for error in &adv.removal_errors {
        println!("  {} removal failed: {}", "!".red(), error);
    }
}

/// Print inventory counts from the ledger.
pub fn run_status(root: &Path, ledger_path: Option<PathBuf>, json: bool) -> Result<()> {
    let ledger_path = ledger_path.unwrap_or_else(|| default_ledger_path(root));
    let ledger = InventoryLedger::load_or_default(&ledger_path)?;

    let rpms = ledger.items(Domain::Package).len();
    let srpms = ledger.items(Domain::SrcPackage).len();
    let advisories = ledger.items(Domain::Advisory).len();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ledger": ledger_path,
                "rpms": rpms,
                "srpms": srpms,
                "advisories": advisories,
            })
        );
    } else {
        println!("{} {}", "ledger".cyan().bold(), ledger_path.display());
        println!("  rpms:       {}", rpms);
        println!("  srpms:      {}", srpms);
        println!("  advisories: {}", advisories);
    }
    Ok(())
}

/// Verify every inventory artifact still exists. Returns true when clean.
pub fn run_check(root: &Path, ledger_path: Option<PathBuf>) -> Result<bool> {
    let ledger_path = ledger_path.unwrap_or_else(|| default_ledger_path(root));
    let ledger = InventoryLedger::load_or_default(&ledger_path)?;

    let mut missing = Vec::new();
    for domain in [Domain::Package, Domain::SrcPackage] {
        for item in ledger.items(domain) {
            if let InventoryItem::Package(item) = item
                && !verify_exists(&item.storage_path)
            {
                missing.push(item);
            }
        }
    }

    if missing.is_empty() {
        println!("{} all artifacts present", "ok".green().bold());
        Ok(true)
    } else {
        println!(
            "{} {} artifacts missing:",
            "missing".red().bold(),
            missing.len()
        );
        for item in &missing {
            println!("  {}", item.storage_path.display());
        }
        Ok(false)
    }
}
