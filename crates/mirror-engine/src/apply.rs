//! Mutation application
//!
//! The applier is the only component that touches persisted state: it
//! commits verified items into the inventory and deletes orphaned ones.
//! Removal is best-effort with partial-failure isolation: each of the
//! three deletions (ledger record, backing file, mirror link) is
//! attempted independently, and one item's failure never stops the rest
//! of the batch.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use mirror_fs::{mirror_link_path, verify_exists};

use crate::inventory::{InventoryItem, InventoryLedger};
use crate::Result;

/// A failed removal, kept for the final report
#[derive(Debug, Clone, Serialize)]
pub struct RemovalError {
    /// File name or advisory id of the item that failed
    pub item: String,
    pub message: String,
}

impl fmt::Display for RemovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item, self.message)
    }
}

/// Persists accepted items and deletes orphaned ones
pub trait MutationApplier {
    /// Persist verified new/resynced items. Safe to call once per item
    /// per run; saving an item whose key already exists replaces it.
    fn save(&mut self, items: Vec<InventoryItem>) -> Result<()>;

    /// Delete one item: its persisted record, its backing file, and any
    /// secondary reference pointing at it.
    fn remove(&mut self, item: &InventoryItem) -> std::result::Result<(), RemovalError>;
}

/// Applier backed by the TOML inventory ledger and the local filesystem.
///
/// Ledger mutations happen in memory; the caller saves the ledger once
/// the run completes. A crash mid-run leaves the previous ledger intact,
/// which is safe because reconciliation re-derives everything from
/// current state on the next run.
pub struct LedgerApplier<'a> {
    ledger: &'a mut InventoryLedger,
    working_dir: PathBuf,
    repo_id: String,
}

impl<'a> LedgerApplier<'a> {
    pub fn new(
        ledger: &'a mut InventoryLedger,
        working_dir: impl Into<PathBuf>,
        repo_id: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            working_dir: working_dir.into(),
            repo_id: repo_id.into(),
        }
    }
}

impl MutationApplier for LedgerApplier<'_> {
    fn save(&mut self, items: Vec<InventoryItem>) -> Result<()> {
        for item in items {
            match item {
                InventoryItem::Package(item) => self.ledger.insert_package(item),
                InventoryItem::Advisory(item) => self.ledger.insert_advisory(item),
            }
        }
        Ok(())
    }

    fn remove(&mut self, item: &InventoryItem) -> std::result::Result<(), RemovalError> {
        tracing::info!("Removing item <{}>", item.display_name());
        let mut failures: Vec<String> = Vec::new();

        match item {
            InventoryItem::Package(package_item) => {
                match package_item.key() {
                    Ok(key) => {
                        if self.ledger.remove_package(&key).is_none() {
                            failures.push("record not present in ledger".to_string());
                        }
                    }
                    Err(e) => failures.push(format!("key derivation failed: {}", e)),
                }

                // Backing file and mirror link are deleted independently;
                // a file already gone is not a failure.
                let link = mirror_link_path(
                    &self.working_dir,
                    &self.repo_id,
                    &package_item.package.file_name,
                );
                for path in [&package_item.storage_path, &link] {
                    if verify_exists(path) {
                        tracing::debug!("Delete: {}", path.display());
                        if let Err(e) = std::fs::remove_file(path) {
                            failures.push(format!("failed to delete {}: {}", path.display(), e));
                        }
                    }
                }
            }
            InventoryItem::Advisory(advisory_item) => match advisory_item.key() {
                Ok(key) => {
                    if self.ledger.remove_advisory(&key).is_none() {
                        failures.push("record not present in ledger".to_string());
                    }
                }
                Err(e) => failures.push(format!("key derivation failed: {}", e)),
            },
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RemovalError {
                item: item.display_name().to_string(),
                message: failures.join("; "),
            })
        }
    }
}
