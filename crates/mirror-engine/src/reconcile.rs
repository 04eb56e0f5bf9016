//! Set reconciliation
//!
//! The heart of the sync: given the catalog index (what the remote source
//! advertises) and the inventory index (what is already persisted), work
//! out what is new, what needs a re-fetch, what has been orphaned, and
//! which advisories are superseded.
//!
//! All functions here are pure over their explicit arguments. The only
//! outside dependency — whether an artifact still exists on disk — is
//! injected as a closure, so every diff is directly testable and the
//! whole reconciliation is idempotent: re-running with unchanged inputs
//! yields empty diffs.
//!
//! Every operation is O(|catalog| + |inventory|) via direct key lookups.

use std::collections::BTreeMap;
use std::path::Path;

use mirror_catalog::{AdvisoryKey, AdvisoryRecord, PackageKey, PackageRecord};

use crate::inventory::{AdvisoryItem, PackageItem};

/// Determine which catalog packages are new and which need a re-fetch.
///
/// For each key in the catalog: absent from the inventory means `new`;
/// present but failing the artifact existence check means `missing`
/// (resync candidate), with the storage path copied from the inventory
/// item so the re-fetch lands exactly where the original did. Keys
/// present in both with a verified artifact are already synced and
/// skipped.
pub fn diff_new_and_missing<F>(
    catalog: &BTreeMap<PackageKey, PackageRecord>,
    inventory: &BTreeMap<PackageKey, PackageItem>,
    exists: F,
) -> (
    BTreeMap<PackageKey, PackageRecord>,
    BTreeMap<PackageKey, PackageRecord>,
)
where
    F: Fn(&Path) -> bool,
{
    let mut new = BTreeMap::new();
    let mut missing = BTreeMap::new();

    for (key, record) in catalog {
        match inventory.get(key) {
            None => {
                new.insert(key.clone(), record.clone());
            }
            Some(item) => {
                if !exists(&item.storage_path) {
                    tracing::info!(
                        "Missing an existing artifact: {}. Will add to resync.",
                        item.storage_path.display()
                    );
                    let mut record = record.clone();
                    record.storage_path = Some(item.storage_path.clone());
                    missing.insert(key.clone(), record);
                }
            }
        }
    }

    (new, missing)
}

/// Determine which inventory items no longer appear in the catalog.
///
/// Generic over both domains: an orphan is simply an inventory key with
/// no catalog counterpart.
pub fn diff_orphaned<K, C, I>(
    catalog: &BTreeMap<K, C>,
    inventory: &BTreeMap<K, I>,
) -> BTreeMap<K, I>
where
    K: Ord + Clone,
    I: Clone,
{
    let mut orphaned = BTreeMap::new();
    for (key, item) in inventory {
        if !catalog.contains_key(key) {
            orphaned.insert(key.clone(), item.clone());
        }
    }
    orphaned
}

/// Determine which catalog advisories are new (absent from the inventory).
///
/// Supersession of advisories present in both is handled separately by
/// [`diff_superseded`].
pub fn diff_new_advisories(
    catalog: &BTreeMap<AdvisoryKey, AdvisoryRecord>,
    inventory: &BTreeMap<AdvisoryKey, AdvisoryItem>,
) -> BTreeMap<AdvisoryKey, AdvisoryRecord> {
    let mut new = BTreeMap::new();
    for (key, record) in catalog {
        if !inventory.contains_key(key) {
            new.insert(key.clone(), record.clone());
        }
    }
    new
}

/// Determine which advisories present on both sides are superseded.
///
/// A catalog advisory whose `updated` timestamp is strictly newer than
/// the inventory item's replaces it: the old item goes to the first map
/// (for removal) and the catalog record to the second (for re-add).
///
/// An equal-or-older catalog timestamp is a no-op; equal timestamps are
/// deliberately not treated as updates, so repeated syncs of an
/// unchanged source do not churn.
pub fn diff_superseded(
    catalog: &BTreeMap<AdvisoryKey, AdvisoryRecord>,
    inventory: &BTreeMap<AdvisoryKey, AdvisoryItem>,
) -> (
    BTreeMap<AdvisoryKey, AdvisoryItem>,
    BTreeMap<AdvisoryKey, AdvisoryRecord>,
) {
    let mut superseded_old = BTreeMap::new();
    let mut superseded_new = BTreeMap::new();

    for (key, record) in catalog {
        if let Some(item) = inventory.get(key) {
            if record.updated <= item.advisory.updated {
                tracing::debug!("Advisory {} already latest; skipping", key);
                continue;
            }
            tracing::info!("Advisory {} superseded; will replace", key);
            superseded_old.insert(key.clone(), item.clone());
            superseded_new.insert(key.clone(), record.clone());
        }
    }

    (superseded_old, superseded_new)
}
