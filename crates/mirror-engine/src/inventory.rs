//! Inventory ledger
//!
//! The ledger is the persisted record of everything previously imported
//! into the mirror: one item per package artifact (with its on-disk
//! storage path) and one per advisory. It is the "existing" side of every
//! reconciliation, addressable by the same identity keys as the catalog.
//!
//! Persistence is a versioned TOML document, loaded with a shared lock
//! and saved with an exclusive lock plus write-to-temp-then-rename.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use mirror_catalog::{AdvisoryKey, AdvisoryRecord, Domain, PackageKey, PackageRecord};
use mirror_fs::write_atomic;

use crate::{Error, Result};

/// A persisted package artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageItem {
    /// Where the backing file lives on disk
    pub storage_path: PathBuf,
    pub package: PackageRecord,
}

impl PackageItem {
    /// Identity key of the persisted package
    pub fn key(&self) -> mirror_catalog::Result<PackageKey> {
        PackageKey::derive(&self.package)
    }
}

/// A persisted advisory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryItem {
    pub advisory: AdvisoryRecord,
}

impl AdvisoryItem {
    /// Identity key of the persisted advisory
    pub fn key(&self) -> mirror_catalog::Result<AdvisoryKey> {
        AdvisoryKey::derive(&self.advisory)
    }
}

/// A persisted item of either domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InventoryItem {
    Package(PackageItem),
    Advisory(AdvisoryItem),
}

impl InventoryItem {
    /// Human-readable identifier used in logs and removal errors
    pub fn display_name(&self) -> &str {
        match self {
            InventoryItem::Package(item) => &item.package.file_name,
            InventoryItem::Advisory(item) => &item.advisory.id,
        }
    }
}

/// The persisted inventory of a mirrored repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryLedger {
    /// Ledger format version for forward compatibility
    version: String,
    #[serde(default)]
    packages: Vec<PackageItem>,
    #[serde(default)]
    advisories: Vec<AdvisoryItem>,
}

impl InventoryLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            packages: Vec::new(),
            advisories: Vec::new(),
        }
    }

    /// Load a ledger from a TOML file with shared lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, locked, or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::Ledger {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.lock_shared().map_err(|e| Error::Ledger {
            path: path.to_path_buf(),
            message: format!("lock failed: {}", e),
        })?;

        // Read through the locked handle to avoid a TOCTOU race
        let mut content = String::new();
        (&file).read_to_string(&mut content)?;
        let ledger: InventoryLedger = toml::from_str(&content)?;

        // Lock released when file is dropped
        Ok(ledger)
    }

    /// Load a ledger, or start empty if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Save the ledger to a TOML file atomically with exclusive lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or locked.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    /// Index all persisted packages by identity key.
    ///
    /// Items whose key cannot be derived (hand-edited ledgers) are
    /// skipped with a logged anomaly rather than failing the whole query.
    pub fn package_index(&self) -> BTreeMap<PackageKey, PackageItem> {
        let mut index = BTreeMap::new();
        for item in &self.packages {
            match item.key() {
                Ok(key) => {
                    index.insert(key, item.clone());
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping inventory item '{}': {}",
                        item.package.file_name,
                        e
                    );
                }
            }
        }
        index
    }

    /// Index all persisted advisories by identity key.
    pub fn advisory_index(&self) -> BTreeMap<AdvisoryKey, AdvisoryItem> {
        let mut index = BTreeMap::new();
        for item in &self.advisories {
            match item.key() {
                Ok(key) => {
                    index.insert(key, item.clone());
                }
                Err(e) => {
                    tracing::warn!("Skipping inventory advisory '{}': {}", item.advisory.id, e);
                }
            }
        }
        index
    }

    /// Iterate persisted items belonging to one domain.
    pub fn items(&self, domain: Domain) -> Vec<InventoryItem> {
        match domain {
            Domain::Package => self
                .packages
                .iter()
                .filter(|i| !i.package.is_source())
                .cloned()
                .map(InventoryItem::Package)
                .collect(),
            Domain::SrcPackage => self
                .packages
                .iter()
                .filter(|i| i.package.is_source())
                .cloned()
                .map(InventoryItem::Package)
                .collect(),
            Domain::Advisory => self
                .advisories
                .iter()
                .cloned()
                .map(InventoryItem::Advisory)
                .collect(),
        }
    }

    /// Insert a package item, replacing any previous item with the same key.
    pub fn insert_package(&mut self, item: PackageItem) {
        self.remove_package_by_record(&item.package);
        self.packages.push(item);
    }

    /// Insert an advisory item, replacing any previous item with the same id.
    pub fn insert_advisory(&mut self, item: AdvisoryItem) {
        self.advisories.retain(|i| i.advisory.id != item.advisory.id);
        self.advisories.push(item);
    }

    /// Remove a package item by key. Returns the removed item if present.
    pub fn remove_package(&mut self, key: &PackageKey) -> Option<PackageItem> {
        let pos = self
            .packages
            .iter()
            .position(|i| i.key().as_ref().ok() == Some(key))?;
        Some(self.packages.remove(pos))
    }

    /// Remove an advisory item by key. Returns the removed item if present.
    pub fn remove_advisory(&mut self, key: &AdvisoryKey) -> Option<AdvisoryItem> {
        let pos = self.advisories.iter().position(|i| i.advisory.id == key.0)?;
        Some(self.advisories.remove(pos))
    }

    fn remove_package_by_record(&mut self, record: &PackageRecord) {
        if let Ok(key) = PackageKey::derive(record) {
            self.remove_package(&key);
        }
    }
}
