//! Catalog data model for Mirror Manager
//!
//! This crate defines the normalized records a remote repository
//! advertises (package artifacts and errata advisories), the derived
//! identity keys all set operations are computed over, and the loader
//! that reads a feed directory into record vectors.
//!
//! Records are created once per sync run by the loader, consumed by the
//! reconciliation engine, and discarded; only inventory items derived
//! from them are ever persisted.

pub mod error;
pub mod key;
pub mod loader;
pub mod record;

pub use error::{Error, Result};
pub use key::{AdvisoryKey, PackageKey, index_advisories, index_packages};
pub use loader::{load_advisories, load_packages};
pub use record::{
    AdvisoryKind, AdvisoryRecord, AffectedPackage, ChecksumKind, Domain, PackageRecord,
};
