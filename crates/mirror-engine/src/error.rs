//! Error types for mirror-engine

use std::path::PathBuf;

/// Result type for mirror-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-engine operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Inventory ledger could not be read or written
    #[error("Ledger error at {path}: {message}")]
    Ledger { path: PathBuf, message: String },

    /// Catalog error from mirror-catalog
    #[error(transparent)]
    Catalog(#[from] mirror_catalog::Error),

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
