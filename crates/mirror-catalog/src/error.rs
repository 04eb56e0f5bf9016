//! Error types for mirror-catalog

use std::path::PathBuf;

/// Result type for mirror-catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-catalog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record is missing a field required for identity-key derivation.
    ///
    /// Callers are expected to catch-and-skip per record; a single
    /// malformed record must never abort a reconciliation.
    #[error("Malformed {record} record: empty required field '{field}'")]
    MalformedRecord {
        record: &'static str,
        field: &'static str,
    },

    /// A feed file could not be parsed.
    #[error("Failed to parse feed at {path}: {message}")]
    FeedParse { path: PathBuf, message: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
