//! Filesystem layer for Mirror Manager
//!
//! Provides content checksums, the on-disk storage layout for mirrored
//! artifacts, and the existence/verification primitives the sync engine
//! delegates to.

pub mod checksum;
pub mod error;
pub mod io;
pub mod layout;
pub mod verify;

pub use checksum::{compute_content_checksum, compute_file_checksum};
pub use error::{Error, Result};
pub use io::write_atomic;
pub use layout::{PackageLocation, mirror_link_path, package_storage_path};
pub use verify::{verify_exists, verify_size};
