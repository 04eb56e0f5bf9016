//! Reconciliation engine for Mirror Manager
//!
//! This crate computes, for a remote catalog and a local inventory, the
//! minimal set of additions, re-fetches, and removals that brings the
//! mirror in sync, then drives transfer, post-transfer verification, and
//! mutation application to completion.
//!
//! # Architecture
//!
//! `mirror-engine` sits above the Layer 0 crates and below the CLI:
//!
//! ```text
//!            mirror-cli
//!                |
//!           mirror-engine
//!                |
//!       +--------+--------+
//!       |                 |
//!   mirror-fs      mirror-catalog
//! ```
//!
//! The reconciliation functions in [`reconcile`] are pure: they take the
//! catalog index, the inventory index, and an injected existence check,
//! and share no mutable state. Everything with side effects (transfer,
//! persistence, deletion) lives behind the [`TransferOrchestrator`] and
//! [`MutationApplier`] traits.

pub mod apply;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod progress;
pub mod reconcile;
pub mod summary;
pub mod transfer;
pub mod verify;

pub use apply::{LedgerApplier, MutationApplier, RemovalError};
pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use inventory::{AdvisoryItem, InventoryItem, InventoryLedger, PackageItem};
pub use progress::{LogSink, NullSink, ProgressSink, SyncStatus, SyncStep};
pub use reconcile::{diff_new_advisories, diff_new_and_missing, diff_orphaned, diff_superseded};
pub use summary::{AdvisorySyncReport, PackageSyncDetails, PackageSyncReport, SyncReport};
pub use transfer::{
    FileCopyOrchestrator, TransferFailure, TransferOrchestrator, TransferReport, TransferRequest,
};
pub use verify::{artifact_matches, prune_unverified};
