//! Progress reporting
//!
//! The engine emits structured status updates at coarse phase boundaries
//! and the transfer orchestrator emits them per item. Sinks are
//! fire-and-forget and synchronous; nothing on the correctness path ever
//! depends on a sink observing an update.

use serde::Serialize;
use std::fmt;

/// Phase of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    /// Loading and indexing remote metadata
    #[default]
    ImportMetadata,
    /// Transferring package artifacts
    TransferArtifacts,
    /// Importing errata advisories
    ImportAdvisories,
    /// Run finished
    Complete,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStep::ImportMetadata => write!(f, "Importing Metadata"),
            SyncStep::TransferArtifacts => write!(f, "Transferring Artifacts"),
            SyncStep::ImportAdvisories => write!(f, "Importing Advisories"),
            SyncStep::Complete => write!(f, "Complete"),
        }
    }
}

/// A structured status update
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStatus {
    pub items_total: u64,
    pub items_left: u64,
    pub size_total: u64,
    pub size_left: u64,
    /// Name of the item currently in flight, if any
    pub item_name: Option<String>,
    /// Free-form state, e.g. "downloading", "finished"
    pub status: String,
    /// Domain of the current item ("rpm", "srpm", "advisory")
    pub item_type: Option<String>,
    pub error_count: u64,
    pub success_count: u64,
    pub details: Vec<String>,
    pub error_details: Vec<String>,
    pub step: SyncStep,
}

impl SyncStatus {
    /// Status marking the start of a phase
    pub fn phase(step: SyncStep) -> Self {
        Self {
            step,
            status: "running".to_string(),
            ..Self::default()
        }
    }
}

/// Consumer of status updates
pub trait ProgressSink {
    fn update(&self, status: &SyncStatus);
}

/// Sink that discards all updates
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn update(&self, _status: &SyncStatus) {}
}

/// Sink that logs updates through `tracing`
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn update(&self, status: &SyncStatus) {
        tracing::info!(
            step = %status.step,
            items_left = status.items_left,
            items_total = status.items_total,
            item = status.item_name.as_deref().unwrap_or("-"),
            "{}",
            status.status
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Sink that records every update it sees
    pub(crate) struct RecordingSink(pub RefCell<Vec<SyncStatus>>);

    impl RecordingSink {
        pub(crate) fn new() -> Self {
            Self(RefCell::new(Vec::new()))
        }
    }

    impl ProgressSink for RecordingSink {
        fn update(&self, status: &SyncStatus) {
            self.0.borrow_mut().push(status.clone());
        }
    }

    #[test]
    fn phase_status_carries_step() {
        let status = SyncStatus::phase(SyncStep::TransferArtifacts);
        assert_eq!(status.step, SyncStep::TransferArtifacts);
        assert_eq!(status.status, "running");
    }

    #[test]
    fn recording_sink_sees_updates() {
        let sink = RecordingSink::new();
        sink.update(&SyncStatus::phase(SyncStep::ImportMetadata));
        sink.update(&SyncStatus::phase(SyncStep::Complete));
        assert_eq!(sink.0.borrow().len(), 2);
    }
}
