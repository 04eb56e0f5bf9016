//! Transfer orchestration contract
//!
//! The engine hands the orchestrator the records that need fetching, each
//! annotated with its resolved target path, and consumes only the final
//! report. Retry policy and parallelism are the orchestrator's own
//! concern; the engine re-verifies the filesystem afterwards regardless
//! of what the report claims.

use serde::Serialize;
use std::path::PathBuf;

use mirror_catalog::PackageRecord;

use crate::progress::{ProgressSink, SyncStatus, SyncStep};

/// One artifact to fetch, with its resolved target path
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub record: PackageRecord,
    pub target: PathBuf,
}

/// Per-item transfer failure detail
#[derive(Debug, Clone, Serialize)]
pub struct TransferFailure {
    pub file_name: String,
    pub message: String,
}

/// Final report from a transfer run
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferReport {
    pub successes: u64,
    pub bytes_transferred: u64,
    pub errors: Vec<TransferFailure>,
}

impl TransferReport {
    /// Whether every requested item transferred cleanly
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Performs the actual artifact transfers
pub trait TransferOrchestrator {
    fn transfer(&self, requests: &[TransferRequest], progress: &dyn ProgressSink)
    -> TransferReport;
}

/// Orchestrator that copies artifacts from a local source directory.
///
/// Used for file-based feeds and in tests; each artifact is expected at
/// `<source_dir>/<file_name>`.
#[derive(Debug, Clone)]
pub struct FileCopyOrchestrator {
    source_dir: PathBuf,
}

impl FileCopyOrchestrator {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    fn copy_one(&self, request: &TransferRequest) -> std::io::Result<u64> {
        let source = self.source_dir.join(&request.record.file_name);
        if let Some(parent) = request.target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&source, &request.target)
    }
}

impl TransferOrchestrator for FileCopyOrchestrator {
    fn transfer(
        &self,
        requests: &[TransferRequest],
        progress: &dyn ProgressSink,
    ) -> TransferReport {
        let items_total = requests.len() as u64;
        let size_total: u64 = requests.iter().map(|r| r.record.size).sum();
        let mut report = TransferReport::default();
        let mut size_left = size_total;

        for (index, request) in requests.iter().enumerate() {
            let item_type = if request.record.is_source() {
                "srpm"
            } else {
                "rpm"
            };
            progress.update(&SyncStatus {
                items_total,
                items_left: items_total - index as u64,
                size_total,
                size_left,
                item_name: Some(request.record.file_name.clone()),
                status: "downloading".to_string(),
                item_type: Some(item_type.to_string()),
                error_count: report.errors.len() as u64,
                success_count: report.successes,
                step: SyncStep::TransferArtifacts,
                ..SyncStatus::default()
            });

            match self.copy_one(request) {
                Ok(bytes) => {
                    report.successes += 1;
                    report.bytes_transferred += bytes;
                }
                Err(e) => {
                    tracing::warn!("Transfer failed for {}: {}", request.record.file_name, e);
                    report.errors.push(TransferFailure {
                        file_name: request.record.file_name.clone(),
                        message: e.to_string(),
                    });
                }
            }
            size_left = size_left.saturating_sub(request.record.size);
        }

        report
    }
}
