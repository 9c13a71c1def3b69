//! Error types for process table scanning.
//!
//! Only [`ScanError`] ever leaves the scanner. [`RecordError`] describes why a
//! single candidate was dropped from a snapshot and is absorbed by the scanner.

use std::io;
use std::path::PathBuf;

/// Fatal scan failure: no snapshot can be produced.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("process table {path} is unavailable: {source}")]
    TableUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-record failure. The candidate is treated as gone and skipped.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Status resource could not be opened or returned no data.
    #[error("status record {path} vanished")]
    Vanished {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// Status resource was readable but lacked a usable attribute.
    #[error("status record {path} is malformed: missing or invalid {missing}")]
    Malformed { path: PathBuf, missing: &'static str },
}

impl RecordError {
    pub fn is_vanished(&self) -> bool {
        matches!(self, RecordError::Vanished { .. })
    }
}

/// Failure that ends a monitoring run.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to write report: {0}")]
    Report(#[from] io::Error),
}
