//! Process table sampling core.
//!
//! This module provides:
//! - `record`: The `(pid, ppid, name)` record kept per process
//! - `status`: Parsing of `/proc/<pid>/status`
//! - `scanner`: Process discovery and snapshot assembly
//! - `snapshot`: Point-in-time process table view
//! - `diff`: New/gone computation between two snapshots

pub mod diff;
pub mod record;
pub mod scanner;
pub mod snapshot;
pub mod status;

// Re-export commonly used types
pub use diff::{diff, DiffResult};
pub use record::{ProcessRecord, NAME_CAPACITY};
pub use scanner::{
    is_candidate, status_path, ProcessTableScanner, ScanContext, ScanStats, DEFAULT_PROC_ROOT,
};
pub use snapshot::Snapshot;
pub use status::{parse_status, read_record, read_status, StatusFields, DEFAULT_STATUS_BUFFER_BYTES};
