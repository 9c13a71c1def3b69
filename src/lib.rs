//! procdiff library
//!
//! Samples the process table and reports which processes appeared ("new") and
//! which disappeared ("gone") between two consecutive samples. Processes are
//! identified by pid only.
//!
//! # Usage
//!
//! ```rust,no_run
//! use procdiff::{diff, ProcessTableScanner, ScanContext};
//!
//! let scanner = ProcessTableScanner::new(ScanContext::default());
//! let before = scanner.scan()?;
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! let after = scanner.scan()?;
//!
//! let result = diff(&before, &after);
//! for rec in &result.gone {
//!     println!("{} - {}", rec.pid(), rec.name());
//! }
//! # Ok::<(), procdiff::ScanError>(())
//! ```

pub mod error;
pub mod monitor;
pub mod process;
pub mod report;

// Re-export main types for convenience
pub use error::{MonitorError, RecordError, ScanError};
pub use monitor::{Monitor, Stopped};
pub use process::{
    diff, DiffResult, ProcessRecord, ProcessTableScanner, ScanContext, ScanStats, Snapshot,
};
pub use report::Reporter;
