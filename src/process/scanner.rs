//! Process table scanning.
//!
//! Walks the process table directory (normally `/proc`), reads the status file
//! of every numeric entry and assembles a [`Snapshot`]. Processes that exit
//! while the scan is running are skipped; only an unreadable table directory
//! fails the scan.

use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, trace};

use crate::error::{RecordError, ScanError};
use crate::process::snapshot::Snapshot;
use crate::process::status::{read_record, DEFAULT_STATUS_BUFFER_BYTES};

/// Default process table location.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Everything a scan needs. Replaces process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanContext {
    /// Process table directory.
    pub proc_root: PathBuf,
    /// Status read buffer size; at most `status_buffer_bytes - 1` bytes are parsed.
    pub status_buffer_bytes: usize,
}

impl Default for ScanContext {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            status_buffer_bytes: DEFAULT_STATUS_BUFFER_BYTES,
        }
    }
}

/// Counters from the most recent scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub candidates: usize,
    pub vanished: usize,
    pub malformed: usize,
}

/// Builds snapshots from a process table directory.
#[derive(Debug, Clone, Default)]
pub struct ProcessTableScanner {
    ctx: ScanContext,
}

impl ProcessTableScanner {
    pub fn new(ctx: ScanContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ScanContext {
        &self.ctx
    }

    /// Scans the table once.
    pub fn scan(&self) -> Result<Snapshot, ScanError> {
        self.scan_with_stats().map(|(snapshot, _)| snapshot)
    }

    /// Scans the table once and also reports how many candidates were dropped.
    pub fn scan_with_stats(&self) -> Result<(Snapshot, ScanStats), ScanError> {
        let root = &self.ctx.proc_root;
        let entries = fs::read_dir(root).map_err(|source| ScanError::TableUnavailable {
            path: root.clone(),
            source,
        })?;

        let taken_at = Local::now();
        let mut records = Vec::new();
        let mut stats = ScanStats::default();
        let mut buf = Vec::new();

        for entry in entries.flatten() {
            let file_name = entry.file_name();
            if !is_candidate(file_name.as_bytes()) {
                continue;
            }
            stats.candidates += 1;

            let status_path = entry.path().join("status");
            match read_record(&status_path, self.ctx.status_buffer_bytes, &mut buf) {
                Ok(record) => records.push(record),
                Err(e @ RecordError::Vanished { .. }) => {
                    stats.vanished += 1;
                    trace!("Skipping candidate: {}", e);
                }
                Err(e @ RecordError::Malformed { .. }) => {
                    stats.malformed += 1;
                    debug!("Skipping candidate: {}", e);
                }
            }
        }

        debug!(
            "Scanned {}: {} records from {} candidates ({} vanished, {} malformed)",
            root.display(),
            records.len(),
            stats.candidates,
            stats.vanished,
            stats.malformed
        );

        Ok((Snapshot::new(taken_at, records), stats))
    }
}

/// An entry is a candidate when its name starts with `1`..=`9`.
///
/// This rejects `0`, `self`, `thread-self` and every other non-pid entry.
pub fn is_candidate(name: &[u8]) -> bool {
    matches!(name.first(), Some(b'1'..=b'9'))
}

/// Path of the status file for `pid` under `root`.
pub fn status_path(root: &Path, pid: u32) -> PathBuf {
    root.join(pid.to_string()).join("status")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_status(root: &Path, entry: &str, content: &str) {
        let dir = root.join(entry);
        fs::create_dir_all(&dir).expect("Failed to create process dir");
        fs::write(dir.join("status"), content).expect("Failed to write status file");
    }

    fn status_for(pid: u32, ppid: u32, name: &str) -> String {
        format!("Name:\t{name}\nUmask:\t0022\nState:\tS (sleeping)\nPid:\t{pid}\nPPid:\t{ppid}\n")
    }

    fn scanner_for(root: &Path) -> ProcessTableScanner {
        ProcessTableScanner::new(ScanContext {
            proc_root: root.to_path_buf(),
            ..ScanContext::default()
        })
    }

    // -------------------------------------------------------------------------
    // Tests for is_candidate
    // -------------------------------------------------------------------------

    #[test]
    fn test_is_candidate() {
        assert!(is_candidate(b"1"));
        assert!(is_candidate(b"42"));
        assert!(is_candidate(b"9999"));
        assert!(!is_candidate(b"0"));
        assert!(!is_candidate(b"self"));
        assert!(!is_candidate(b"thread-self"));
        assert!(!is_candidate(b"abc"));
        assert!(!is_candidate(b""));
    }

    // -------------------------------------------------------------------------
    // Tests for ProcessTableScanner::scan
    // -------------------------------------------------------------------------

    #[test]
    fn test_scan_only_numeric_candidates() {
        let dir = tempdir().expect("Failed to create temp dir");
        for (entry, pid) in [("1", 1), ("42", 42), ("abc", 7), ("0", 8), ("self", 9)] {
            write_status(dir.path(), entry, &status_for(pid, 0, entry));
        }

        let (snap, stats) = scanner_for(dir.path()).scan_with_stats().unwrap();
        let mut pids: Vec<u32> = snap.iter().map(|r| r.pid()).collect();
        pids.sort_unstable();
        assert_eq!(pids, vec![1, 42]);
        assert_eq!(stats.candidates, 2);
    }

    #[test]
    fn test_scan_skips_vanished_process() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_status(dir.path(), "1", &status_for(1, 0, "init"));
        write_status(dir.path(), "77", &status_for(77, 1, "cron"));
        // Directory listed but status already gone
        fs::create_dir(dir.path().join("55")).unwrap();

        let (snap, stats) = scanner_for(dir.path()).scan_with_stats().unwrap();
        assert_eq!(snap.len(), 2);
        assert!(!snap.contains_pid(55));
        assert_eq!(stats.vanished, 1);
        assert_eq!(stats.malformed, 0);
    }

    #[test]
    fn test_scan_skips_incomplete_record() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_status(dir.path(), "1", &status_for(1, 0, "init"));
        write_status(dir.path(), "12", "Name:\thalf\nPid:\t12\n");

        let (snap, stats) = scanner_for(dir.path()).scan_with_stats().unwrap();
        assert_eq!(snap.len(), 1);
        assert!(snap.contains_pid(1));
        assert_eq!(stats.malformed, 1);
    }

    #[test]
    fn test_scan_missing_table_is_fatal() {
        let dir = tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("no-such-proc");

        let err = scanner_for(&missing).scan().unwrap_err();
        match err {
            ScanError::TableUnavailable { path, .. } => assert_eq!(path, missing),
        }
    }

    #[test]
    fn test_scan_empty_table() {
        let dir = tempdir().expect("Failed to create temp dir");
        let snap = scanner_for(dir.path()).scan().unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn test_scan_with_oversized_buffer_setting() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_status(dir.path(), "1", &status_for(1, 0, "init"));

        let scanner = ProcessTableScanner::new(ScanContext {
            proc_root: dir.path().to_path_buf(),
            status_buffer_bytes: usize::MAX,
        });
        let snap = scanner.scan().unwrap();
        assert_eq!(snap.len(), 1);
        assert!(snap.contains_pid(1));
    }

    #[test]
    fn test_status_path() {
        assert_eq!(
            status_path(Path::new("/proc"), 42),
            PathBuf::from("/proc/42/status")
        );
    }
}
