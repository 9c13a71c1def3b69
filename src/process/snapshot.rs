//! Point-in-time view of the process table.

use ahash::AHashSet as HashSet;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::process::record::ProcessRecord;

/// All records found by one scan, in discovery order.
///
/// A snapshot is never modified after the scan that built it. The order
/// follows directory enumeration and is not sorted by pid.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    taken_at: DateTime<Local>,
    records: Vec<ProcessRecord>,
}

impl Snapshot {
    pub fn new(taken_at: DateTime<Local>, records: Vec<ProcessRecord>) -> Self {
        Self { taken_at, records }
    }

    /// Snapshot stamped with the current local time.
    pub fn from_records(records: Vec<ProcessRecord>) -> Self {
        Self::new(Local::now(), records)
    }

    pub fn taken_at(&self) -> DateTime<Local> {
        self.taken_at
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Set of all pids in this snapshot.
    pub fn pids(&self) -> HashSet<u32> {
        self.records.iter().map(ProcessRecord::pid).collect()
    }

    pub fn contains_pid(&self, pid: u32) -> bool {
        self.records.iter().any(|r| r.pid() == pid)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a ProcessRecord;
    type IntoIter = std::slice::Iter<'a, ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
