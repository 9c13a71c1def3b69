//! New/gone computation between two snapshots.
//!
//! Records are matched on pid only. A pid present on both sides counts as the
//! same process even if its name or parent changed.

use serde::Serialize;

use crate::process::record::ProcessRecord;
use crate::process::snapshot::Snapshot;

/// Processes that disappeared and appeared between two snapshots.
///
/// `gone` follows the prior snapshot's order, `new` the current one's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub gone: Vec<ProcessRecord>,
    pub new: Vec<ProcessRecord>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.gone.is_empty() && self.new.is_empty()
    }

    /// `(pid, name)` pairs of the gone processes.
    pub fn gone_pairs(&self) -> Vec<(u32, &str)> {
        self.gone.iter().map(|r| (r.pid(), r.name())).collect()
    }

    /// `(pid, name)` pairs of the new processes.
    pub fn new_pairs(&self) -> Vec<(u32, &str)> {
        self.new.iter().map(|r| (r.pid(), r.name())).collect()
    }
}

/// Compares `prior` with `current`.
///
/// Builds one pid set per side, so the cost is linear in the snapshot sizes.
pub fn diff(prior: &Snapshot, current: &Snapshot) -> DiffResult {
    let prior_pids = prior.pids();
    let current_pids = current.pids();

    let gone = prior
        .iter()
        .filter(|r| !current_pids.contains(&r.pid()))
        .cloned()
        .collect();
    let new = current
        .iter()
        .filter(|r| !prior_pids.contains(&r.pid()))
        .cloned()
        .collect();

    DiffResult { gone, new }
}
