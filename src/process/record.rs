//! The per-process record kept in a snapshot.

use serde::Serialize;

/// Maximum number of bytes kept from a process name.
pub const NAME_CAPACITY: usize = 1023;

/// One process as seen in a single scan: `(pid, ppid, name)`.
///
/// Fields are private so a record cannot change after it has been parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProcessRecord {
    pid: u32,
    ppid: u32,
    name: String,
}

impl ProcessRecord {
    /// Builds a record, truncating `name` to at most [`NAME_CAPACITY`] bytes.
    pub fn new(pid: u32, ppid: u32, name: impl Into<String>) -> Self {
        let mut name = name.into();
        truncate_to_capacity(&mut name);
        Self { pid, ppid, name }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn ppid(&self) -> u32 {
        self.ppid
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Cuts `name` down to [`NAME_CAPACITY`] bytes on a char boundary.
pub(crate) fn truncate_to_capacity(name: &mut String) {
    if name.len() <= NAME_CAPACITY {
        return;
    }
    let mut end = NAME_CAPACITY;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name.truncate(end);
}
