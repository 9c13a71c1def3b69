//! Parser for `/proc/<pid>/status`.
//!
//! The status file is a list of `Key:\tValue` lines. Only `Name`, `Pid` and
//! `PPid` are extracted; everything else is skipped. The file is read through a
//! bounded buffer, so very long status files are truncated rather than
//! rejected.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::RecordError;
use crate::process::record::{truncate_to_capacity, ProcessRecord, NAME_CAPACITY};

/// Default size of the status read buffer. At most `size - 1` bytes are read.
pub const DEFAULT_STATUS_BUFFER_BYTES: usize = 2048;

/// Raw attributes recovered from one status buffer.
///
/// A field stays `None` when its line was never reached or its value had no
/// leading integer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusFields {
    pub name: Option<String>,
    pub pid: Option<i64>,
    pub ppid: Option<i64>,
}

impl StatusFields {
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.pid.is_some() && self.ppid.is_some()
    }

    /// Validates the fields into a [`ProcessRecord`].
    ///
    /// `Pid` must be at least 1 and `PPid` at least 0, both within `u32`.
    /// `path` is only used for error reporting.
    pub fn into_record(self, path: &Path) -> Result<ProcessRecord, RecordError> {
        let malformed = |missing| RecordError::Malformed {
            path: path.to_path_buf(),
            missing,
        };

        let name = self.name.ok_or_else(|| malformed("Name"))?;
        let pid = self
            .pid
            .and_then(|v| u32::try_from(v).ok())
            .filter(|&v| v > 0)
            .ok_or_else(|| malformed("Pid"))?;
        let ppid = self
            .ppid
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| malformed("PPid"))?;

        Ok(ProcessRecord::new(pid, ppid, name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attr {
    Name,
    Pid,
    PPid,
}

fn attr_for_key(key: &[u8]) -> Option<Attr> {
    match key {
        b"Name" => Some(Attr::Name),
        b"Pid" => Some(Attr::Pid),
        b"PPid" => Some(Attr::PPid),
        _ => None,
    }
}

/// Extracts `Name`, `Pid` and `PPid` from a status buffer.
///
/// Parsing stops once all three were seen, at the end of the buffer, or at
/// the first line that is not shaped `Key:\t...`. A repeated key overwrites
/// the earlier value.
pub fn parse_status(buf: &[u8]) -> StatusFields {
    let mut fields = StatusFields::default();
    let mut rest = buf;

    while !fields.is_complete() && !rest.is_empty() {
        let (line, next) = match rest.iter().position(|&b| b == b'\n') {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, &rest[rest.len()..]),
        };

        let Some(colon) = line.iter().position(|&b| b == b':') else {
            break;
        };
        if line.get(colon + 1) != Some(&b'\t') {
            break;
        }
        let value = &line[colon + 2..];

        match attr_for_key(&line[..colon]) {
            Some(Attr::Name) => fields.name = Some(decode_name(value)),
            Some(Attr::Pid) => fields.pid = parse_leading_int(value),
            Some(Attr::PPid) => fields.ppid = parse_leading_int(value),
            None => {}
        }

        rest = next;
    }

    fields
}

/// Decodes the escaped `Name` value.
///
/// `\n` becomes a newline, any other escaped byte is kept as is and the
/// backslash dropped. Output is capped at [`NAME_CAPACITY`] bytes.
fn decode_name(value: &[u8]) -> String {
    let mut out = Vec::with_capacity(value.len().min(NAME_CAPACITY));
    let mut bytes = value.iter().copied();

    while out.len() < NAME_CAPACITY {
        let Some(mut c) = bytes.next() else { break };
        if c == 0 {
            break;
        }
        if c == b'\\' {
            match bytes.next() {
                Some(b'n') => c = b'\n',
                Some(0) | None => break,
                Some(other) => c = other,
            }
        }
        out.push(c);
    }

    let mut name = String::from_utf8_lossy(&out).into_owned();
    truncate_to_capacity(&mut name);
    name
}

/// `strtol`-style parse: optional leading whitespace and sign, then digits up
/// to the first non-digit. Returns `None` when there are no digits. Values
/// outside `i64` saturate.
fn parse_leading_int(value: &[u8]) -> Option<i64> {
    let start = value
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(value.len());
    let s = &value[start..];

    let (negative, digits) = match s.first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let len = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }

    let n = digits[..len].iter().fold(0i64, |acc, &b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -n } else { n })
}

/// Reads a status file into `buf`, keeping at most `buffer_bytes - 1` bytes.
///
/// A missing, unreadable or empty file is reported as
/// [`RecordError::Vanished`]: the process most likely exited after it was
/// listed.
pub fn read_status<'a>(
    path: &Path,
    buffer_bytes: usize,
    buf: &'a mut Vec<u8>,
) -> Result<&'a [u8], RecordError> {
    let vanished = |source| RecordError::Vanished {
        path: path.to_path_buf(),
        source,
    };

    buf.clear();
    let limit = buffer_bytes.saturating_sub(1) as u64;
    let file = File::open(path).map_err(|e| vanished(Some(e)))?;
    file.take(limit)
        .read_to_end(buf)
        .map_err(|e| vanished(Some(e)))?;

    if buf.is_empty() {
        return Err(vanished(None));
    }
    Ok(buf.as_slice())
}

/// Reads and parses one status file into a complete record.
pub fn read_record(
    path: &Path,
    buffer_bytes: usize,
    buf: &mut Vec<u8>,
) -> Result<ProcessRecord, RecordError> {
    let content = read_status(path, buffer_bytes, buf)?;
    parse_status(content).into_record(path)
}
