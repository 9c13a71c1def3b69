//! Human-readable output of snapshots and diffs.

use std::io::{self, Write};

use chrono::{DateTime, Local};

use crate::process::{DiffResult, Snapshot};

/// Timestamp format of the cycle header.
const HEADER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes monitor output to any [`Write`] sink.
pub struct Reporter<W: Write> {
    out: W,
    program_name: String,
    show_timestamp: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout(program_name: impl Into<String>) -> Self {
        Self::new(io::stdout(), program_name)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, program_name: impl Into<String>) -> Self {
        Self {
            out,
            program_name: program_name.into(),
            show_timestamp: true,
        }
    }

    pub fn with_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    pub fn banner(&mut self, interval_seconds: u64) -> io::Result<()> {
        writeln!(
            self.out,
            "Monitor processes with interval {} seconds",
            interval_seconds
        )?;
        self.out.flush()
    }

    /// Full table of a snapshot.
    pub fn listing(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        writeln!(self.out, "PID\tPPID\tName")?;
        for rec in snapshot {
            writeln!(self.out, "{}\t{}\t{}", rec.pid(), rec.ppid(), rec.name())?;
        }
        writeln!(self.out, "Total process number: {}", snapshot.len())?;
        self.out.flush()
    }

    /// Gone and new processes of one cycle.
    pub fn cycle(&mut self, taken_at: DateTime<Local>, result: &DiffResult) -> io::Result<()> {
        if self.show_timestamp {
            writeln!(self.out, "====={}====", taken_at.format(HEADER_TIME_FORMAT))?;
        }

        writeln!(self.out, "Gone:")?;
        for (pid, name) in result.gone_pairs() {
            writeln!(self.out, "{} - {}", pid, name)?;
        }
        writeln!(self.out)?;

        writeln!(self.out, "New:")?;
        for (pid, name) in result.new_pairs() {
            writeln!(self.out, "{} - {}", pid, name)?;
        }
        writeln!(self.out)?;

        self.out.flush()
    }

    pub fn stopped(&mut self, signo: i32) -> io::Result<()> {
        writeln!(
            self.out,
            "{} is stopped by signal {}",
            self.program_name, signo
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
