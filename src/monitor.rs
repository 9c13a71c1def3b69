//! Sampling loop: scan, diff against the previous snapshot, report, sleep.
//!
//! Only one cycle runs at a time. At most two snapshots are alive: the one
//! kept from the previous cycle and the one just scanned. Shutdown is
//! cooperative and only observed between cycles, so a scan is never cut off
//! halfway.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info};

use crate::error::MonitorError;
use crate::process::{diff, DiffResult, ProcessTableScanner, Snapshot};
use crate::report::Reporter;

/// Default sampling interval in seconds.
pub const DEFAULT_INTERVAL_SECONDS: u64 = 60;

/// Why a monitoring run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    /// A termination signal was received.
    Signal(i32),
}

impl Stopped {
    /// Process exit code: `128 + signal number`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Stopped::Signal(signo) => 128 + signo,
        }
    }
}

/// Drives scan/diff cycles and owns the snapshot kept between them.
pub struct Monitor<W: Write> {
    scanner: ProcessTableScanner,
    interval: Duration,
    debug: bool,
    reporter: Reporter<W>,
    prior: Option<Snapshot>,
}

impl<W: Write> Monitor<W> {
    pub fn new(scanner: ProcessTableScanner, interval: Duration, reporter: Reporter<W>) -> Self {
        Self {
            scanner,
            interval,
            debug: false,
            reporter,
            prior: None,
        }
    }

    /// Also print the full listing of every snapshot.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn prior(&self) -> Option<&Snapshot> {
        self.prior.as_ref()
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }

    /// Runs one cycle.
    ///
    /// Returns `None` on the first cycle, when there is nothing to compare
    /// against yet. The scanned snapshot replaces the previous one afterwards.
    pub fn step(&mut self) -> Result<Option<DiffResult>, MonitorError> {
        let current = self.scanner.scan()?;

        if self.debug {
            self.reporter.listing(&current)?;
        }

        let result = match self.prior.take() {
            Some(prior) => {
                let result = diff(&prior, &current);
                debug!(
                    "Cycle diff: {} gone, {} new, {} alive",
                    result.gone.len(),
                    result.new.len(),
                    current.len()
                );
                self.reporter.cycle(current.taken_at(), &result)?;
                Some(result)
            }
            None => {
                debug!("First snapshot with {} processes", current.len());
                None
            }
        };

        self.prior = Some(current);
        Ok(result)
    }

    /// Cycles until `shutdown` resolves with a signal number.
    pub async fn run<F>(mut self, shutdown: F) -> Result<Stopped, MonitorError>
    where
        F: Future<Output = i32>,
    {
        tokio::pin!(shutdown);

        if let Err(e) = self.reporter.banner(self.interval.as_secs()) {
            return self.stop_on_closed_output(e.into());
        }
        info!(
            "Monitoring {} every {}s",
            self.scanner.context().proc_root.display(),
            self.interval.as_secs()
        );

        loop {
            if let Err(e) = self.step() {
                return self.stop_on_closed_output(e);
            }

            tokio::select! {
                biased;
                signo = &mut shutdown => {
                    info!("Received signal {}, stopping", signo);
                    self.prior = None;
                    match self.reporter.stopped(signo) {
                        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                        _ => {}
                    }
                    return Ok(Stopped::Signal(signo));
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// A closed stdout ends the run as if SIGPIPE had been received. Nothing
    /// is printed since the reader is gone.
    fn stop_on_closed_output(&mut self, err: MonitorError) -> Result<Stopped, MonitorError> {
        match err {
            MonitorError::Report(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                info!("Output closed, stopping");
                self.prior = None;
                Ok(Stopped::Signal(libc::SIGPIPE))
            }
            other => Err(other),
        }
    }
}

/// Installs handlers for SIGALRM, SIGHUP, SIGINT, SIGPIPE, SIGQUIT and
/// SIGTERM and returns a future that resolves with the number of the first
/// one received.
///
/// Must be called from within a tokio runtime.
pub fn termination_signal() -> io::Result<impl Future<Output = i32>> {
    let mut alarm = signal(SignalKind::alarm())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut pipe = signal(SignalKind::pipe())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = alarm.recv() => libc::SIGALRM,
            _ = hangup.recv() => libc::SIGHUP,
            _ = interrupt.recv() => libc::SIGINT,
            _ = pipe.recv() => libc::SIGPIPE,
            _ = quit.recv() => libc::SIGQUIT,
            _ = terminate.recv() => libc::SIGTERM,
        }
    })
}
