//! Startup requirement validation for procdiff.
//!
//! This module validates that the process table can be read before the
//! monitoring loop starts.

use nix::unistd::geteuid;
use procdiff::process::{read_record, status_path, ScanContext, DEFAULT_PROC_ROOT};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(ctx: &ScanContext) -> Result<(), ValidationError> {
    debug!("Validating runtime requirements...");

    check_user_privileges();
    check_proc_access(ctx)?;
    check_own_status(ctx);

    debug!("All runtime requirements validated");
    Ok(())
}

/// Check if running with sufficient privileges
fn check_user_privileges() {
    if !geteuid().is_root() {
        info!("Not running as root - status records of other users may be unreadable");
    } else {
        debug!("Running as root (uid=0)");
    }
}

/// Check that the process table directory can be listed
fn check_proc_access(ctx: &ScanContext) -> Result<(), ValidationError> {
    match fs::read_dir(&ctx.proc_root) {
        Ok(_) => {
            debug!("Process table {} is readable", ctx.proc_root.display());
            Ok(())
        }
        Err(e) => {
            error!(
                "❌ Cannot read process table {}: {}",
                ctx.proc_root.display(),
                e
            );
            Err(ValidationError::ProcTableUnavailable {
                path: ctx.proc_root.display().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Whether `ctx` points at the live process table of this host.
fn is_live_table(ctx: &ScanContext) -> bool {
    ctx.proc_root == Path::new(DEFAULT_PROC_ROOT)
}

/// Check that our own status record parses; failure is only a warning
fn check_own_status(ctx: &ScanContext) {
    if !is_live_table(ctx) {
        debug!(
            "Skipping own status check, {} is not {}",
            ctx.proc_root.display(),
            DEFAULT_PROC_ROOT
        );
        return;
    }

    let path = status_path(&ctx.proc_root, std::process::id());
    let mut buf = Vec::new();
    if let Err(e) = read_record(&path, ctx.status_buffer_bytes, &mut buf) {
        warn!("⚠️  Could not read own status record: {}", e);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Process table {path} is not readable: {reason}")]
    ProcTableUnavailable { path: String, reason: String },
}
