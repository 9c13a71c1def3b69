//! Snapshot command implementation.
//!
//! Takes a single sample of the process table and prints it.

use procdiff::{ProcessTableScanner, Reporter};
use tracing::debug;

use crate::cli::{program_name, SnapshotFormat};
use crate::config::Config;

/// Scans once and prints the listing.
pub fn command_snapshot(
    format: SnapshotFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let scanner = ProcessTableScanner::new(config.scan_context());
    let (snapshot, stats) = scanner.scan_with_stats()?;
    debug!("Snapshot scan stats: {:?}", stats);

    match format {
        SnapshotFormat::Table => {
            Reporter::stdout(program_name()).listing(&snapshot)?;
        }
        SnapshotFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
