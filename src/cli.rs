//! CLI arguments and subcommands for procdiff.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output format for the one-shot snapshot listing
#[derive(Debug, Clone, ValueEnum)]
pub enum SnapshotFormat {
    Table,
    Json,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procdiff",
    about = "Report processes that appeared or disappeared between samples",
    long_about = "Report processes that appeared or disappeared between samples.\n\n\
                  Samples the process table every interval and prints the processes \
                  that are gone and the processes that are new since the previous sample, \
                  identified by pid.",
    version = concat!("version ", env!("CARGO_PKG_VERSION")),
    disable_version_flag = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sampling interval in seconds (minimum 1, default 60)
    #[arg(short = 'i', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Also print the full process listing of every sample
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Show version number
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Process table directory
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Omit the timestamp line before each report
    #[arg(long)]
    pub no_timestamp: bool,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate process table access and configuration
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Take a single sample and print it
    Snapshot {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: SnapshotFormat,
    },
}

/// Basename of the running executable, used in user-facing messages.
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "procdiff".to_string())
}
