//! Configuration management for procdiff.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use clap::ValueEnum;
use procdiff::monitor::DEFAULT_INTERVAL_SECONDS;
use procdiff::process::{ScanContext, DEFAULT_PROC_ROOT, DEFAULT_STATUS_BUFFER_BYTES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const MIN_STATUS_BUFFER_BYTES: usize = 64;
pub const MAX_STATUS_BUFFER_BYTES: usize = 1024 * 1024;

/// Effective configuration; every field is optional so files may set any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Sampling
    #[serde(alias = "interval")]
    pub interval_seconds: Option<u64>,
    pub debug: Option<bool>,

    // Process table
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
    #[serde(alias = "status-buffer-bytes")]
    pub status_buffer_bytes: Option<usize>,

    // Output
    #[serde(alias = "show-timestamp")]
    pub show_timestamp: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    /// File the values were read from, if any.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_seconds: Some(DEFAULT_INTERVAL_SECONDS),
            debug: Some(false),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            status_buffer_bytes: Some(DEFAULT_STATUS_BUFFER_BYTES),
            show_timestamp: Some(true),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            loaded_from: None,
        }
    }
}

impl Config {
    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS)
    }

    /// Scanner settings derived from this config.
    pub fn scan_context(&self) -> ScanContext {
        ScanContext {
            proc_root: self
                .proc_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT)),
            status_buffer_bytes: self
                .status_buffer_bytes
                .unwrap_or(DEFAULT_STATUS_BUFFER_BYTES),
        }
    }

    /// Parsed log level; unknown names fall back to the default.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|s| LogLevel::from_str(s, true).ok())
            .unwrap_or(LogLevel::Warn)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(interval) = cfg.interval_seconds {
        if interval < 1 {
            return Err("Minimum interval is 1 second".into());
        }
    }

    if let Some(bytes) = cfg.status_buffer_bytes {
        if !(MIN_STATUS_BUFFER_BYTES..=MAX_STATUS_BUFFER_BYTES).contains(&bytes) {
            return Err(format!(
                "status_buffer_bytes must be between {} and {}, got {}",
                MIN_STATUS_BUFFER_BYTES, MAX_STATUS_BUFFER_BYTES, bytes
            )
            .into());
        }
    }

    if let Some(root) = cfg.proc_root.as_deref() {
        if root.as_os_str().is_empty() {
            return Err("proc_root must not be empty".into());
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            return Err(format!(
                "Invalid log_level '{}', expected one of off, error, warn, info, debug, trace",
                level
            )
            .into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(interval) = args.interval {
        config.interval_seconds = Some(interval);
    }
    if args.debug {
        config.debug = Some(true);
    }
    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if args.no_timestamp {
        config.show_timestamp = Some(false);
    }
    if let Some(level) = args.log_level {
        if let Some(value) = level.to_possible_value() {
            config.log_level = Some(value.get_name().to_string());
        }
    }

    Ok(config)
}

/// Configuration loading with multiple format support.
///
/// Without an explicit path the default locations are tried in order; if none
/// exists the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/procdiff/procdiff.yaml",
                "/etc/procdiff/procdiff.yml",
                "/etc/procdiff/procdiff.json",
                "./procdiff.yaml",
                "./procdiff.yml",
                "./procdiff.json",
            ];

            match defaults.iter().map(Path::new).find(|p| p.exists()) {
                Some(p) => p.to_path_buf(),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;
    let mut config = parse_config(&path, &content)?;
    config.loaded_from = Some(path);
    Ok(config)
}

/// Parses config content, choosing the format by file extension (YAML by default).
/// Fields missing from the file keep their defaults.
fn parse_config(path: &Path, content: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let file: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(merge_over_defaults(file))
}

fn merge_over_defaults(file: Config) -> Config {
    let defaults = Config::default();
    Config {
        interval_seconds: file.interval_seconds.or(defaults.interval_seconds),
        debug: file.debug.or(defaults.debug),
        proc_root: file.proc_root.or(defaults.proc_root),
        status_buffer_bytes: file.status_buffer_bytes.or(defaults.status_buffer_bytes),
        show_timestamp: file.show_timestamp.or(defaults.show_timestamp),
        log_level: file.log_level.or(defaults.log_level),
        loaded_from: None,
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}
