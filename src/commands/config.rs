//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::Config;

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from(default_file_name(&format)),
    };

    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
        ConfigFormat::Yaml => {
            let mut content = serde_yaml::to_string(&config)?;
            if commented {
                content = add_config_comments(content);
            }
            content
        }
    };

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

fn default_file_name(format: &ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Yaml => "procdiff.yaml",
        ConfigFormat::Json => "procdiff.json",
        ConfigFormat::Toml => "procdiff.toml",
    }
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# procdiff Configuration
# =======================
#
# Sampling
# --------
# interval_seconds: 60         # Seconds between samples (minimum 1)
# debug: false                 # Print the full process listing every sample
#
# Process Table
# -------------
# proc_root: "/proc"           # Directory with one entry per live process
# status_buffer_bytes: 2048    # Read buffer for <pid>/status (minimum 64)
#
# Output
# ------
# show_timestamp: true         # Print a local timestamp before each report
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace (stderr)

"#;
    format!("{}{}", comments, yaml)
}
