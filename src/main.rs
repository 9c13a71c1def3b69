//! procdiff - version 0.1.0
//!
//! Process lifecycle observer with tracing logging.
//! This is the main entry point that resolves configuration, handles subcommands
//! and runs the sampling loop until a termination signal arrives.

mod cli;
mod commands;
mod config;
mod startup_checks;

use clap::Parser;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

use cli::{program_name, Args, Commands, LogLevel};
use commands::{command_check, command_config, command_snapshot};
use config::{resolve_config, show_config, validate_effective_config, Config};
use procdiff::monitor::termination_signal;
use procdiff::{Monitor, ProcessTableScanner, Reporter};

/// Initializes tracing logging subsystem with configured log level.
/// Logs go to stderr so the report on stdout stays readable.
fn setup_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = match config.log_level() {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Logging initialized with level: {:?}", config.log_level());
    Ok(())
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Runs the sampling loop and returns the process exit code.
async fn run_monitor(config: &Config) -> Result<i32, Box<dyn std::error::Error>> {
    let ctx = config.scan_context();

    if let Err(e) = startup_checks::validate_requirements(&ctx) {
        error!("❌ Startup validation failed: {}", e);
    }

    let reporter =
        Reporter::stdout(program_name()).with_timestamp(config.show_timestamp.unwrap_or(true));
    let monitor = Monitor::new(
        ProcessTableScanner::new(ctx),
        Duration::from_secs(config.interval_seconds()),
        reporter,
    )
    .with_debug(config.debug.unwrap_or(false));

    let shutdown = termination_signal()?;

    match monitor.run(shutdown).await {
        Ok(stopped) => {
            info!("procdiff stopped, exit code {}", stopped.exit_code());
            Ok(stopped.exit_code())
        }
        Err(e) => {
            error!("❌ Monitoring aborted: {}", e);
            eprintln!("❌ {}", e);
            Ok(1)
        }
    }
}

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Config generation works without a valid config
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), format.clone(), *commented);
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config)?;
    if let Some(path) = &config.loaded_from {
        info!("Loaded configuration from: {}", path.display());
    }

    if let Some(command) = &args.command {
        return match command {
            Commands::Check => command_check(&config),
            Commands::Snapshot { format } => command_snapshot(format.clone(), &config),
            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    let code = run_monitor(&config).await?;
    std::process::exit(code);
}
