//! CLI argument definitions and logging setup.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking file writer alive for the process lifetime.
pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gauge", version, about = "Analog fuel gauge CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/gauge.toml")]
    pub config: PathBuf,

    /// Optional calibration CSV (strict `voltage,level` header); the fitted
    /// curve replaces the [curve] section
    #[arg(long, value_name = "FILE")]
    pub calibration: Option<PathBuf>,

    /// Polynomial degree for --calibration fitting
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub fit_degree: usize,

    /// Print telemetry as JSON lines instead of columns
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the gauge read loop and print per-cycle telemetry
    Run {
        /// Stop after this many read cycles (overrides [runner].cycles)
        #[arg(long)]
        cycles: Option<u64>,

        /// Read-cycle rate in Hz (overrides [runner].sample_rate_hz)
        #[arg(long, value_name = "HZ")]
        rate: Option<u32>,
    },
    /// Validate the config and report the derived sender range
    Check,
}

/// Initialize tracing: env-filter from the CLI level, pretty or JSON
/// formatting, and an optional rotating file appender from the config.
/// Telemetry goes to stdout; logs go to stderr or the file.
pub fn init_logging(cli: &Cli, logging: &fuelgauge_config::Logging) {
    // An explicit --log-level beats the config file; the config beats the
    // built-in default.
    let level = if cli.log_level != "info" {
        cli.log_level.as_str()
    } else {
        logging.level.as_deref().unwrap_or("info")
    };
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = logging.file.as_deref() {
        let dir = std::path::Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let file = std::path::Path::new(path)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gauge.log".to_string());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, file),
            Some("hourly") => tracing_appender::rolling::hourly(dir, file),
            _ => tracing_appender::rolling::never(dir, file),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        // File logs are always JSON lines; they are meant for machines.
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .init();
    } else if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
