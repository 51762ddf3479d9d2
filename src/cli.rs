//! Command-line interface definitions for portsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. The parsed
//! arguments are merged with [`AppSettings`] into a validated [`ScanConfig`].

use crate::config::{AppSettings, ScanConfig, DEFAULT_HOST};
use crate::error::ConfigResult;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent TCP connect port scanner", long_about = None)]
pub struct Cli {
    /// Target IP address or hostname
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// First port of the range
    #[arg(short, long, default_value_t = 1)]
    pub start: u32,

    /// Last port of the range (inclusive)
    #[arg(short, long, default_value_t = 1024)]
    pub end: u32,

    /// Per-port connect timeout in seconds (fractions allowed) [default: 1]
    #[arg(short, long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub timeout: Option<f64>,

    /// Maximum number of probes in flight [default: 50]
    #[arg(short, long)]
    pub concurrency: Option<u32>,

    /// Print every port as its probe finishes
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress everything but the final results
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for the final results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Show closed, timed-out and errored ports in plain output
    #[arg(long)]
    pub show_closed: bool,

    /// Path to a settings file (defaults to the XDG config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load settings from `--config`, or from the default location.
    ///
    /// An explicit file must load; problems with the default location only
    /// fall back to built-in defaults.
    pub fn settings(&self) -> ConfigResult<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path),
            None => Ok(AppSettings::load().unwrap_or_else(|e| {
                warn!(error = %e, "ignoring settings file");
                AppSettings::default()
            })),
        }
    }

    /// Build the validated scan configuration, filling gaps from `settings`.
    pub fn scan_config(&self, settings: &AppSettings) -> ConfigResult<ScanConfig> {
        let builder = ScanConfig::builder()
            .host(&self.host)
            .ports(self.start, self.end)
            .concurrency(self.concurrency.unwrap_or(settings.default_concurrency))
            .verbose(self.verbose);

        let builder = match self.timeout {
            Some(secs) => builder.timeout_secs(secs),
            None => builder.timeout(Duration::from_millis(settings.default_timeout_ms)),
        };

        builder.build()
    }

    pub fn output_format(&self, settings: &AppSettings) -> OutputFormat {
        self.output.unwrap_or(settings.default_output_format)
    }

    pub fn show_closed(&self, settings: &AppSettings) -> bool {
        self.show_closed || settings.show_closed
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
