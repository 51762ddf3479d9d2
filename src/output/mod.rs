//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of a finished
//! scan, plus the live per-port lines printed while probes complete.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_json};
pub use plain::{
    format_live, print_error, print_live, print_plain, print_scan_header, print_warning,
    write_plain,
};

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use std::io;

/// Format and print scan results according to the specified format.
pub fn print_results(report: &ScanReport, format: OutputFormat, show_closed: bool) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report, show_closed),
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => print_csv(report),
    }
}
