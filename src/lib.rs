//! # portsweep - A Concurrent TCP Port Scanner
//!
//! portsweep probes every port of an inclusive range on one host with a
//! non-blocking TCP connect, keeping at most a fixed number of probes in
//! flight and waiting for all of them to finish before it returns.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portsweep::config::ScanConfig;
//! use portsweep::scanner::run_scan;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsweep::ScanError> {
//!     let config = ScanConfig::builder()
//!         .host("127.0.0.1")
//!         .ports(1, 1024)
//!         .timeout(Duration::from_secs(1))
//!         .concurrency(50)
//!         .build()?;
//!
//!     let report = run_scan(config).await?;
//!     for result in report.open() {
//!         println!("Port {} is {}", result.port, result.outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, ranges and targets
//! - [`config`] - Scan configuration and persisted defaults
//! - [`scanner`] - The dispatcher, the TCP prober and the concurrency slots
//! - [`error`] - Error taxonomy
//! - [`output`] - Result formatting
//! - [`cli`] - Command-line surface

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::{ConfigError, ProbeError, ScanError};
pub use scanner::{Dispatcher, PortOutcome, PortResult, Prober, ScanReport, ScanTask, TcpProber};
pub use types::{Port, PortRange, ScanTarget, TargetSpec};
