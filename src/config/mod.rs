//! Configuration management for portsweep.
//!
//! `ScanConfig` is the validated input of a scan; `AppSettings` holds the
//! persisted defaults the command line falls back to.

mod scan;
mod settings;

pub use scan::{
    ScanConfig, ScanConfigBuilder, DEFAULT_CONCURRENCY, DEFAULT_END_PORT, DEFAULT_HOST,
    DEFAULT_START_PORT, DEFAULT_TIMEOUT,
};
pub use settings::{AppSettings, Paths};
