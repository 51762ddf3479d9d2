//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Configuration errors are
//! fatal and surface before any socket is opened; probe errors never leave the
//! probe that produced them.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid port range: start ({start}) > end ({end})")]
    InvalidPortRange { start: u16, end: u16 },

    #[error("port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u32),

    #[error("timeout must be a positive duration")]
    InvalidTimeout,

    #[error("timeout of {0} seconds is too large")]
    TimeoutTooLarge(f64),

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("failed to resolve hostname '{host}': {reason}")]
    DnsResolutionFailed { host: String, reason: String },

    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),

    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

/// Failure of a single probe. Reported as an `Error` outcome for that port.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("socket creation failed: {0}")]
    Socket(#[source] io::Error),

    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    #[error("readiness wait failed: {0}")]
    Readiness(#[source] io::Error),

    #[error("scan cancelled")]
    Cancelled,

    #[error("probe panicked")]
    Panicked,
}

/// Top-level error for a scan run.
///
/// Probe failures never appear here; they become per-port `Error` outcomes.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for a single probe.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidPortRange { start: 100, end: 50 };
        assert_eq!(err.to_string(), "invalid port range: start (100) > end (50)");
        assert_eq!(
            ConfigError::PortOutOfRange(70000).to_string(),
            "port 70000 is out of valid range (1-65535)"
        );
    }

    #[test]
    fn test_probe_error_keeps_cause() {
        let err = ProbeError::Connect(io::Error::from(io::ErrorKind::AddrNotAvailable));
        assert!(err.to_string().starts_with("connect failed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_scan_error_is_transparent_for_config() {
        let err: ScanError = ConfigError::InvalidTimeout.into();
        assert_eq!(err.to_string(), "timeout must be a positive duration");
    }
}
