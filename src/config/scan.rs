//! Validated scan configuration.
//!
//! A `ScanConfig` can only be obtained through [`ScanConfigBuilder::build`],
//! which rejects bad ranges, timeouts and concurrency limits up front.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{PortRange, TargetSpec};
use std::time::Duration;

/// Default target host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default first port of the range.
pub const DEFAULT_START_PORT: u32 = 1;
/// Default last port of the range.
pub const DEFAULT_END_PORT: u32 = 1024;
/// Default per-port timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
/// Default number of probes in flight.
pub const DEFAULT_CONCURRENCY: u32 = 50;

/// Immutable configuration for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    target: TargetSpec,
    range: PortRange,
    timeout: Duration,
    concurrency: u32,
    verbose: bool,
}

impl ScanConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    pub fn target(&self) -> &TargetSpec {
        &self.target
    }

    pub fn range(&self) -> PortRange {
        self.range
    }

    /// Per-port connect timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Maximum number of probes in flight.
    pub fn concurrency(&self) -> u32 {
        self.concurrency
    }

    /// Whether per-port status is surfaced as results arrive.
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder for [`ScanConfig`]. Values are checked only in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ScanConfigBuilder {
    host: String,
    start: u32,
    end: u32,
    timeout: Option<Duration>,
    timeout_secs: Option<f64>,
    concurrency: u32,
    verbose: bool,
}

impl Default for ScanConfigBuilder {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            start: DEFAULT_START_PORT,
            end: DEFAULT_END_PORT,
            timeout: Some(DEFAULT_TIMEOUT),
            timeout_secs: None,
            concurrency: DEFAULT_CONCURRENCY,
            verbose: false,
        }
    }
}

impl ScanConfigBuilder {
    /// Set the target host (IP literal or hostname).
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the inclusive port range.
    pub fn ports(mut self, start: u32, end: u32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Set the per-port timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.timeout_secs = None;
        self
    }

    /// Set the per-port timeout in (possibly fractional) seconds.
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = None;
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the maximum number of probes in flight.
    pub fn concurrency(mut self, concurrency: u32) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate and produce the configuration.
    ///
    /// No socket is opened and no name is resolved here.
    pub fn build(self) -> ConfigResult<ScanConfig> {
        let range = PortRange::from_bounds(self.start, self.end)?;

        let timeout = match (self.timeout, self.timeout_secs) {
            (_, Some(secs)) => {
                if secs.is_nan() || secs <= 0.0 {
                    return Err(ConfigError::InvalidTimeout);
                }
                Duration::try_from_secs_f64(secs)
                    .map_err(|_| ConfigError::TimeoutTooLarge(secs))?
            }
            (Some(timeout), None) => timeout,
            (None, None) => DEFAULT_TIMEOUT,
        };
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }

        let target = TargetSpec::parse(&self.host)?;

        Ok(ScanConfig {
            target,
            range,
            timeout,
            concurrency: self.concurrency,
            verbose: self.verbose,
        })
    }
}
