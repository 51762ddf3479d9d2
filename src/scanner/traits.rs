//! Probe contract shared by the dispatcher and prober implementations.
//!
//! The dispatcher depends only on [`Prober`]; it never looks inside a probe.

use crate::error::ProbeError;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Outcome of probing a single port. All variants are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "reason")]
pub enum PortOutcome {
    /// The TCP handshake completed.
    Open,
    /// The connection was actively refused or failed with a socket error.
    Closed,
    /// Nothing resolved before the timeout (filtered or unresponsive).
    Timeout,
    /// The probe itself failed; the reason is kept for reporting.
    Error(String),
}

impl PortOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Timeout => "timeout",
            Self::Error(_) => "error",
        }
    }
}

impl fmt::Display for PortOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(reason) => write!(f, "error: {}", reason),
            other => f.write_str(other.label()),
        }
    }
}

/// Result of probing a single port. Exactly one is produced per scanned port.
#[derive(Debug, Clone, Serialize)]
pub struct PortResult {
    /// The port that was probed.
    pub port: Port,
    #[serde(flatten)]
    pub outcome: PortOutcome,
    /// Time from connect initiation to classification.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl PortResult {
    pub fn new(port: Port, outcome: PortOutcome, elapsed: Duration) -> Self {
        Self {
            port,
            outcome,
            elapsed,
        }
    }

    /// A result for a probe that failed before or during its attempt.
    pub fn error(port: Port, error: ProbeError) -> Self {
        Self::new(port, PortOutcome::Error(error.to_string()), Duration::ZERO)
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.outcome == PortOutcome::Open
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// One port to probe. Owned by the probe that handles it and never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTask {
    addr: SocketAddr,
    port: Port,
    timeout: Duration,
    verbose: bool,
}

impl ScanTask {
    pub fn new(ip: IpAddr, port: Port, timeout: Duration, verbose: bool) -> Self {
        Self {
            addr: SocketAddr::new(ip, port.as_u16()),
            port,
            timeout,
            verbose,
        }
    }

    /// Socket address to connect to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Determines the state of one port.
///
/// Implementations must not block the calling task for longer than the
/// task's timeout and must release every resource they open before
/// returning, whatever the outcome.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single port. Never fails; failures become [`PortOutcome::Error`].
    async fn probe(&self, task: ScanTask) -> PortResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_outcome_display() {
        assert_eq!(PortOutcome::Open.to_string(), "open");
        assert_eq!(PortOutcome::Closed.to_string(), "closed");
        assert_eq!(PortOutcome::Timeout.to_string(), "timeout");
        assert_eq!(
            PortOutcome::Error("boom".to_string()).to_string(),
            "error: boom"
        );
    }

    #[test]
    fn test_result_serialization() {
        let port = Port::new(8002).unwrap();
        let open = PortResult::new(port, PortOutcome::Open, Duration::from_millis(3));
        assert_eq!(
            serde_json::to_value(&open).unwrap(),
            serde_json::json!({"port": 8002, "state": "open", "elapsed_ms": 3})
        );

        let failed = PortResult::error(port, ProbeError::Cancelled);
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({
                "port": 8002,
                "state": "error",
                "reason": "scan cancelled",
                "elapsed_ms": 0
            })
        );
    }

    #[test]
    fn test_task_carries_address() {
        let task = ScanTask::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            Port::new(22).unwrap(),
            Duration::from_secs(1),
            true,
        );
        assert_eq!(task.addr().to_string(), "127.0.0.1:22");
        assert_eq!(task.port().as_u16(), 22);
        assert!(task.verbose());
    }
}
