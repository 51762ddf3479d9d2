//! Scan summaries and collected reports.

use crate::scanner::traits::{PortOutcome, PortResult};
use crate::types::{PortRange, ScanTarget};
use serde::Serialize;
use std::time::Duration;

/// What the dispatcher knows once the drain barrier has been passed.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Resolved target.
    pub target: ScanTarget,
    /// Scanned range.
    pub range: PortRange,
    /// Number of probes actually launched.
    pub launched: usize,
    /// Whether the scan was cut short.
    pub cancelled: bool,
    /// Wall-clock duration of the scan, resolution included.
    pub duration: Duration,
}

/// Complete scan results, sorted by port.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub ip_address: String,
    pub port_range: String,
    pub ports_scanned: usize,
    pub open_ports: usize,
    pub closed_ports: usize,
    pub timeout_ports: usize,
    pub error_ports: usize,
    pub cancelled: bool,
    pub duration_ms: u64,
    pub results: Vec<PortResult>,
}

impl ScanReport {
    /// Build a report. Results may arrive in any order; the report sorts them.
    pub fn new(summary: ScanSummary, mut results: Vec<PortResult>) -> Self {
        results.sort_by_key(|r| r.port);

        let count = |pred: fn(&PortOutcome) -> bool| {
            results.iter().filter(|r| pred(&r.outcome)).count()
        };
        let open_ports = count(|o| matches!(o, PortOutcome::Open));
        let closed_ports = count(|o| matches!(o, PortOutcome::Closed));
        let timeout_ports = count(|o| matches!(o, PortOutcome::Timeout));
        let error_ports = count(|o| matches!(o, PortOutcome::Error(_)));

        Self {
            target: summary.target.original.clone(),
            ip_address: summary.target.ip.to_string(),
            port_range: summary.range.to_string(),
            ports_scanned: results.len(),
            open_ports,
            closed_ports,
            timeout_ports,
            error_ports,
            cancelled: summary.cancelled,
            duration_ms: summary.duration.as_millis() as u64,
            results,
        }
    }

    /// Results for open ports only.
    pub fn open(&self) -> impl Iterator<Item = &PortResult> {
        self.results.iter().filter(|r| r.is_open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use std::net::{IpAddr, Ipv4Addr};

    fn result(port: u16, outcome: PortOutcome) -> PortResult {
        PortResult::new(Port::new(port).unwrap(), outcome, Duration::from_millis(1))
    }

    #[test]
    fn test_report_sorts_and_counts() {
        let summary = ScanSummary {
            target: ScanTarget::new("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST)),
            range: PortRange::from_bounds(8000, 8003).unwrap(),
            launched: 4,
            cancelled: false,
            duration: Duration::from_millis(1500),
        };
        let results = vec![
            result(8003, PortOutcome::Timeout),
            result(8001, PortOutcome::Open),
            result(8000, PortOutcome::Closed),
            result(8002, PortOutcome::Error("no buffer space".to_string())),
        ];

        let report = ScanReport::new(summary, results);

        let ports: Vec<u16> = report.results.iter().map(|r| r.port.as_u16()).collect();
        assert_eq!(ports, vec![8000, 8001, 8002, 8003]);
        assert_eq!(report.ports_scanned, 4);
        assert_eq!(report.open_ports, 1);
        assert_eq!(report.closed_ports, 1);
        assert_eq!(report.timeout_ports, 1);
        assert_eq!(report.error_ports, 1);
        assert_eq!(report.duration_ms, 1500);
        assert_eq!(report.port_range, "8000-8003");
        assert_eq!(report.open().count(), 1);
    }
}
