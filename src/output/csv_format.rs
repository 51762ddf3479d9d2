//! CSV output formatting.

use crate::scanner::{PortOutcome, ScanReport};
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), report)
}

/// Write one row per port, every outcome included.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "state", "reason", "elapsed_ms"])?;

    for result in &report.results {
        let reason = match &result.outcome {
            PortOutcome::Error(reason) => reason.as_str(),
            _ => "",
        };
        wtr.write_record([
            result.port.to_string().as_str(),
            result.outcome.label(),
            reason,
            result.elapsed.as_millis().to_string().as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortResult, ScanSummary};
    use crate::types::{Port, PortRange, ScanTarget};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    #[test]
    fn test_csv_rows() {
        let summary = ScanSummary {
            target: ScanTarget::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST)),
            range: PortRange::from_bounds(80, 81).unwrap(),
            launched: 2,
            cancelled: false,
            duration: Duration::from_millis(5),
        };
        let results = vec![
            PortResult::new(Port::new(81).unwrap(), PortOutcome::Error("reset, twice".into()), Duration::ZERO),
            PortResult::new(Port::new(80).unwrap(), PortOutcome::Open, Duration::from_millis(2)),
        ];
        let report = ScanReport::new(summary, results);

        let mut buf = Vec::new();
        write_csv(&mut buf, &report).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "port,state,reason,elapsed_ms\n80,open,,2\n81,error,\"reset, twice\",0\n"
        );
    }
}
