//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{PortOutcome, PortResult, ScanReport};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport, show_closed: bool) -> io::Result<()> {
    let stdout = io::stdout();
    write_plain(&mut stdout.lock(), report, show_closed)
}

/// Write the plain report. Only open ports are listed unless `show_closed`.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport, show_closed: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                    {} Scan Results",
        style("portsweep").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target)?;
    writeln!(out, "  {} {}", style("IP Address:").bold(), report.ip_address)?;
    writeln!(out, "  {} {}", style("Ports:").bold(), report.port_range)?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} ports scanned in {:.2}s{}",
        style("Statistics:").bold(),
        report.ports_scanned,
        report.duration_ms as f64 / 1000.0,
        if report.cancelled { " (cancelled)" } else { "" }
    )?;
    writeln!(
        out,
        "               {} open, {} closed, {} timeout, {} error",
        style(report.open_ports).green().bold(),
        style(report.closed_ports).red(),
        style(report.timeout_ports).yellow(),
        style(report.error_ports).magenta()
    )?;
    writeln!(out)?;

    let shown: Vec<&PortResult> = report
        .results
        .iter()
        .filter(|r| show_closed || r.is_open())
        .collect();

    if shown.is_empty() {
        writeln!(out, "  {}", style("No ports to display.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:<8}  {:>8}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("TIME").bold(),
            style("DETAIL").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for result in shown {
            let detail = match &result.outcome {
                PortOutcome::Error(reason) => truncate_string(reason, 35),
                _ => String::new(),
            };
            writeln!(
                out,
                "  {:>6}  {:<8}  {:>6}ms  {}",
                result.port,
                outcome_style(&result.outcome).apply_to(result.outcome.label()),
                result.elapsed.as_millis(),
                style(detail).dim()
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// One line for a result as it arrives.
pub fn format_live(result: &PortResult) -> String {
    format!(
        "Port {} {}",
        result.port,
        outcome_style(&result.outcome).apply_to(&result.outcome)
    )
}

/// Print a result as it arrives.
pub fn print_live(result: &PortResult) {
    println!("{}", format_live(result));
}

fn outcome_style(outcome: &PortOutcome) -> Style {
    match outcome {
        PortOutcome::Open => Style::new().green().bold(),
        PortOutcome::Closed => Style::new().red(),
        PortOutcome::Timeout => Style::new().yellow(),
        PortOutcome::Error(_) => Style::new().magenta(),
    }
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, range: &str, concurrency: u32) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(target).white().bold()
    );
    println!(
        "{} Scanning ports {} with {} probes in flight...",
        style("•").dim(),
        style(range).white().bold(),
        concurrency
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Truncate a string to a maximum length, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanSummary;
    use crate::types::{Port, PortRange, ScanTarget};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn report() -> ScanReport {
        let summary = ScanSummary {
            target: ScanTarget::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST)),
            range: PortRange::from_bounds(21, 22).unwrap(),
            launched: 2,
            cancelled: false,
            duration: Duration::from_millis(20),
        };
        let results = vec![
            PortResult::new(Port::new(22).unwrap(), PortOutcome::Open, Duration::from_millis(1)),
            PortResult::new(Port::new(21).unwrap(), PortOutcome::Closed, Duration::from_millis(1)),
        ];
        ScanReport::new(summary, results)
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
    }

    #[test]
    fn test_plain_hides_closed_by_default() {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        write_plain(&mut buf, &report(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("2 ports scanned"));
        assert!(text.contains("    22  open"));
        assert!(!text.contains("    21  closed"));
    }

    #[test]
    fn test_plain_show_closed() {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        write_plain(&mut buf, &report(), true).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("    21  closed"));
    }

    #[test]
    fn test_live_line() {
        console::set_colors_enabled(false);
        let result = PortResult::new(
            Port::new(8002).unwrap(),
            PortOutcome::Error("too many open files".to_string()),
            Duration::ZERO,
        );
        assert_eq!(format_live(&result), "Port 8002 error: too many open files");
    }
}
