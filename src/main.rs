//! portsweep binary: parse arguments, scan, report.
//!
//! Exit status is 0 on success, 2 for configuration errors (nothing was
//! probed) and 1 for any other failure.

use anyhow::{Context, Result};
use clap::Parser;
use portsweep::cli::{Cli, OutputFormat};
use portsweep::error::{ConfigError, ScanError};
use portsweep::output;
use portsweep::scanner::{cancel_pair, Dispatcher, ScanReport};
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            if is_config_error(&e) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "portsweep=info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn is_config_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ConfigError>().is_some()
        || matches!(e.downcast_ref::<ScanError>(), Some(ScanError::Config(_)))
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;
    let config = cli.scan_config(&settings)?;
    let format = cli.output_format(&settings);
    let show_closed = cli.show_closed(&settings);
    let verbose = config.verbose();
    let live = format == OutputFormat::Plain && !cli.quiet;

    if live {
        output::print_scan_header(
            &config.target().to_string(),
            &config.range().to_string(),
            config.concurrency(),
        );
    }

    let (cancel, signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling scan");
            cancel.cancel();
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let scan = tokio::spawn(Dispatcher::tcp(config).with_cancel(signal).run(tx));

    // The channel closes once the dispatcher and every probe are done.
    let mut results = Vec::new();
    while let Some(result) = rx.recv().await {
        if live && (verbose || result.is_open()) {
            output::print_live(&result);
        }
        results.push(result);
    }

    let summary = scan.await.context("scan task failed")??;
    let report = ScanReport::new(summary, results);

    if report.cancelled {
        output::print_warning("scan cancelled; unprobed ports are reported as errors");
    }
    output::print_results(&report, format, show_closed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_errors_exit_with_status_2() {
        let range = anyhow::Error::from(ConfigError::InvalidPortRange { start: 100, end: 50 });
        assert!(is_config_error(&range));

        let dns = anyhow::Error::from(ScanError::from(ConfigError::DnsResolutionFailed {
            host: "nowhere.invalid".to_string(),
            reason: "no record".to_string(),
        }));
        assert!(is_config_error(&dns));

        let settings = anyhow::Error::from(ConfigError::InvalidFormat("bad".to_string()))
            .context("loading settings");
        assert!(is_config_error(&settings));
    }

    #[test]
    fn test_other_failures_exit_with_status_1() {
        assert!(!is_config_error(&anyhow::anyhow!("scan task failed")));
        assert!(!is_config_error(&anyhow::Error::from(io::Error::from(
            io::ErrorKind::BrokenPipe
        ))));
    }
}
