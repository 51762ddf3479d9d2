//! Scanner module - the dispatcher and its probes.
//!
//! The [`Dispatcher`] walks the configured port range in ascending order,
//! takes a concurrency slot before launching each probe, and waits on the
//! drain barrier before returning. Results flow out through a channel as
//! probes finish, in no particular order; the channel closing marks the
//! end of the scan.

mod cancel;
mod report;
mod slots;
pub mod tcp;
pub mod traits;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use report::{ScanReport, ScanSummary};
pub use slots::{ConcurrencySlots, Slot, SlotsClosed};
pub use tcp::TcpProber;
pub use traits::{PortOutcome, PortResult, Prober, ScanTask};

use crate::config::ScanConfig;
use crate::error::{ProbeError, ScanResult};
use crate::types::Port;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Receiving end of a scan's result stream.
pub type ResultReceiver = mpsc::UnboundedReceiver<PortResult>;
/// Sending end of a scan's result stream.
pub type ResultSender = mpsc::UnboundedSender<PortResult>;

/// Fans probes out over a port range with at most `concurrency` in flight.
pub struct Dispatcher<P: ?Sized> {
    config: ScanConfig,
    prober: Arc<P>,
    cancel: CancelSignal,
}

impl Dispatcher<TcpProber> {
    /// Dispatcher using the TCP connect prober.
    pub fn tcp(config: ScanConfig) -> Self {
        Self::new(config, Arc::new(TcpProber::new()))
    }
}

impl<P: Prober + ?Sized + 'static> Dispatcher<P> {
    pub fn new(config: ScanConfig, prober: Arc<P>) -> Self {
        Self {
            config,
            prober,
            cancel: CancelSignal::never(),
        }
    }

    /// Attach a cancellation signal.
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the scan, sending one result per port into `results`.
    ///
    /// The target is resolved before any socket is opened; resolution
    /// failures are returned as configuration errors. Once probing starts
    /// this only returns after every launched probe has released its slot,
    /// and dropping `results` on return closes the stream.
    pub async fn run(self, results: ResultSender) -> ScanResult<ScanSummary> {
        let started = Instant::now();
        let target = self.config.target().resolve().await?;
        let range = self.config.range();
        let slots = ConcurrencySlots::new(self.config.concurrency());
        let mut cancel = self.cancel.clone();

        info!(
            %target,
            ports = %range,
            port_count = range.port_count(),
            concurrency = slots.limit(),
            timeout = ?self.config.timeout(),
            "scan started"
        );

        let mut ports = range.iter();
        let mut launched = 0usize;
        let mut cancelled = false;

        while let Some(port) = ports.next() {
            let acquired = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                slot = slots.acquire() => Some(slot),
            };

            let slot = match acquired {
                Some(Ok(slot)) => slot,
                Some(Err(e)) => {
                    warn!(%port, error = %e, "could not reserve a slot, skipping port");
                    let outcome = PortOutcome::Error(e.to_string());
                    emit(&results, PortResult::new(port, outcome, Duration::ZERO));
                    continue;
                }
                None => {
                    cancelled = true;
                    emit(&results, PortResult::error(port, ProbeError::Cancelled));
                    break;
                }
            };

            let task = ScanTask::new(
                target.ip,
                port,
                self.config.timeout(),
                self.config.verbose(),
            );
            tokio::spawn(run_probe(
                Arc::clone(&self.prober),
                task,
                slot,
                self.cancel.clone(),
                results.clone(),
            ));
            launched += 1;
        }

        // Ports never launched still get exactly one result.
        for port in ports {
            emit(&results, PortResult::error(port, ProbeError::Cancelled));
        }

        slots.drain().await;

        let summary = ScanSummary {
            target,
            range,
            launched,
            cancelled,
            duration: started.elapsed(),
        };
        info!(
            launched = summary.launched,
            cancelled = summary.cancelled,
            elapsed = ?summary.duration,
            "scan complete"
        );
        Ok(summary)
    }
}

/// Body of one spawned probe. The slot is held until this returns.
async fn run_probe<P: Prober + ?Sized>(
    prober: Arc<P>,
    task: ScanTask,
    _slot: Slot,
    mut cancel: CancelSignal,
    results: ResultSender,
) {
    let port = task.port();
    let probe = AssertUnwindSafe(prober.probe(task)).catch_unwind();

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => PortResult::error(port, ProbeError::Cancelled),
        outcome = probe => outcome.unwrap_or_else(|_| {
            warn!(%port, "probe panicked");
            PortResult::error(port, ProbeError::Panicked)
        }),
    };

    if task.verbose() {
        debug!(%port, outcome = %result.outcome, "port probed");
    } else {
        trace!(%port, outcome = %result.outcome, "port probed");
    }
    emit(&results, result);
}

fn emit(results: &ResultSender, result: PortResult) {
    let port: Port = result.port;
    if results.send(result).is_err() {
        debug!(%port, "result receiver dropped");
    }
}

/// Scan a configuration with the TCP prober and collect every result.
pub async fn run_scan(config: ScanConfig) -> ScanResult<ScanReport> {
    run_scan_with(Dispatcher::tcp(config)).await
}

/// Drive a dispatcher to completion and collect its results into a report.
pub async fn run_scan_with<P: Prober + ?Sized + 'static>(
    dispatcher: Dispatcher<P>,
) -> ScanResult<ScanReport> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let collect = async {
        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        results
    };

    let (summary, results) = tokio::join!(dispatcher.run(tx), collect);
    Ok(ScanReport::new(summary?, results))
}
