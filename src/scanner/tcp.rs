//! TCP connect prober.
//!
//! Performs a non-blocking connect through `socket2`, then hands the socket
//! to the tokio reactor and waits for writability, bounded by the task's
//! timeout. The pending socket error decides between open and closed.
//!
//! The socket is owned by a single value for the whole probe, so it is
//! closed on every exit path when that value is dropped.

use crate::error::{ProbeError, ProbeResult};
use crate::scanner::traits::{PortOutcome, PortResult, Prober, ScanTask};
use async_trait::async_trait;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, trace, warn};

/// State reached right after the non-blocking connect call.
#[derive(Debug)]
enum Initiated {
    /// The handshake finished synchronously (usually loopback).
    Connected(Socket),
    /// The connect is in progress; readiness must be awaited.
    InProgress(Socket),
    /// The peer refused synchronously.
    Refused,
}

/// TCP connect prober.
///
/// Does not require elevated privileges. One attempt per port; there is no
/// retry within a probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

impl TcpProber {
    pub fn new() -> Self {
        Self
    }

    /// Create a non-blocking stream socket for the address family of `addr`.
    fn open_socket(addr: SocketAddr) -> ProbeResult<Socket> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(ProbeError::Socket)?;
        socket.set_nonblocking(true).map_err(ProbeError::Socket)?;
        Ok(socket)
    }

    /// Start the connection without blocking.
    fn initiate(addr: SocketAddr) -> ProbeResult<Initiated> {
        let socket = Self::open_socket(addr)?;

        match socket.connect(&SockAddr::from(addr)) {
            Ok(()) => Ok(Initiated::Connected(socket)),
            Err(e) if is_in_progress(&e) => Ok(Initiated::InProgress(socket)),
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => Ok(Initiated::Refused),
            Err(e) => Err(ProbeError::Connect(e)),
        }
    }

    /// Wait for the in-progress connect to resolve, up to `deadline`.
    ///
    /// With no deadline the wait is bounded only by the kernel's own connect
    /// timeout.
    async fn await_readiness(
        socket: Socket,
        deadline: Option<Instant>,
    ) -> ProbeResult<PortOutcome> {
        let stream = TcpStream::from_std(socket.into()).map_err(ProbeError::Readiness)?;

        let ready = match deadline {
            Some(deadline) => timeout_at(deadline, stream.writable()).await,
            None => Ok(stream.writable().await),
        };

        match ready {
            Ok(Ok(())) => match stream.take_error().map_err(ProbeError::Readiness)? {
                None if stream.peer_addr().is_ok() => Ok(PortOutcome::Open),
                None => Ok(PortOutcome::Closed),
                Some(e) => {
                    trace!(error = %e, "pending socket error");
                    Ok(PortOutcome::Closed)
                }
            },
            Ok(Err(e)) => Err(ProbeError::Readiness(e)),
            Err(_) => Ok(PortOutcome::Timeout),
        }
    }

    async fn attempt(task: &ScanTask, started: Instant) -> ProbeResult<PortOutcome> {
        // A timeout past the end of the clock means no deadline at all.
        let deadline = started.checked_add(task.timeout());

        trace!(addr = %task.addr(), "connecting");
        match Self::initiate(task.addr())? {
            Initiated::Connected(socket) => {
                drop(socket);
                Ok(PortOutcome::Open)
            }
            Initiated::Refused => Ok(PortOutcome::Closed),
            Initiated::InProgress(socket) => {
                trace!(addr = %task.addr(), "waiting for readiness");
                Self::await_readiness(socket, deadline).await
            }
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, task: ScanTask) -> PortResult {
        let started = Instant::now();

        let outcome = match Self::attempt(&task, started).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(port = %task.port(), error = %e, "probe failed");
                PortOutcome::Error(e.to_string())
            }
        };
        let elapsed = started.elapsed();

        debug!(port = %task.port(), %outcome, ?elapsed, "probe finished");
        PortResult::new(task.port(), outcome, elapsed)
    }
}

/// Whether a connect error means "still connecting".
fn is_in_progress(e: &io::Error) -> bool {
    #[cfg(unix)]
    {
        if e.raw_os_error() == Some(libc::EINPROGRESS) {
            return true;
        }
    }
    e.kind() == io::ErrorKind::WouldBlock
}
