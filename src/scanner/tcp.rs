//! TCP connect prober implementation.
//!
//! Performs standard TCP connect probes using the operating system's
//! socket API. Completes the full handshake, so no privileges are needed.

use crate::scanner::traits::{ProbeOutcome, ProbeResult, Prober};
use crate::services::ServiceClassifier;
use crate::types::Port;
use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// TCP connect prober.
///
/// One connection attempt per call. The stream is dropped as soon as the
/// outcome is known, and a timed-out attempt drops the pending connect, so a
/// socket never outlives its probe.
pub struct TcpConnectProber {
    target: IpAddr,
    timeout: Duration,
    classifier: ServiceClassifier,
}

impl TcpConnectProber {
    /// Create a new TCP connect prober.
    ///
    /// # Arguments
    /// * `target` - Target IP address to probe
    /// * `timeout` - Connection timeout per port
    /// * `classifier` - Labels ports that accept the connection
    pub fn new(target: IpAddr, timeout: Duration, classifier: ServiceClassifier) -> Self {
        Self {
            target,
            timeout,
            classifier,
        }
    }

    /// Drive `connect` under the probe timeout and classify the result.
    async fn attempt_connect<F>(&self, port: Port, connect: F) -> ProbeOutcome
    where
        F: Future<Output = io::Result<TcpStream>>,
    {
        match timeout(self.timeout, connect).await {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeOutcome::open(self.classifier.classify(port.as_u16()))
            }
            Ok(Err(e)) => outcome_for_error(&e),
            Err(_) => ProbeOutcome::Closed,
        }
    }
}

/// Map a failed connect onto a probe outcome.
fn outcome_for_error(err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::TimedOut => ProbeOutcome::Closed,
        _ => ProbeOutcome::errored(err.to_string()),
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, port: Port) -> ProbeResult {
        let addr = SocketAddr::new(self.target, port.as_u16());
        let outcome = self.attempt_connect(port, TcpStream::connect(addr)).await;
        ProbeResult::new(port, outcome)
    }

    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
