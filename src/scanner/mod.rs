//! Scanner module - coordinates the concurrent connect scan.
//!
//! The coordinator expands the port range, hands one probe per port to a
//! pool of tokio tasks bounded by a semaphore, and drains their outcomes from
//! a channel in completion order. It is the only owner of the result set;
//! workers report outcomes and never touch shared mutable state.

pub mod tcp;
pub mod traits;

use crate::error::{ConfigError, ConfigResult, ScanResult};
use crate::services::ServiceClassifier;
use crate::types::{resolve, Port, PortRange};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, trace, warn};

pub use tcp::TcpConnectProber;
pub use traits::{
    timeout_from_secs, ProbeOutcome, ProbeResult, Prober, ScanConfig, DEFAULT_PORTS,
    DEFAULT_THREADS, DEFAULT_TIMEOUT_SECS,
};

/// A port that accepted a connection, with its best-effort service label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpenPort {
    pub port: Port,
    pub service: String,
}

impl OpenPort {
    pub fn new(port: Port, service: impl Into<String>) -> Self {
        Self {
            port,
            service: service.into(),
        }
    }
}

/// Complete scan results.
///
/// Only confirmed open ports are kept; closed and errored ports are counted.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResults {
    pub target: String,
    pub ip_address: IpAddr,
    pub port_range: PortRange,
    pub ports_scanned: usize,
    /// Sorted by port number.
    pub open_ports: Vec<OpenPort>,
    pub closed_ports: usize,
    pub errored_ports: usize,
    pub duration_ms: u64,
}

impl ScanResults {
    /// Replace the displayed target name (the resolved address by default).
    pub fn with_target_name(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Open ports as `(port, service)` pairs.
    pub fn pairs(&self) -> Vec<(u16, &str)> {
        self.open_ports
            .iter()
            .map(|p| (p.port.as_u16(), p.service.as_str()))
            .collect()
    }
}

/// A validated port range and concurrency limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPlan {
    range: PortRange,
    threads: usize,
}

impl ScanPlan {
    /// Parse `ports` and validate `threads`. Nothing is probed on failure.
    pub fn new(ports: &str, threads: usize) -> ConfigResult<Self> {
        let range: PortRange = ports.parse()?;
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if threads > Semaphore::MAX_PERMITS {
            return Err(ConfigError::TooManyThreads(threads));
        }
        Ok(Self { range, threads })
    }

    /// Validate every scan parameter in `config`.
    pub fn from_config(config: &ScanConfig) -> ConfigResult<Self> {
        if config.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(0.0));
        }
        Self::new(&config.ports, config.threads)
    }

    pub fn range(&self) -> PortRange {
        self.range
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of ports the plan will probe.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Execute a complete port scan: validate, resolve, probe.
///
/// Configuration and resolution errors are returned before any socket is
/// opened. Per-port failures never surface here.
pub async fn run_scan(config: &ScanConfig) -> ScanResult<ScanResults> {
    let plan = ScanPlan::from_config(config)?;
    let target = resolve(&config.target).await?;

    info!("Scanning ports {} on {}", plan.range(), target.ip);

    let prober = Arc::new(TcpConnectProber::new(
        target.ip,
        config.timeout,
        ServiceClassifier::system(),
    ));

    let results = execute(prober, &plan, config.show_progress).await;
    Ok(results.with_target_name(target.original))
}

/// Probe every port in `plan` with at most `plan.threads()` probes in
/// flight, returning once each dispatched probe has reported.
pub async fn execute<P>(prober: Arc<P>, plan: &ScanPlan, show_progress: bool) -> ScanResults
where
    P: Prober + ?Sized + 'static,
{
    let start_time = Instant::now();
    let total_ports = plan.len();
    let ip_address = prober.target();

    debug!(
        "dispatching {} probes across {} workers (timeout {:?})",
        total_ports,
        plan.threads(),
        prober.timeout()
    );

    let progress = show_progress.then(|| progress_bar(total_ports as u64));

    let semaphore = Arc::new(Semaphore::new(plan.threads()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = tokio::spawn(dispatch(prober, plan.range(), semaphore, tx));

    let mut open_ports = Vec::new();
    let mut closed_ports = 0;
    let mut errored_ports = 0;
    let mut received = 0;

    // Closes once the dispatcher and every worker have dropped their sender
    while let Some(result) = rx.recv().await {
        let ProbeResult { port, outcome } = result;
        received += 1;

        match outcome {
            ProbeOutcome::Open { service } => {
                suspended(progress.as_ref(), || info!("Port {port} open - {service}"));
                if let Some(pb) = &progress {
                    pb.set_message(format!("found {port}/{service}"));
                }
                open_ports.push(OpenPort::new(port, service));
            }
            ProbeOutcome::Closed => {
                closed_ports += 1;
                trace!("port {port} closed");
            }
            ProbeOutcome::Errored { message } => {
                errored_ports += 1;
                suspended(progress.as_ref(), || debug!("port {port} error: {message}"));
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Err(e) = dispatcher.await {
        warn!("probe dispatcher failed: {e}");
    }

    // A worker that died without reporting still counts against the scan
    if received < total_ports {
        let missing = total_ports - received;
        warn!("{missing} probes ended without an outcome");
        errored_ports += missing;
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    open_ports.sort_unstable();

    ScanResults {
        target: ip_address.to_string(),
        ip_address,
        port_range: plan.range(),
        ports_scanned: total_ports,
        open_ports,
        closed_ports,
        errored_ports,
        duration_ms: start_time.elapsed().as_millis() as u64,
    }
}

/// Spawn one probe task per port. A permit is taken before each spawn and
/// released when the probe finishes, which bounds the number of in-flight
/// probes and open sockets.
async fn dispatch<P>(
    prober: Arc<P>,
    range: PortRange,
    semaphore: Arc<Semaphore>,
    tx: mpsc::UnboundedSender<ProbeResult>,
) where
    P: Prober + ?Sized + 'static,
{
    for port in range.iter() {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            // Only happens if the semaphore is closed, which nothing does
            break;
        };

        let prober = Arc::clone(&prober);
        let tx = tx.clone();

        tokio::spawn(async move {
            let result = prober.probe(port).await;
            drop(permit);
            // The receiver outlives every worker
            let _ = tx.send(result);
        });
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

/// Run `f` with the progress bar hidden so log lines do not tear it.
fn suspended<F: FnOnce()>(progress: Option<&ProgressBar>, f: F) {
    match progress {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}
