//! Prober trait abstraction.
//!
//! Defines the probe outcome model and the interface the coordinator drives,
//! so the worker pool can be exercised against test doubles.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Default port range expression.
pub const DEFAULT_PORTS: &str = "1-1024";
/// Default number of concurrent probes.
pub const DEFAULT_THREADS: usize = 10;
/// Default per-connection timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 2.0;

/// Outcome of one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// The connection was accepted.
    Open { service: String },
    /// Refused, or no answer within the timeout.
    Closed,
    /// Any other I/O failure. Recorded per port, never fatal.
    Errored { message: String },
}

impl ProbeOutcome {
    pub fn open(service: impl Into<String>) -> Self {
        Self::Open {
            service: service.into(),
        }
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self::Errored {
            message: message.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { service } => write!(f, "open ({service})"),
            Self::Closed => write!(f, "closed"),
            Self::Errored { message } => write!(f, "error: {message}"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The port number that was probed.
    pub port: Port,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn new(port: Port, outcome: ProbeOutcome) -> Self {
        Self { port, outcome }
    }
}

/// Scan parameters for one invocation.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Target as supplied by the operator.
    pub target: String,
    /// Port range expression, e.g. `1-1024`.
    pub ports: String,
    /// Maximum number of probes in flight.
    pub threads: usize,
    /// Per-connection timeout.
    pub timeout: Duration,
    /// Draw a progress bar while scanning.
    pub show_progress: bool,
}

impl ScanConfig {
    /// Create a configuration with default ports, threads and timeout.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ports: DEFAULT_PORTS.to_string(),
            threads: DEFAULT_THREADS,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            show_progress: false,
        }
    }

    /// Set the port range expression.
    pub fn with_ports(mut self, ports: impl Into<String>) -> Self {
        self.ports = ports.into();
        self
    }

    /// Set the concurrency limit.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Convert a timeout given in seconds, rejecting zero, negative and
/// non-finite values.
pub fn timeout_from_secs(secs: f64) -> ConfigResult<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidTimeout(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(secs))
}

/// Trait for port prober implementations.
///
/// Implementations hold only read-only state and are shared across workers
/// behind an `Arc`. `probe` must never panic or return early without an
/// outcome: every failure is folded into [`ProbeOutcome`].
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single port exactly once.
    async fn probe(&self, port: Port) -> ProbeResult;

    /// Get the target IP address.
    fn target(&self) -> IpAddr;

    /// Get the configured timeout.
    fn timeout(&self) -> Duration;
}
