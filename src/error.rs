//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Only the fatal kinds
//! live here; a failed probe is a [`ProbeOutcome`](crate::scanner::ProbeOutcome),
//! not an error.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// The target could not be turned into a connectable address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unable to resolve '{target}': {reason}")]
pub struct ResolutionError {
    /// The identifier exactly as the operator supplied it.
    pub target: String,
    /// Resolver diagnostic.
    pub reason: String,
}

impl ResolutionError {
    pub fn new(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Invalid scan parameters or settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid port range: {0}")]
    Ports(#[from] PortError),

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("thread count {0} is too large")]
    TooManyThreads(usize),

    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("failed to read settings from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),
}

/// Errors that abort a scan before any port is probed.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure writing the result file. Never invalidates the scan itself.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown output format '{0}' (expected json or csv)")]
    UnknownFormat(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for the result sink.
pub type OutputResult<T> = Result<T, OutputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_keeps_target() {
        let err = ResolutionError::new("nope.invalid", "no record found");
        assert_eq!(err.target, "nope.invalid");
        assert_eq!(
            err.to_string(),
            "unable to resolve 'nope.invalid': no record found"
        );
    }

    #[test]
    fn test_port_error_becomes_config_error() {
        let err: ConfigError = PortError::InvalidRange(100, 50).into();
        assert!(matches!(err, ConfigError::Ports(PortError::InvalidRange(100, 50))));

        let err: ScanError = err.into();
        assert!(matches!(err, ScanError::Config(_)));
    }
}
