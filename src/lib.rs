//! # portsweep - A Bounded-Concurrency TCP Connect Scanner
//!
//! portsweep probes a range of TCP ports on one host, reports the ports that
//! accept a connection, and labels each with its likely service.
//!
//! ## Features
//!
//! - **Connect scanning**: one full TCP handshake per port, no privileges needed
//! - **Bounded concurrency**: at most `threads` probes (and sockets) in flight
//! - **Service labels**: OS services database with a built-in fallback table
//! - **Result files**: JSON pairs or CSV rows of the open ports
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::{run_scan, ScanConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsweep::ScanError> {
//!     let config = ScanConfig::new("192.168.1.1")
//!         .with_ports("20-25")
//!         .with_threads(4)
//!         .with_timeout(Duration::from_millis(500));
//!
//!     let results = run_scan(&config).await?;
//!     for (port, service) in results.pairs() {
//!         println!("{port} open - {service}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port ranges, and target resolution
//! - [`services`] - Port to service-name classification
//! - [`scanner`] - The connect prober and the scan coordinator
//! - [`output`] - JSON/CSV result files and console summaries
//! - [`config`] - Settings file with scan defaults
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, OutputError, ResolutionError, ScanError};
pub use scanner::{OpenPort, ProbeOutcome, ProbeResult, Prober, ScanConfig, ScanResults};
pub use types::{Port, PortRange, ScanTarget};
