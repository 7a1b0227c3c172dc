//! Command-line interface definitions for portsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file, then to built-in defaults.

use crate::config::AppSettings;
use crate::error::ConfigResult;
use crate::output::{self, OutputFormat};
use crate::scanner::{self, timeout_from_secs, ScanConfig, ScanPlan, ScanResults};
use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A bounded-concurrency TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan a host for open TCP ports", long_about = None)]
pub struct Args {
    /// Target IP address or hostname to scan
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Port range to scan, e.g. "1-1024" or "22" [default: 1-1024]
    #[arg(short, long, value_name = "START-END")]
    pub ports: Option<String>,

    /// Maximum number of concurrent connection attempts [default: 10]
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Connection timeout in seconds [default: 2]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Write open ports to this file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output file format: json or csv [default: json]
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Show a progress bar while scanning
    #[arg(long)]
    pub progress: bool,

    /// Verbose output (show errored ports and scan details)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings, errors and the final summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Load settings from `--config`, or from the default location.
    ///
    /// An explicitly named file must load; the default one may be absent
    /// or broken.
    pub fn load_settings(&self) -> anyhow::Result<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path)
                .with_context(|| format!("cannot use settings file {}", path.display())),
            None => Ok(AppSettings::load()),
        }
    }

    /// Merge flags over `settings` into a validated scan configuration.
    ///
    /// The port range comes back in canonical `start-end` form.
    pub fn scan_config(&self, settings: &AppSettings) -> ConfigResult<ScanConfig> {
        let timeout = timeout_from_secs(self.timeout.unwrap_or(settings.default_timeout_secs))?;
        let ports = self
            .ports
            .clone()
            .unwrap_or_else(|| settings.default_ports.clone());

        let config = ScanConfig::new(self.target.trim())
            .with_ports(ports)
            .with_threads(self.threads.unwrap_or(settings.default_threads))
            .with_timeout(timeout)
            .with_progress(self.progress || settings.progress);

        let plan = ScanPlan::from_config(&config)?;
        Ok(config.with_ports(plan.range().to_string()))
    }

    /// Selected output format name, not yet validated.
    pub fn format_name<'a>(&'a self, settings: &'a AppSettings) -> &'a str {
        self.format.as_deref().unwrap_or(&settings.default_format)
    }

    /// Run the scan described by these arguments.
    pub async fn execute(self) -> anyhow::Result<()> {
        let settings = self.load_settings()?;
        let config = self
            .scan_config(&settings)
            .context("invalid scan configuration")?;

        if !self.quiet {
            output::print_scan_header(
                &config.target,
                &config.ports,
                config.threads,
                config.timeout,
                Local::now(),
            );
        }

        let results = scanner::run_scan(&config).await.context("scan aborted")?;

        if let Err(e) = output::print_summary(&results) {
            warn!("failed to print summary: {e}");
        }

        if let Some(path) = &self.output {
            save(path, self.format_name(&settings), &results);
        }

        Ok(())
    }
}

/// Write the result file. Failures are reported but never undo the scan.
fn save(path: &Path, format: &str, results: &ScanResults) {
    let format: OutputFormat = match format.parse() {
        Ok(format) => format,
        Err(e) => {
            warn!("{e}; results were not saved");
            return;
        }
    };

    match output::save_results(path, format, &results.open_ports) {
        Ok(()) => output::print_success(&format!(
            "Results saved as {} -> {}",
            format,
            path.display()
        )),
        Err(e) => output::print_error(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("portsweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["192.168.1.1"]);
        let settings = AppSettings::default();
        let config = args.scan_config(&settings).unwrap();

        assert_eq!(config.target, "192.168.1.1");
        assert_eq!(config.ports, "1-1024");
        assert_eq!(config.threads, 10);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert!(args.output.is_none());
        assert_eq!(args.format_name(&settings), "json");
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "example.com",
            "-p",
            "20-25",
            "-t",
            "50",
            "--timeout",
            "0.5",
            "-o",
            "out.csv",
            "--format",
            "csv",
        ]);
        let settings = AppSettings::default();
        let config = args.scan_config(&settings).unwrap();

        assert_eq!(config.ports, "20-25");
        assert_eq!(config.threads, 50);
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(args.output.as_deref(), Some(Path::new("out.csv")));
        assert_eq!(args.format_name(&settings), "csv");
    }

    #[test]
    fn test_settings_fill_unset_flags() {
        let args = parse(&["10.0.0.1", "-t", "3"]);
        let settings = AppSettings {
            default_ports: "1-100".to_string(),
            default_threads: 200,
            default_timeout_secs: 1.0,
            default_format: "csv".to_string(),
            progress: true,
        };
        let config = args.scan_config(&settings).unwrap();

        assert_eq!(config.ports, "1-100");
        assert_eq!(config.threads, 3);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(config.show_progress);
        assert_eq!(args.format_name(&settings), "csv");
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let args = parse(&["10.0.0.1", "--timeout=-3"]);
        assert!(matches!(
            args.scan_config(&AppSettings::default()),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_bad_range_rejected_before_header() {
        let settings = AppSettings::default();

        let args = parse(&["10.0.0.1", "-p", "abc-100"]);
        assert!(matches!(
            args.scan_config(&settings),
            Err(ConfigError::Ports(_))
        ));

        let args = parse(&["10.0.0.1", "-t", "0"]);
        assert!(matches!(
            args.scan_config(&settings),
            Err(ConfigError::ZeroThreads)
        ));
    }

    #[test]
    fn test_range_is_normalized() {
        let args = parse(&["10.0.0.1", "-p", " 20 - 25 "]);
        let config = args.scan_config(&AppSettings::default()).unwrap();
        assert_eq!(config.ports, "20-25");
    }

    #[test]
    fn test_target_required() {
        assert!(Args::try_parse_from(["portsweep"]).is_err());
    }

    #[test]
    fn test_unknown_format_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        let results = crate::scanner::ScanResults {
            target: "127.0.0.1".to_string(),
            ip_address: "127.0.0.1".parse().unwrap(),
            port_range: "1-10".parse().unwrap(),
            ports_scanned: 10,
            open_ports: Vec::new(),
            closed_ports: 10,
            errored_ports: 0,
            duration_ms: 5,
        };

        save(&path, "xml", &results);
        assert!(!path.exists());

        save(&path, "json", &results);
        assert!(path.exists());
    }
}
