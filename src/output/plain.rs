//! Plain text console reporting.
//!
//! Produces human-readable output with colors and formatting. None of this
//! is part of the result data; it is operator feedback only.

use crate::scanner::ScanResults;
use chrono::{DateTime, Local};
use console::style;
use std::io::{self, Write};
use std::time::Duration;

const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print a scan header before scanning begins.
pub fn print_scan_header(
    target: &str,
    ports: &str,
    threads: usize,
    timeout: Duration,
    started_at: DateTime<Local>,
) {
    println!();
    println!(
        "{} {} v{} at {}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        started_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(target).white().bold()
    );
    println!(
        "{} Ports: {} with {} workers, {:.2}s timeout",
        style("•").dim(),
        style(ports).white().bold(),
        threads,
        timeout.as_secs_f64()
    );
    println!();
}

/// Print the end-of-scan summary to stdout.
pub fn print_summary(results: &ScanResults) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&mut out, results)
}

/// Write the end-of-scan summary: open port table, elapsed time, counts.
pub fn write_summary<W: Write>(out: &mut W, results: &ScanResults) -> io::Result<()> {
    writeln!(out)?;

    if results.open_ports.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(out, "  {}", style(RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {}",
            style("PORT").bold(),
            style("SERVICE").bold()
        )?;
        writeln!(out, "  {}", style(RULE).dim())?;

        for open in &results.open_ports {
            writeln!(
                out,
                "  {:>6}  {}",
                style(open.port).green().bold(),
                open.service
            )?;
        }

        writeln!(out, "  {}", style(RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} Scan of {} ({}) finished in {:.2} seconds",
        style("[o]").cyan().bold(),
        results.target,
        results.ip_address,
        results.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "{} {} open ports found ({} scanned, {} closed, {} errors)",
        style("[+]").green().bold(),
        style(results.open_ports.len()).green().bold(),
        results.ports_scanned,
        results.closed_ports,
        results.errored_ports
    )?;

    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}
