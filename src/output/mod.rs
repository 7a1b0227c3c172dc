//! Output formatting module.
//!
//! Writes the open-port list to a file as JSON or CSV, and prints console
//! summaries.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_scan_header, print_success, print_summary, write_summary};

use crate::error::{OutputError, OutputResult};
use crate::scanner::OpenPort;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

/// Result file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Array of `[port, service]` pairs
    #[default]
    Json,
    /// `port,service,banner` rows
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(OutputError::UnknownFormat(s.to_string())),
        }
    }
}

/// Write `open_ports` to `path` in `format`, replacing any existing file.
pub fn save_results(path: &Path, format: OutputFormat, open_ports: &[OpenPort]) -> OutputResult<()> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => write_json(&mut writer, open_ports)?,
        OutputFormat::Csv => write_csv(&mut writer, open_ports)?,
    }

    writer.into_inner().map_err(|e| io_err(e.into_error()))?;
    Ok(())
}
