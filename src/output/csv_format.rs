//! CSV output formatting.

use crate::error::OutputResult;
use crate::scanner::OpenPort;
use std::io::Write;

/// Write open ports as CSV with a `port,service,banner` header.
///
/// `banner` is reserved and always empty.
pub fn write_csv<W: Write>(writer: W, open_ports: &[OpenPort]) -> OutputResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    // Header is written even when nothing is open
    wtr.write_record(["port", "service", "banner"])?;

    for open in open_ports {
        wtr.write_record([open.port.to_string().as_str(), open.service.as_str(), ""])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
