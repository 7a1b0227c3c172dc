//! JSON output formatting.

use crate::error::OutputResult;
use crate::scanner::OpenPort;
use std::io::Write;

/// Write open ports as a pretty-printed array of `[port, service]` pairs.
pub fn write_json<W: Write>(mut writer: W, open_ports: &[OpenPort]) -> OutputResult<()> {
    let pairs: Vec<(u16, &str)> = open_ports
        .iter()
        .map(|p| (p.port.as_u16(), p.service.as_str()))
        .collect();

    serde_json::to_writer_pretty(&mut writer, &pairs)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    Ok(())
}
