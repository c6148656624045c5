//! JSON output formatting.

use crate::scanner::ScanResults;
use std::io::{self, Write};

/// Print results in JSON format.
pub fn print_json(results: &ScanResults) -> io::Result<()> {
    let stdout = io::stdout();
    write_json(&mut stdout.lock(), results)
}

/// Write results as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, results: &ScanResults) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(out)
}
