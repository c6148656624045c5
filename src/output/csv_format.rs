//! CSV output formatting.

use crate::scanner::ScanResults;
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(results: &ScanResults) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), results)
}

/// Write one row per discovered instance.
pub fn write_csv<W: Write>(out: W, results: &ScanResults) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    // Write header
    wtr.write_record(["ip", "url"])?;

    for instance in &results.instances {
        wtr.write_record([instance.ip.to_string().as_str(), instance.url.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Instance;
    use std::net::Ipv4Addr;

    #[test]
    fn test_csv_rows() {
        let results = ScanResults {
            instances: vec![
                Instance::new(Ipv4Addr::new(10, 0, 0, 2), 8006),
                Instance::new(Ipv4Addr::new(10, 0, 0, 3), 8006),
            ],
            ..Default::default()
        };

        let mut buf = Vec::new();
        write_csv(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "ip,url\n10.0.0.2,https://10.0.0.2:8006\n10.0.0.3,https://10.0.0.3:8006\n"
        );
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &ScanResults::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ip,url\n");
    }
}
