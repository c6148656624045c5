//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::cli::OutputFormat;
use crate::scanner::ScanResults;
use crate::types::Subnet;
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Format and print scan results.
pub fn print_results(results: &ScanResults, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(results),
        OutputFormat::Json => super::json_format::print_json(results),
        OutputFormat::Csv => super::csv_format::print_csv(results),
    }
}

/// Print results in human-readable plain text format.
pub fn print_plain(results: &ScanResults) -> io::Result<()> {
    let stdout = io::stdout();
    write_plain(&mut stdout.lock(), results)
}

/// Write results in human-readable plain text format.
pub fn write_plain<W: Write>(out: &mut W, results: &ScanResults) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                 {} Discovery Results",
        style("pvescan").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Subnets:").bold(), join_subnets(&results.subnets))?;
    writeln!(
        out,
        "  {} {} hosts probed in {:.2}s, {} with the API port open",
        style("Statistics:").bold(),
        results.hosts_probed,
        results.duration_ms as f64 / 1000.0,
        results.open_hosts
    )?;
    writeln!(out)?;

    if results.instances.is_empty() {
        writeln!(
            out,
            "  {}",
            style(format!(
                "0 instances found on {}",
                join_subnets(&results.subnets)
            ))
            .dim()
        )?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:<15}  {}",
            style("ADDRESS").bold(),
            style("URL").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for instance in &results.instances {
            writeln!(
                out,
                "  {:<15}  {}",
                instance.ip.to_string(),
                style(&instance.url).green().bold()
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(subnets: &[Subnet], port: u16) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("pvescan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Subnets: {}",
        style("•").dim(),
        style(join_subnets(subnets)).white().bold()
    );
    println!(
        "{} Probing {} hosts on port {}...",
        style("•").dim(),
        style(subnets.len() * crate::types::HOSTS_PER_SUBNET).white().bold(),
        port
    );
    println!();
}

/// Print one subnet per line.
pub fn print_subnets(subnets: &[Subnet]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for subnet in subnets {
        writeln!(out, "{}", subnet)?;
    }
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

fn join_subnets(subnets: &[Subnet]) -> String {
    if subnets.is_empty() {
        return "none".to_string();
    }
    subnets
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Instance;
    use std::net::Ipv4Addr;

    fn render(results: &ScanResults) -> String {
        let mut buf = Vec::new();
        write_plain(&mut buf, results).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_join_subnets() {
        assert_eq!(join_subnets(&[]), "none");
        assert_eq!(
            join_subnets(&[Subnet::from_octets(10, 0, 0), Subnet::from_octets(10, 0, 1)]),
            "10.0.0.0/24, 10.0.1.0/24"
        );
    }

    #[test]
    fn test_plain_reports_empty_scan() {
        let results = ScanResults {
            subnets: vec![Subnet::from_octets(192, 168, 1)],
            hosts_probed: 254,
            ..Default::default()
        };
        let text = render(&results);
        assert!(text.contains("0 instances found on 192.168.1.0/24"));
    }

    #[test]
    fn test_plain_lists_instances() {
        let results = ScanResults {
            instances: vec![Instance::new(Ipv4Addr::new(192, 168, 1, 10), 8006)],
            subnets: vec![Subnet::from_octets(192, 168, 1)],
            hosts_probed: 254,
            open_hosts: 1,
            duration_ms: 1200,
        };
        let text = render(&results);
        assert!(text.contains("https://192.168.1.10:8006"));
        assert!(text.contains("1.20s"));
    }
}
