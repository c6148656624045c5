//! Scan subcommand implementation.
//!
//! Handles the `pvescan scan [SUBNET]...` command.

use crate::cli::OutputFormat;
use crate::config::DiscoveryConfig;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{ScanResults, Scanner};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

/// Scan subnets for Proxmox VE hosts.
#[derive(Parser, Debug, Default)]
pub struct ScanCommand {
    /// Subnets to scan (CIDR, IPv4 address, or first three octets)
    ///
    /// Examples:
    ///   192.168.1.0/24     CIDR range
    ///   192.168.1.37       Address inside the range
    ///   192.168.1          Partial address
    ///
    /// Each entry is searched as a /24. With no entries, the subnets of the
    /// local interfaces are used.
    #[arg(value_name = "SUBNET")]
    pub subnets: Vec<String>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(
        &self,
        verbose: bool,
        quiet: bool,
        cancel: CancellationToken,
    ) -> CliResult<()> {
        let mut scanner = Scanner::new(DiscoveryConfig::default())?.with_cancellation(cancel);

        let subnets = scanner.resolve_subnets(self.subnets.as_slice())?;
        let plain = self.output == OutputFormat::Plain;

        if subnets.is_empty() {
            if !quiet {
                output::print_warning("No usable IPv4 interfaces found; nothing to scan.");
            }
            output::print_results(&ScanResults::default(), self.output)?;
            return Ok(());
        }

        // Print scan header (unless JSON/CSV output for clean parsing)
        if !quiet && plain {
            output::print_scan_header(&subnets, scanner.config().port);
        }

        if verbose && !quiet {
            scanner = scanner.with_progress(progress_bar());
        }

        let results = scanner.scan_subnets(&subnets).await?;
        output::print_results(&results, self.output)?;

        Ok(())
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
