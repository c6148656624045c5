//! Subnet helper subcommands.
//!
//! `pvescan subnets` shows what an argument-less scan would search, and
//! `pvescan normalize` echoes how typed input will be interpreted.

use crate::error::CliResult;
use crate::interfaces::local_subnets;
use crate::output;
use crate::types::{normalize_subnet, Subnet};
use clap::Parser;
use std::io::{self, Write};

/// List the /24 subnets detected on local interfaces.
#[derive(Parser, Debug)]
pub struct SubnetsCommand {
    /// Print the list as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl SubnetsCommand {
    /// Execute the subnets command.
    pub fn execute(&self, quiet: bool) -> CliResult<()> {
        let subnets = local_subnets()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&subnets)?);
            return Ok(());
        }

        if subnets.is_empty() && !quiet {
            output::print_info("No usable IPv4 interfaces found.");
        }
        output::print_subnets(&subnets)?;
        Ok(())
    }
}

/// Print the canonical /24 for each input.
#[derive(Parser, Debug)]
pub struct NormalizeCommand {
    /// Subnet, address, or partial address to normalize
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,
}

impl NormalizeCommand {
    /// Execute the normalize command.
    ///
    /// Stops at the first input that cannot be normalized.
    pub fn execute(&self) -> CliResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for subnet in normalize_all(&self.inputs)? {
            writeln!(out, "{}", subnet)?;
        }
        Ok(())
    }
}

fn normalize_all(inputs: &[String]) -> CliResult<Vec<Subnet>> {
    inputs
        .iter()
        .map(|input| normalize_subnet(input).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, DiscoveryError};

    #[test]
    fn test_normalize_all() {
        let inputs = vec!["10.1.2.3".to_string(), "10.1.3".to_string()];
        let subnets = normalize_all(&inputs).unwrap();
        assert_eq!(
            subnets,
            vec![Subnet::from_octets(10, 1, 2), Subnet::from_octets(10, 1, 3)]
        );
    }

    #[test]
    fn test_normalize_all_reports_bad_input() {
        let inputs = vec!["10.1.2.3".to_string(), "nope".to_string()];
        assert!(matches!(
            normalize_all(&inputs),
            Err(CliError::Discovery(DiscoveryError::Parse(s))) if s == "nope"
        ));
    }
}
