//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `pvescan scan [SUBNET]...` - Discover Proxmox VE hosts
//! - `pvescan subnets` - Show auto-detected local subnets
//! - `pvescan normalize <INPUT>...` - Canonicalize subnet input

mod scan;
mod subnets;

pub use scan::ScanCommand;
pub use subnets::{NormalizeCommand, SubnetsCommand};

use clap::{Parser, Subcommand};

/// pvescan - find Proxmox VE hosts on the local network.
///
/// Every host of each /24 is probed on the Proxmox API port, and hosts with
/// an open port are confirmed over HTTPS. With no subnets given, the /24 of
/// every active local interface is searched.
#[derive(Parser, Debug)]
#[command(name = "pvescan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover Proxmox VE hosts on local subnets", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to scanning local subnets)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan subnets for Proxmox VE hosts
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// List the /24 subnets detected on local interfaces
    #[command(alias = "ls")]
    Subnets(SubnetsCommand),

    /// Print the canonical /24 for each input
    #[command(alias = "n")]
    Normalize(NormalizeCommand),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Plain
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
