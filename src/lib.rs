//! # pvescan - Proxmox VE Network Discovery
//!
//! pvescan locates Proxmox VE hosts on local or user-specified IPv4 subnets
//! without any prior configuration.
//!
//! ## Pipeline
//!
//! - **Subnet resolution**: user hints (CIDR, address, or partial address)
//!   are normalized to /24s; with no hints, local interfaces are used
//! - **Host expansion**: each /24 yields its 254 usable addresses
//! - **Port probing**: every candidate is TCP-dialed on the API port behind
//!   a fixed-size admission gate with a short timeout
//! - **Verification**: each open host gets one HTTPS request on the API path;
//!   any HTTP response confirms it
//!
//! Unreachable hosts are the common case and are never reported as errors.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use pvescan::scan;
//!
//! #[tokio::main]
//! async fn main() {
//!     let results = scan(&["192.168.1.0/24"]).await.unwrap();
//!
//!     for instance in &results.instances {
//!         println!("{} -> {}", instance.ip, instance.url);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - `Subnet` and `Instance` with normalization and expansion
//! - [`interfaces`] - Local interface enumeration
//! - [`scanner`] - Probe traits, TCP/HTTPS implementations, and the coordinator
//! - [`config`] - Discovery tuning parameters
//! - [`error`] - Error types
//! - [`cli`] / [`output`] - Command-line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod interfaces;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use config::DiscoveryConfig;
pub use error::{CliError, DiscoveryError, DiscoveryResult};
pub use interfaces::local_subnets;
pub use scanner::{scan, ScanResults, Scanner};
pub use types::{expand_subnet, normalize_subnet, Instance, Subnet};
