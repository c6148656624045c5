//! Discovered Proxmox VE endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// A host that answered HTTP on the Proxmox API path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    /// Address of the host.
    pub ip: Ipv4Addr,
    /// HTTPS base URL of the API (`https://<ip>:<port>`).
    pub url: String,
}

impl Instance {
    /// Create an instance for `ip` served on `port`.
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            ip,
            url: format!("https://{}:{}", ip, port),
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
