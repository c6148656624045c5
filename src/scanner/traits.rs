//! Probe trait abstractions.
//!
//! The coordinator only talks to these traits, so the TCP and HTTP stages
//! can be swapped for instrumented or scripted implementations.

use crate::types::Instance;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};

/// TCP reachability check for a single address.
///
/// # Example
///
/// ```ignore
/// use pvescan::scanner::{PortProbe, TcpConnectProbe};
///
/// async fn reachable<P: PortProbe>(probe: &P, addr: SocketAddr) -> bool {
///     probe.is_open(addr).await
/// }
/// ```
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Whether `addr` accepted a connection.
    ///
    /// Refusals, timeouts and unreachable errors all count as closed.
    async fn is_open(&self, addr: SocketAddr) -> bool;
}

/// Confirms that an open host speaks the Proxmox API.
#[async_trait]
pub trait ProtocolVerifier: Send + Sync {
    /// The discovered instance, or `None` when the host did not answer.
    async fn verify(&self, host: Ipv4Addr) -> Option<Instance>;
}
