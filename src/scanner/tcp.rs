//! TCP connect probe.
//!
//! Completes a full handshake through the operating system's socket API and
//! closes the stream straight away. No data is exchanged and no elevated
//! privileges are required.

use crate::scanner::traits::PortProbe;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect probe with a hard dial timeout.
#[derive(Debug, Clone)]
pub struct TcpConnectProbe {
    timeout: Duration,
}

impl TcpConnectProbe {
    /// Create a probe that gives up on each dial after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl PortProbe for TcpConnectProbe {
    async fn is_open(&self, addr: SocketAddr) -> bool {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                trace!("{} accepted connection", addr);
                true
            }
            Ok(Err(e)) => {
                trace!("{} closed: {}", addr, e);
                false
            }
            Err(_) => {
                trace!("{} timed out after {:?}", addr, self.timeout);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    #[test]
    fn test_probe_creation() {
        let probe = TcpConnectProbe::new(Duration::from_millis(800));
        assert_eq!(probe.timeout, Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_open_port() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let probe = TcpConnectProbe::new(Duration::from_millis(500));
        assert!(probe.is_open(addr).await);
    }

    #[tokio::test]
    async fn test_closed_port() {
        // Grab a free port, then release it so nothing listens there.
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = TcpConnectProbe::new(Duration::from_millis(200));
        assert!(!probe.is_open(addr).await);
    }
}
