//! Discovery tuning parameters.
//!
//! Defaults are the protocol constants of a stock Proxmox VE install. They
//! are gathered in one struct so tests and embedding applications can shrink
//! timeouts or point the engine at another port without touching globals.

use crate::error::{DiscoveryError, DiscoveryResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Port the Proxmox VE API listens on.
pub const DEFAULT_PORT: u16 = 8006;

/// Unauthenticated path used to confirm a host speaks the Proxmox API.
pub const DEFAULT_API_PATH: &str = "/api2/json/version";

/// Per-host TCP dial timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(800);

/// Per-host HTTP verification timeout.
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of concurrent TCP dials.
pub const DEFAULT_WORKERS: usize = 50;

/// Maximum number of concurrent HTTP verifications.
pub const DEFAULT_VERIFY_CONCURRENCY: usize = 8;

/// Configuration for a discovery scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// TCP port probed and used in instance URLs.
    pub port: u16,
    /// Path requested during HTTP verification.
    pub api_path: String,
    /// TCP connect timeout per host.
    #[serde(with = "duration_ms", rename = "probe_timeout_ms")]
    pub probe_timeout: Duration,
    /// HTTP request timeout per open host.
    #[serde(with = "duration_ms", rename = "verify_timeout_ms")]
    pub verify_timeout: Duration,
    /// Admission gate capacity for TCP dials.
    pub workers: usize,
    /// Parallel HTTP verifications.
    pub verify_concurrency: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_path: DEFAULT_API_PATH.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
            workers: DEFAULT_WORKERS,
            verify_concurrency: DEFAULT_VERIFY_CONCURRENCY,
        }
    }
}

impl DiscoveryConfig {
    /// Set the probed port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the verification path.
    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    /// Set the TCP dial timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the HTTP verification timeout.
    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }

    /// Set the number of concurrent dials.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the number of concurrent verifications.
    pub fn with_verify_concurrency(mut self, concurrency: usize) -> Self {
        self.verify_concurrency = concurrency;
        self
    }

    /// Reject values that would stall or disable a scan.
    pub fn validate(&self) -> DiscoveryResult<()> {
        if self.port == 0 {
            return Err(DiscoveryError::InvalidConfig("port must be non-zero".into()));
        }
        if !self.api_path.starts_with('/') {
            return Err(DiscoveryError::InvalidConfig(format!(
                "api path must start with '/': {}",
                self.api_path
            )));
        }
        if self.workers == 0 {
            return Err(DiscoveryError::InvalidConfig("workers must be at least 1".into()));
        }
        if self.verify_concurrency == 0 {
            return Err(DiscoveryError::InvalidConfig(
                "verify concurrency must be at least 1".into(),
            ));
        }
        if self.probe_timeout.is_zero() || self.verify_timeout.is_zero() {
            return Err(DiscoveryError::InvalidConfig("timeouts must be non-zero".into()));
        }
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
