//! Configuration for discovery scans.
//!
//! The engine reads no files or environment variables; callers build a
//! [`DiscoveryConfig`] (usually the default) and hand it to the scanner.

mod settings;

pub use settings::{
    DiscoveryConfig, DEFAULT_API_PATH, DEFAULT_PORT, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_VERIFY_CONCURRENCY, DEFAULT_VERIFY_TIMEOUT, DEFAULT_WORKERS,
};
