//! Error types for pvescan.
//!
//! Uses `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Main error type for discovery operations.
///
/// Unreachable hosts, refused connections and HTTP transport failures are
/// not errors: they only exclude a host from the results.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("invalid subnet or address: {0}")]
    Parse(String),

    #[error("not an IPv4 network: {0}")]
    InvalidInput(String),

    #[error("failed to enumerate network interfaces: {0}")]
    Enumeration(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("scan cancelled")]
    Cancelled,
}

/// Result type alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors surfaced by CLI command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_messages_are_lowercase() {
        let errors = [
            DiscoveryError::Parse("x".into()),
            DiscoveryError::InvalidInput("x".into()),
            DiscoveryError::Enumeration("x".into()),
            DiscoveryError::HttpClient("x".into()),
            DiscoveryError::InvalidConfig("x".into()),
            DiscoveryError::Cancelled,
        ];
        for err in errors {
            let msg = err.to_string();
            assert!(msg.starts_with(|c: char| c.is_ascii_lowercase()), "{}", msg);
        }
    }

    #[test]
    fn test_invalid_config_message() {
        let err = DiscoveryError::InvalidConfig("workers must be at least 1".into());
        assert_eq!(err.to_string(), "invalid configuration: workers must be at least 1");
    }
}
