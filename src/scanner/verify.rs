//! HTTPS verification of open hosts.
//!
//! Proxmox VE ships with a self-signed certificate, so certificate checks are
//! disabled. Any HTTP response at all on the API path counts as a match,
//! including 401 and 5xx: unauthenticated or misconfigured nodes are still
//! nodes. Only transport failures (refused, reset, TLS, timeout) reject a host.

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::scanner::traits::ProtocolVerifier;
use crate::types::Instance;
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::net::Ipv4Addr;
use tracing::{debug, trace};

/// Verifier issuing one `GET https://<host>:<port><api_path>` per host.
#[derive(Debug, Clone)]
pub struct HttpsVerifier {
    client: Client,
    port: u16,
    api_path: String,
}

impl HttpsVerifier {
    /// Build a verifier from the port, path and timeout in `config`.
    pub fn new(config: &DiscoveryConfig) -> DiscoveryResult<Self> {
        let client = Client::builder()
            .timeout(config.verify_timeout)
            .danger_accept_invalid_certs(true)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| DiscoveryError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            port: config.port,
            api_path: config.api_path.clone(),
        })
    }

    /// Full probe URL for `host`.
    pub fn probe_url(&self, host: Ipv4Addr) -> String {
        format!("https://{}:{}{}", host, self.port, self.api_path)
    }
}

#[async_trait]
impl ProtocolVerifier for HttpsVerifier {
    async fn verify(&self, host: Ipv4Addr) -> Option<Instance> {
        let url = self.probe_url(host);

        match self.client.get(&url).send().await {
            Ok(response) => {
                debug!("{} answered {}", url, response.status());
                Some(Instance::new(host, self.port))
            }
            Err(e) => {
                trace!("{} did not answer: {}", url, e);
                None
            }
        }
    }
}
