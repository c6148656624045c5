//! Scanner module - coordinates the discovery pipeline.
//!
//! Subnets are expanded into candidate hosts, every candidate is TCP-probed
//! on the API port behind a fixed-size admission gate, and hosts with an open
//! port are confirmed over HTTPS. The probe phase finishes completely before
//! verification starts.

pub mod tcp;
pub mod traits;
pub mod verify;

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::interfaces::{local_subnets_from, InterfaceSource, SystemInterfaces};
use crate::types::{normalize_subnet, Instance, Subnet};
use futures::future;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use tcp::TcpConnectProbe;
pub use traits::{PortProbe, ProtocolVerifier};
pub use verify::HttpsVerifier;

/// Outcome of a discovery scan.
///
/// An empty `instances` list is a normal result, not a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResults {
    /// Verified Proxmox VE endpoints, ordered by address.
    pub instances: Vec<Instance>,
    /// Subnets that were searched.
    pub subnets: Vec<Subnet>,
    /// Number of candidate hosts dialed.
    pub hosts_probed: usize,
    /// Number of hosts that accepted a TCP connection.
    pub open_hosts: usize,
    /// Total scan duration in milliseconds.
    pub duration_ms: u64,
}

/// Discovery scan coordinator.
///
/// Holds the configuration and the pluggable probe stages. The scanner keeps
/// no state between scans.
pub struct Scanner {
    config: DiscoveryConfig,
    probe: Arc<dyn PortProbe>,
    verifier: Arc<dyn ProtocolVerifier>,
    interfaces: Arc<dyn InterfaceSource>,
    progress: Option<ProgressBar>,
    cancel: CancellationToken,
}

impl Scanner {
    /// Create a scanner using TCP connect probing and HTTPS verification.
    pub fn new(config: DiscoveryConfig) -> DiscoveryResult<Self> {
        config.validate()?;

        let probe = TcpConnectProbe::new(config.probe_timeout);
        let verifier = HttpsVerifier::new(&config)?;

        Ok(Self {
            config,
            probe: Arc::new(probe),
            verifier: Arc::new(verifier),
            interfaces: Arc::new(SystemInterfaces),
            progress: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the TCP probe stage.
    pub fn with_probe(mut self, probe: impl PortProbe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    /// Replace the HTTP verification stage.
    pub fn with_verifier(mut self, verifier: impl ProtocolVerifier + 'static) -> Self {
        self.verifier = Arc::new(verifier);
        self
    }

    /// Replace the interface list used when no subnets are given.
    pub fn with_interfaces(mut self, interfaces: impl InterfaceSource + 'static) -> Self {
        self.interfaces = Arc::new(interfaces);
        self
    }

    /// Tick `progress` once per probed host.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Abort the scan when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Scan the given subnet hints, or the local subnets when none are given.
    ///
    /// Hints are normalized to /24s; a malformed hint aborts the scan before
    /// any traffic is sent.
    pub async fn scan<S: AsRef<str>>(&self, hints: &[S]) -> DiscoveryResult<ScanResults> {
        let subnets = self.resolve_subnets(hints)?;
        self.scan_subnets(&subnets).await
    }

    /// Turn hints into a deduplicated list of subnets to search.
    pub fn resolve_subnets<S: AsRef<str>>(&self, hints: &[S]) -> DiscoveryResult<Vec<Subnet>> {
        if hints.is_empty() {
            let subnets = local_subnets_from(self.interfaces.as_ref())?;
            if subnets.is_empty() {
                info!("No usable IPv4 interfaces found; nothing to scan");
            }
            return Ok(subnets);
        }

        let mut subnets = Vec::with_capacity(hints.len());
        for hint in hints {
            let subnet = normalize_subnet(hint.as_ref())?;
            if !subnets.contains(&subnet) {
                subnets.push(subnet);
            }
        }
        Ok(subnets)
    }

    /// Scan already-resolved subnets.
    pub async fn scan_subnets(&self, subnets: &[Subnet]) -> DiscoveryResult<ScanResults> {
        if subnets.is_empty() {
            return Ok(ScanResults::default());
        }

        let start_time = Instant::now();

        let hosts: Vec<Ipv4Addr> = subnets.iter().flat_map(|s| s.hosts()).collect();
        let hosts_probed = hosts.len();
        debug!(
            "Probing {} hosts across {} subnet(s) on port {}",
            hosts_probed,
            subnets.len(),
            self.config.port
        );

        if let Some(ref pb) = self.progress {
            pb.set_length(hosts_probed as u64);
        }

        let open_hosts = probe_open_hosts(
            hosts,
            self.config.port,
            self.config.workers,
            Arc::clone(&self.probe),
            self.progress.as_ref(),
            &self.cancel,
        )
        .await?;
        debug!("{} host(s) with port {} open", open_hosts.len(), self.config.port);

        let instances = self.verify_hosts(&open_hosts).await?;

        if let Some(ref pb) = self.progress {
            pb.finish_with_message("Scan complete");
        }

        let duration = start_time.elapsed();
        info!(
            "Found {} instance(s) on {} in {:.2}s",
            instances.len(),
            subnets
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            duration.as_secs_f64()
        );

        Ok(ScanResults {
            instances,
            subnets: subnets.to_vec(),
            hosts_probed,
            open_hosts: open_hosts.len(),
            duration_ms: duration.as_millis() as u64,
        })
    }

    /// Verify open hosts with bounded parallelism.
    async fn verify_hosts(&self, open_hosts: &[Ipv4Addr]) -> DiscoveryResult<Vec<Instance>> {
        let mut instances: Vec<Instance> = stream::iter(open_hosts.iter().copied())
            .map(|host| {
                let verifier = Arc::clone(&self.verifier);
                let cancel = self.cancel.clone();
                async move {
                    tokio::select! {
                        _ = cancel.cancelled() => None,
                        found = verifier.verify(host) => found,
                    }
                }
            })
            .buffer_unordered(self.config.verify_concurrency)
            .filter_map(future::ready)
            .collect()
            .await;

        if self.cancel.is_cancelled() {
            info!("Scan cancelled during verification");
            return Err(DiscoveryError::Cancelled);
        }

        instances.sort_by_key(|i| i.ip);
        Ok(instances)
    }
}

/// Scan the given hints with the default configuration.
///
/// With no hints, the /24 of every local up, non-loopback IPv4 interface is
/// searched.
pub async fn scan<S: AsRef<str>>(hints: &[S]) -> DiscoveryResult<ScanResults> {
    Scanner::new(DiscoveryConfig::default())?.scan(hints).await
}

/// TCP-probe every host on `port` with at most `workers` dials in flight.
///
/// Returns only once every host has been attempted. Open hosts are returned
/// sorted by address.
pub async fn probe_open_hosts(
    hosts: Vec<Ipv4Addr>,
    port: u16,
    workers: usize,
    probe: Arc<dyn PortProbe>,
    progress: Option<&ProgressBar>,
    cancel: &CancellationToken,
) -> DiscoveryResult<Vec<Ipv4Addr>> {
    // Create semaphore for bounded concurrency
    let semaphore = Arc::new(Semaphore::new(workers));
    let buffered = hosts.len().max(1);

    let mut open: Vec<Ipv4Addr> = stream::iter(hosts)
        .map(|host| {
            let sem = Arc::clone(&semaphore);
            let probe = Arc::clone(&probe);
            let progress = progress.cloned();
            let cancel = cancel.clone();

            async move {
                let permit = tokio::select! {
                    _ = cancel.cancelled() => None,
                    permit = sem.acquire() => permit.ok(),
                };
                let _permit = permit?;

                let addr = SocketAddr::from((host, port));
                let is_open = tokio::select! {
                    _ = cancel.cancelled() => None,
                    open = probe.is_open(addr) => Some(open),
                }?;

                if let Some(ref pb) = progress {
                    pb.inc(1);
                    if is_open {
                        pb.set_message(format!("Found open host: {}", host));
                    }
                }

                is_open.then_some(host)
            }
        })
        // Every host is in flight at once; the semaphore is the real limit.
        .buffer_unordered(buffered)
        .filter_map(future::ready)
        .collect()
        .await;

    if cancel.is_cancelled() {
        info!("Scan cancelled during port probing");
        return Err(DiscoveryError::Cancelled);
    }

    open.sort_unstable();
    Ok(open)
}
