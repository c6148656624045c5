//! Canonical /24 subnet type with input normalization and host expansion.
//!
//! Accepts the loose shapes users tend to type:
//! - CIDR notation ("192.168.1.0/24", "10.0.0.0/16")
//! - Plain IPv4 addresses ("192.168.1.37")
//! - Partial addresses missing the host octet ("192.168.1")
//!
//! Every shape collapses to the /24 containing it. Prefixes other than /24
//! are accepted but narrowed to the /24 holding the network address.

use crate::error::{DiscoveryError, DiscoveryResult};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// Number of usable host addresses in a /24 (network and broadcast excluded).
pub const HOSTS_PER_SUBNET: usize = 254;

/// An IPv4 /24 network.
///
/// The host octet of the stored base address is always zero and the prefix
/// length is always 24, so `Display` always yields `a.b.c.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subnet(Ipv4Addr);

impl Subnet {
    /// Prefix length of every subnet the engine searches.
    pub const PREFIX: u8 = 24;

    /// Build the /24 from its three network octets.
    #[inline]
    pub const fn from_octets(a: u8, b: u8, c: u8) -> Self {
        Self(Ipv4Addr::new(a, b, c, 0))
    }

    /// The /24 that contains `ip`.
    #[inline]
    pub const fn containing(ip: Ipv4Addr) -> Self {
        let [a, b, c, _] = ip.octets();
        Self::from_octets(a, b, c)
    }

    /// The network address (`a.b.c.0`).
    #[inline]
    pub const fn network(self) -> Ipv4Addr {
        self.0
    }

    /// Whether `ip` falls inside this /24.
    pub fn contains(self, ip: Ipv4Addr) -> bool {
        Self::containing(ip) == self
    }

    /// Usable host addresses, `.1` through `.254` inclusive.
    pub fn hosts(self) -> impl Iterator<Item = Ipv4Addr> {
        let [a, b, c, _] = self.0.octets();
        (1..=254u8).map(move |d| Ipv4Addr::new(a, b, c, d))
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::PREFIX)
    }
}

impl FromStr for Subnet {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_subnet(s)
    }
}

impl TryFrom<String> for Subnet {
    type Error = DiscoveryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize_subnet(&value)
    }
}

impl From<Subnet> for String {
    fn from(subnet: Subnet) -> Self {
        subnet.to_string()
    }
}

/// Normalize user input into the canonical /24 that contains it.
///
/// Shapes are tried in order: CIDR, plain IPv4 address, then a partial
/// address with the host octet missing. A CIDR that parses but is not IPv4
/// fails with [`DiscoveryError::InvalidInput`]; anything else that matches
/// none of the shapes fails with [`DiscoveryError::Parse`].
pub fn normalize_subnet(input: &str) -> DiscoveryResult<Subnet> {
    let input = input.trim();

    if input.contains('/') {
        return match parse_cidr(input) {
            Some(IpNetwork::V4(net)) => Ok(Subnet::containing(net.network())),
            Some(IpNetwork::V6(_)) => Err(DiscoveryError::InvalidInput(input.to_string())),
            None => Err(DiscoveryError::Parse(input.to_string())),
        };
    }

    if let Ok(ip) = input.parse::<Ipv4Addr>() {
        return Ok(Subnet::containing(ip));
    }

    format!("{input}.0")
        .parse::<Ipv4Addr>()
        .map(Subnet::containing)
        .map_err(|_| DiscoveryError::Parse(input.to_string()))
}

/// Expand a CIDR string into the 254 usable host addresses of its /24.
///
/// Returns `None` when `cidr` is not IPv4 CIDR notation.
pub fn expand_subnet(cidr: &str) -> Option<Vec<Ipv4Addr>> {
    match parse_cidr(cidr.trim())? {
        IpNetwork::V4(net) => Some(Subnet::containing(net.network()).hosts().collect()),
        IpNetwork::V6(_) => None,
    }
}

/// Strict `address/prefix` parsing; both halves must be present.
fn parse_cidr(s: &str) -> Option<IpNetwork> {
    let (addr, prefix) = s.split_once('/')?;
    let addr: IpAddr = addr.parse().ok()?;
    let prefix: u8 = prefix.parse().ok()?;
    IpNetwork::new(addr, prefix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equivalent_shapes_normalize_alike() {
        let from_ip = normalize_subnet("172.20.20.5").unwrap();
        let from_cidr = normalize_subnet("172.20.20.0/24").unwrap();
        let from_partial = normalize_subnet("172.20.20").unwrap();

        assert_eq!(from_ip, from_cidr);
        assert_eq!(from_cidr, from_partial);
        assert_eq!(from_ip.to_string(), "172.20.20.0/24");
    }

    #[test]
    fn test_wider_prefix_is_narrowed() {
        assert_eq!(normalize_subnet("10.0.0.0/16").unwrap().to_string(), "10.0.0.0/24");
        // Host bits beyond the prefix are masked off before truncation.
        assert_eq!(normalize_subnet("10.0.5.7/16").unwrap().to_string(), "10.0.0.0/24");
        assert_eq!(normalize_subnet("10.9.8.7/28").unwrap().to_string(), "10.9.8.0/24");
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(normalize_subnet("  192.168.1.9 \n").unwrap().to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(normalize_subnet("not-an-ip"), Err(DiscoveryError::Parse(_))));
        assert!(matches!(normalize_subnet(""), Err(DiscoveryError::Parse(_))));
        assert!(matches!(normalize_subnet("172.20"), Err(DiscoveryError::Parse(_))));
        assert!(matches!(normalize_subnet("300.1.1.1"), Err(DiscoveryError::Parse(_))));
        assert!(matches!(normalize_subnet("10.0.0.0/33"), Err(DiscoveryError::Parse(_))));
    }

    #[test]
    fn test_rejects_ipv6() {
        assert!(matches!(normalize_subnet("::1"), Err(DiscoveryError::Parse(_))));
        assert!(matches!(normalize_subnet("fe80::1"), Err(DiscoveryError::Parse(_))));
        assert!(matches!(
            normalize_subnet("2001:db8::/64"),
            Err(DiscoveryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_error_carries_input() {
        match normalize_subnet("bogus") {
            Err(DiscoveryError::Parse(s)) => assert_eq!(s, "bogus"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_expand_yields_usable_hosts() {
        for cidr in ["192.168.1.0/24", "10.0.0.0/24", "172.16.254.0/24"] {
            let hosts = expand_subnet(cidr).unwrap();
            assert_eq!(hosts.len(), HOSTS_PER_SUBNET);

            let unique: HashSet<_> = hosts.iter().collect();
            assert_eq!(unique.len(), HOSTS_PER_SUBNET);

            assert!(hosts.iter().all(|ip| ip.octets()[3] != 0 && ip.octets()[3] != 255));
        }
    }

    #[test]
    fn test_expand_bounds() {
        let hosts = expand_subnet("192.168.1.0/24").unwrap();
        assert_eq!(hosts.first(), Some(&Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(hosts.last(), Some(&Ipv4Addr::new(192, 168, 1, 254)));
    }

    #[test]
    fn test_expand_malformed() {
        assert!(expand_subnet("nope").is_none());
        assert!(expand_subnet("192.168.1.0").is_none());
        assert!(expand_subnet("::/64").is_none());
    }

    #[test]
    fn test_subnet_helpers() {
        let subnet = Subnet::from_octets(192, 168, 7);
        assert_eq!(subnet.network(), Ipv4Addr::new(192, 168, 7, 0));
        assert!(subnet.contains(Ipv4Addr::new(192, 168, 7, 200)));
        assert!(!subnet.contains(Ipv4Addr::new(192, 168, 8, 1)));
        assert_eq!("192.168.7".parse::<Subnet>().unwrap(), subnet);
    }

    #[test]
    fn test_serde_as_string() {
        let subnet = Subnet::from_octets(10, 1, 2);
        let json = serde_json::to_string(&subnet).unwrap();
        assert_eq!(json, "\"10.1.2.0/24\"");

        let parsed: Subnet = serde_json::from_str("\"10.1.2.99\"").unwrap();
        assert_eq!(parsed, subnet);
        assert!(serde_json::from_str::<Subnet>("\"nope\"").is_err());
    }
}
