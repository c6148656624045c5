//! Local interface enumeration.
//!
//! When no subnets are given, the scan covers the /24 of every IPv4 address
//! assigned to an interface that is up and is not loopback.

use crate::error::DiscoveryResult;
use crate::types::Subnet;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, trace};

/// Snapshot of one network interface, reduced to what discovery needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddrs {
    /// OS interface name.
    pub name: String,
    /// Whether the interface is administratively up.
    pub is_up: bool,
    /// Whether this is a loopback interface.
    pub is_loopback: bool,
    /// Assigned addresses, both families.
    pub addrs: Vec<IpAddr>,
}

impl InterfaceAddrs {
    fn qualifies(&self) -> bool {
        self.is_up && !self.is_loopback
    }

    fn ipv4_addrs(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.addrs.iter().filter_map(|addr| match addr {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        })
    }
}

#[cfg(not(unix))]
impl From<pnet::datalink::NetworkInterface> for InterfaceAddrs {
    fn from(iface: pnet::datalink::NetworkInterface) -> Self {
        Self {
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
            addrs: iface.ips.iter().map(|net| net.ip()).collect(),
            name: iface.name,
        }
    }
}

/// Fold one address entry into `interfaces`, grouping by interface name.
///
/// `getifaddrs` yields one entry per address (plus a link-level entry with
/// no IP), so the same name shows up several times.
#[cfg_attr(not(unix), allow(dead_code))]
fn record_address(
    interfaces: &mut Vec<InterfaceAddrs>,
    name: &str,
    is_up: bool,
    is_loopback: bool,
    addr: Option<IpAddr>,
) {
    let pos = match interfaces.iter().position(|iface| iface.name == name) {
        Some(pos) => pos,
        None => {
            interfaces.push(InterfaceAddrs {
                name: name.to_string(),
                is_up,
                is_loopback,
                addrs: Vec::new(),
            });
            interfaces.len() - 1
        }
    };

    let iface = &mut interfaces[pos];
    iface.is_up |= is_up;
    iface.is_loopback |= is_loopback;
    if let Some(addr) = addr {
        if !iface.addrs.contains(&addr) {
            iface.addrs.push(addr);
        }
    }
}

/// Source of the machine's interface list.
///
/// Implemented by [`SystemInterfaces`] for the real host; tests substitute
/// a fixed list.
pub trait InterfaceSource: Send + Sync {
    /// List every interface, regardless of state.
    fn interfaces(&self) -> DiscoveryResult<Vec<InterfaceAddrs>>;
}

/// Interfaces reported by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

#[cfg(unix)]
impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> DiscoveryResult<Vec<InterfaceAddrs>> {
        sys::interfaces()
    }
}

#[cfg(not(unix))]
impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> DiscoveryResult<Vec<InterfaceAddrs>> {
        Ok(pnet::datalink::interfaces()
            .into_iter()
            .map(InterfaceAddrs::from)
            .collect())
    }
}

#[cfg(unix)]
mod sys {
    use super::{record_address, InterfaceAddrs};
    use crate::error::{DiscoveryError, DiscoveryResult};
    use std::ffi::CStr;
    use std::io;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    /// Walk the `getifaddrs` list. A failed call is reported, never
    /// flattened into an empty list.
    pub(super) fn interfaces() -> DiscoveryResult<Vec<InterfaceAddrs>> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();

        // SAFETY: on success `head` owns a list released by `freeifaddrs` below.
        if unsafe { libc::getifaddrs(&mut head) } != 0 {
            return Err(enumeration_error(io::Error::last_os_error()));
        }

        let mut interfaces = Vec::new();
        let mut cursor = head;
        while !cursor.is_null() {
            // SAFETY: `cursor` is a node of the live list returned above.
            let entry = unsafe { &*cursor };
            cursor = entry.ifa_next;

            if entry.ifa_name.is_null() {
                continue;
            }
            // SAFETY: non-null `ifa_name` is a NUL-terminated string owned by the list.
            let name = unsafe { CStr::from_ptr(entry.ifa_name) }.to_string_lossy();
            let flags = entry.ifa_flags as libc::c_int;
            // SAFETY: `ifa_addr` is null or points at a sockaddr owned by the list.
            let addr = unsafe { ip_of(entry.ifa_addr) };

            record_address(
                &mut interfaces,
                &name,
                flags & libc::IFF_UP != 0,
                flags & libc::IFF_LOOPBACK != 0,
                addr,
            );
        }

        // SAFETY: `head` came from a successful `getifaddrs` and is freed once.
        unsafe { libc::freeifaddrs(head) };

        Ok(interfaces)
    }

    pub(super) fn enumeration_error(err: io::Error) -> DiscoveryError {
        DiscoveryError::Enumeration(format!("getifaddrs: {}", err))
    }

    unsafe fn ip_of(addr: *const libc::sockaddr) -> Option<IpAddr> {
        if addr.is_null() {
            return None;
        }

        match (*addr).sa_family as libc::c_int {
            libc::AF_INET => {
                let sin = &*(addr as *const libc::sockaddr_in);
                Some(IpAddr::V4(Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr))))
            }
            libc::AF_INET6 => {
                let sin6 = &*(addr as *const libc::sockaddr_in6);
                Some(IpAddr::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr)))
            }
            _ => None,
        }
    }
}

/// Candidate /24 subnets derived from this machine's interfaces.
pub fn local_subnets() -> DiscoveryResult<Vec<Subnet>> {
    local_subnets_from(&SystemInterfaces)
}

/// Candidate /24 subnets derived from `source`.
///
/// Deduplicated, in first-seen order. An empty list is not an error.
pub fn local_subnets_from(source: &dyn InterfaceSource) -> DiscoveryResult<Vec<Subnet>> {
    let interfaces = source.interfaces()?;
    debug!("Inspecting {} network interfaces", interfaces.len());

    let mut subnets: Vec<Subnet> = Vec::new();
    for iface in &interfaces {
        if !iface.qualifies() {
            trace!(
                "Skipping interface {} (up: {}, loopback: {})",
                iface.name,
                iface.is_up,
                iface.is_loopback
            );
            continue;
        }

        for ip in iface.ipv4_addrs() {
            if subnets.iter().any(|known| known.contains(ip)) {
                continue;
            }
            let subnet = Subnet::containing(ip);
            debug!("Interface {} ({}) contributes {}", iface.name, ip, subnet);
            subnets.push(subnet);
        }
    }

    Ok(subnets)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DiscoveryError;
    use std::net::Ipv6Addr;

    /// Fixed interface list for tests.
    pub(crate) struct StaticInterfaces(pub Vec<InterfaceAddrs>);

    impl InterfaceSource for StaticInterfaces {
        fn interfaces(&self) -> DiscoveryResult<Vec<InterfaceAddrs>> {
            Ok(self.0.clone())
        }
    }

    /// Interface source whose enumeration always fails.
    pub(crate) struct BrokenInterfaces;

    impl InterfaceSource for BrokenInterfaces {
        fn interfaces(&self) -> DiscoveryResult<Vec<InterfaceAddrs>> {
            Err(DiscoveryError::Enumeration("getifaddrs: permission denied".into()))
        }
    }

    pub(crate) fn iface(name: &str, is_up: bool, is_loopback: bool, addrs: &[IpAddr]) -> InterfaceAddrs {
        InterfaceAddrs {
            name: name.to_string(),
            is_up,
            is_loopback,
            addrs: addrs.to_vec(),
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    #[test]
    fn test_filters_down_and_loopback() {
        let source = StaticInterfaces(vec![
            iface("lo", true, true, &[v4(127, 0, 0, 1)]),
            iface("eth0", true, false, &[v4(192, 168, 1, 37)]),
            iface("eth1", false, false, &[v4(10, 0, 0, 5)]),
        ]);

        let subnets = local_subnets_from(&source).unwrap();
        assert_eq!(subnets, vec![Subnet::from_octets(192, 168, 1)]);
    }

    #[test]
    fn test_ignores_ipv6_and_dedupes_in_order() {
        let source = StaticInterfaces(vec![
            iface(
                "wlan0",
                true,
                false,
                &[IpAddr::V6(Ipv6Addr::LOCALHOST), v4(172, 20, 20, 5), v4(10, 1, 2, 3)],
            ),
            iface("br0", true, false, &[v4(172, 20, 20, 9)]),
            iface("eth0", true, false, &[v4(192, 168, 50, 2)]),
        ]);

        let subnets: Vec<String> = local_subnets_from(&source)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(subnets, vec!["172.20.20.0/24", "10.1.2.0/24", "192.168.50.0/24"]);
    }

    #[test]
    fn test_no_qualifying_interfaces_is_empty() {
        let source = StaticInterfaces(vec![iface("lo", true, true, &[v4(127, 0, 0, 1)])]);
        assert!(local_subnets_from(&source).unwrap().is_empty());
    }

    #[test]
    fn test_enumeration_failure_propagates() {
        assert!(matches!(
            local_subnets_from(&BrokenInterfaces),
            Err(DiscoveryError::Enumeration(_))
        ));
    }

    #[test]
    fn test_system_interfaces_do_not_error() {
        // Whatever the host has, every result must be a canonical /24.
        let subnets = local_subnets().unwrap();
        assert!(subnets.iter().all(|s| s.network().octets()[3] == 0));
    }

    #[test]
    fn test_record_address_groups_entries_by_name() {
        let mut interfaces = Vec::new();
        record_address(&mut interfaces, "eth0", true, false, None);
        record_address(&mut interfaces, "eth0", true, false, Some(v4(192, 168, 1, 37)));
        record_address(&mut interfaces, "lo", true, true, Some(v4(127, 0, 0, 1)));
        record_address(&mut interfaces, "eth0", true, false, Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        record_address(&mut interfaces, "eth0", true, false, Some(v4(192, 168, 1, 37)));

        assert_eq!(
            interfaces,
            vec![
                iface(
                    "eth0",
                    true,
                    false,
                    &[v4(192, 168, 1, 37), IpAddr::V6(Ipv6Addr::LOCALHOST)]
                ),
                iface("lo", true, true, &[v4(127, 0, 0, 1)]),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_os_failure_maps_to_enumeration_error() {
        let err = sys::enumeration_error(std::io::Error::from_raw_os_error(libc::EMFILE));
        match err {
            DiscoveryError::Enumeration(msg) => assert!(msg.starts_with("getifaddrs: ")),
            other => panic!("expected Enumeration, got {:?}", other),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_system_interfaces_include_loopback() {
        let interfaces = SystemInterfaces.interfaces().unwrap();
        let lo = interfaces.iter().find(|iface| iface.name == "lo").unwrap();
        assert!(lo.is_loopback);
        assert!(!lo.qualifies());
    }
}
