//! Linux provider: `getifaddrs`, route-socket dumps and `resolv.conf`.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::ifaddrs::getifaddrs;
use nix::net::if_::InterfaceFlags;

use super::netlink::{LinkEntry, RouteSocket};
use crate::network::{LinkProperties, NetworkInfoProvider, ProviderError, RawInterface, RawRoute};

#[cfg(test)]
#[path = "linux_tests.rs"]
mod tests;

const RESOLV_CONF: &str = "etc/resolv.conf";

/// Linux implementation of [`NetworkInfoProvider`].
///
/// Interfaces come from `getifaddrs`. Link sets are built for every kernel
/// link from netlink dumps: MTU from the link attributes, routes from all
/// routing tables joined by output interface index. DNS servers from
/// `resolv.conf` are attached to the interfaces that carry a default route,
/// since Linux keeps one global resolver configuration.
#[derive(Debug, Clone)]
pub struct LinuxProvider {
    root: PathBuf,
}

impl Default for LinuxProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxProvider {
    /// Creates a provider reading the live system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root("/")
    }

    /// Creates a provider that reads `etc/resolv.conf` under `root`.
    /// Interfaces, links and routes always come from the live system.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn read_dns_servers(&self) -> Result<Vec<IpAddr>, ProviderError> {
        Ok(read_optional(&self.path(RESOLV_CONF))?
            .map(|content| parse_resolv_conf(&content))
            .unwrap_or_default())
    }
}

impl NetworkInfoProvider for LinuxProvider {
    fn list_interfaces(&self) -> Result<Vec<RawInterface>, ProviderError> {
        let addrs = getifaddrs().map_err(errno_error)?;

        let entries = addrs.map(|ifaddr| IfaddrEntry {
            is_up: ifaddr.flags.contains(InterfaceFlags::IFF_UP),
            is_loopback: ifaddr.flags.contains(InterfaceFlags::IFF_LOOPBACK),
            supports_multicast: ifaddr.flags.contains(InterfaceFlags::IFF_MULTICAST),
            address: ifaddr.address.as_ref().and_then(|storage| {
                storage
                    .as_sockaddr_in()
                    .map(|sin| IpAddr::V4(sin.ip()))
                    .or_else(|| storage.as_sockaddr_in6().map(|sin6| IpAddr::V6(sin6.ip())))
            }),
            name: ifaddr.interface_name,
        });

        Ok(group_interfaces(entries))
    }

    fn list_link_properties(&self) -> Result<Vec<LinkProperties>, ProviderError> {
        let socket = RouteSocket::open()?;
        let links = socket.links()?;
        let routes = socket.routes()?;
        tracing::debug!("Netlink reported {} link(s), {} route(s)", links.len(), routes.len());

        Ok(assemble_links(links, routes, &self.read_dns_servers()?))
    }
}

/// Joins routes to links by output interface index, keeping link order and
/// route order. Routes whose interface is not among `links` are dropped.
fn assemble_links(
    links: Vec<LinkEntry>,
    routes: Vec<(u32, RawRoute)>,
    dns_servers: &[IpAddr],
) -> Vec<LinkProperties> {
    let mut routes_by_index: HashMap<u32, Vec<RawRoute>> = HashMap::new();
    for (index, route) in routes {
        routes_by_index.entry(index).or_default().push(route);
    }

    links
        .into_iter()
        .map(|link| {
            let routes = routes_by_index.remove(&link.index).unwrap_or_default();
            let dns_servers = if routes.iter().any(|r| r.is_default) {
                dns_servers.to_vec()
            } else {
                Vec::new()
            };

            LinkProperties {
                interface_name: link.name,
                mtu: link.mtu,
                dns_servers,
                routes,
            }
        })
        .collect()
}

fn errno_error(errno: Errno) -> ProviderError {
    match errno {
        Errno::EACCES | Errno::EPERM => ProviderError::PermissionDenied {
            context: format!("getifaddrs: {errno}"),
        },
        other => ProviderError::Platform {
            message: format!("getifaddrs failed: {other}"),
        },
    }
}

/// Reads a file, treating a missing file as `None`.
fn read_optional(path: &Path) -> Result<Option<String>, ProviderError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ProviderError::from_io(path, e)),
    }
}

/// One `getifaddrs` record with the fields the provider needs.
#[derive(Debug, Clone)]
struct IfaddrEntry {
    name: String,
    is_up: bool,
    is_loopback: bool,
    supports_multicast: bool,
    address: Option<IpAddr>,
}

/// Merges per-address records into interfaces, keeping first-seen order.
///
/// Alias labels such as `eth0:1` are reported as separate virtual interfaces.
fn group_interfaces(entries: impl IntoIterator<Item = IfaddrEntry>) -> Vec<RawInterface> {
    let mut interfaces: Vec<RawInterface> = Vec::new();

    for entry in entries {
        let index = match interfaces.iter().position(|i| i.name == entry.name) {
            Some(index) => index,
            None => {
                interfaces.push(RawInterface {
                    display_name: entry.name.clone(),
                    is_virtual: entry.name.contains(':'),
                    name: entry.name,
                    is_up: entry.is_up,
                    is_loopback: entry.is_loopback,
                    supports_multicast: entry.supports_multicast,
                    addresses: Vec::new(),
                });
                interfaces.len() - 1
            }
        };

        if let Some(addr) = entry.address {
            let iface = &mut interfaces[index];
            if !iface.addresses.contains(&addr) {
                iface.addresses.push(addr);
            }
        }
    }

    interfaces
}

/// Extracts `nameserver` entries from `resolv.conf`, in file order.
///
/// Zone suffixes (`fe80::1%eth0`) are dropped.
fn parse_resolv_conf(content: &str) -> Vec<IpAddr> {
    content
        .lines()
        .map(|line| line.split(['#', ';']).next().unwrap_or_default())
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("nameserver"), Some(addr)) => addr.split('%').next()?.parse().ok(),
                _ => None,
            }
        })
        .collect()
}
