//! Adapter types: the raw provider view and the classified result.

use std::net::IpAddr;

use serde::Serialize;

use super::{RawRoute, Route};

/// An interface as listed by the network information provider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // link-layer flags are naturally boolean
pub struct RawInterface {
    /// OS interface name (e.g., `wlan0`); join key to [`LinkProperties`].
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    pub is_up: bool,
    pub is_loopback: bool,
    pub is_virtual: bool,
    pub supports_multicast: bool,
    /// Addresses bound to the interface, in provider order.
    pub addresses: Vec<IpAddr>,
}

impl RawInterface {
    /// Creates an interface that is up, not loopback, not virtual and
    /// multicast-capable, with `display_name` equal to `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, addresses: Vec<IpAddr>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            is_up: true,
            is_loopback: false,
            is_virtual: false,
            supports_multicast: true,
            addresses,
        }
    }
}

/// Link-level properties of one network, keyed by interface name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkProperties {
    /// Name of the interface these properties belong to.
    pub interface_name: String,
    pub mtu: u32,
    /// DNS servers in resolver order.
    pub dns_servers: Vec<IpAddr>,
    /// Routes in provider order.
    pub routes: Vec<RawRoute>,
}

impl LinkProperties {
    /// Creates an empty link-property set for `interface_name`.
    #[must_use]
    pub fn new(interface_name: impl Into<String>, mtu: u32) -> Self {
        Self {
            interface_name: interface_name.into(),
            mtu,
            dns_servers: Vec::new(),
            routes: Vec::new(),
        }
    }
}

/// A classified network adapter.
///
/// Built once per snapshot by [`Adapter::aggregate`] and never mutated.
/// When no link-property set matched, `mtu` is `None` and both `dns_servers`
/// and `routes` are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Adapter {
    name: String,
    display_name: String,
    is_up: bool,
    is_loopback: bool,
    is_virtual: bool,
    supports_multicast: bool,
    mtu: Option<u32>,
    ip_addresses: Vec<IpAddr>,
    dns_servers: Vec<IpAddr>,
    routes: Vec<Route>,
}

impl Adapter {
    /// Builds an adapter from a raw interface and its matching link set.
    ///
    /// Routes are classified in the order the provider listed them.
    #[must_use]
    pub fn aggregate(interface: RawInterface, link: Option<&LinkProperties>) -> Self {
        let (mtu, dns_servers, routes) = link.map_or_else(
            || (None, Vec::new(), Vec::new()),
            |link| {
                (
                    Some(link.mtu),
                    link.dns_servers.clone(),
                    link.routes.iter().map(Route::classify).collect(),
                )
            },
        );

        Self {
            name: interface.name,
            display_name: interface.display_name,
            is_up: interface.is_up,
            is_loopback: interface.is_loopback,
            is_virtual: interface.is_virtual,
            supports_multicast: interface.supports_multicast,
            mtu,
            ip_addresses: interface.addresses,
            dns_servers,
            routes,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn is_up(&self) -> bool {
        self.is_up
    }

    #[must_use]
    pub const fn is_loopback(&self) -> bool {
        self.is_loopback
    }

    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    #[must_use]
    pub const fn supports_multicast(&self) -> bool {
        self.supports_multicast
    }

    /// MTU from the matching link set, `None` when none matched.
    #[must_use]
    pub const fn mtu(&self) -> Option<u32> {
        self.mtu
    }

    #[must_use]
    pub fn ip_addresses(&self) -> &[IpAddr] {
        &self.ip_addresses
    }

    #[must_use]
    pub fn dns_servers(&self) -> &[IpAddr] {
        &self.dns_servers
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns true if the adapter carries a route flagged default.
    #[must_use]
    pub fn has_default_route(&self) -> bool {
        self.routes.iter().any(Route::is_default)
    }
}
