//! Route classification.
//!
//! A [`RawRoute`] is what the operating system hands over: an optional
//! destination prefix, an optional gateway and the provider's default-route
//! flag. [`Route::classify`] derives everything else from those three inputs.

use std::net::IpAddr;

use ipnet::IpNet;
use serde::Serialize;

use super::AddressScope;

/// Host-route prefix length for IPv4.
const IPV4_HOST_PREFIX: u8 = 32;

/// Host-route prefix length for IPv6.
const IPV6_HOST_PREFIX: u8 = 128;

/// A route entry as reported by the network information provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRoute {
    /// Destination prefix, if the provider reported one.
    pub destination: Option<IpNet>,
    /// Next-hop gateway, `None` for on-link routes.
    pub gateway: Option<IpAddr>,
    /// Whether the provider flagged this as the default route.
    pub is_default: bool,
}

impl RawRoute {
    /// Creates a raw route.
    #[must_use]
    pub const fn new(destination: Option<IpNet>, gateway: Option<IpAddr>, is_default: bool) -> Self {
        Self {
            destination,
            gateway,
            is_default,
        }
    }

    /// On-link route to `destination` (no gateway, not default).
    #[must_use]
    pub const fn on_link(destination: IpNet) -> Self {
        Self::new(Some(destination), None, false)
    }

    /// Default route through `gateway`.
    ///
    /// The destination is left as given; providers that report the default
    /// route without a prefix pass `None`.
    #[must_use]
    pub const fn default_via(destination: Option<IpNet>, gateway: IpAddr) -> Self {
        Self::new(destination, Some(gateway), true)
    }
}

/// A fully classified route.
///
/// `destination`, `address` and `prefix` are either all present or all
/// absent. `has_gateway` is always the negation of `is_direct`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Route {
    destination: Option<IpNet>,
    address: Option<IpAddr>,
    prefix: Option<u8>,
    #[serde(rename = "isIPv6")]
    is_ipv6: bool,
    gateway: Option<IpAddr>,
    has_gateway: bool,
    is_default: bool,
    is_host_route: bool,
    is_network_route: bool,
    is_direct: bool,
    #[serde(flatten)]
    scope: AddressScope,
}

impl Route {
    /// Classifies a raw route.
    ///
    /// The destination is normalized to its network (host bits cleared).
    /// Scope flags come from the destination network address, never from the
    /// gateway. A route without destination is never a host route, so it is
    /// a network route unless the provider flagged it as default.
    #[must_use]
    pub fn classify(raw: &RawRoute) -> Self {
        let destination = raw.destination.map(|net| net.trunc());
        let address = destination.map(|net| net.network());
        let prefix = destination.map(|net| net.prefix_len());
        let is_ipv6 = matches!(destination, Some(IpNet::V6(_)));

        let is_host_route = match prefix {
            Some(len) if is_ipv6 => len == IPV6_HOST_PREFIX,
            Some(len) => len == IPV4_HOST_PREFIX,
            None => false,
        };

        let has_gateway = raw.gateway.is_some();

        Self {
            destination,
            address,
            prefix,
            is_ipv6,
            gateway: raw.gateway,
            has_gateway,
            is_default: raw.is_default,
            is_host_route,
            is_network_route: !is_host_route && !raw.is_default,
            is_direct: !has_gateway,
            scope: AddressScope::classify(address),
        }
    }

    /// Destination prefix (normalized to its network).
    #[must_use]
    pub const fn destination(&self) -> Option<IpNet> {
        self.destination
    }

    /// Network address portion of the destination.
    #[must_use]
    pub const fn address(&self) -> Option<IpAddr> {
        self.address
    }

    /// Prefix length of the destination.
    #[must_use]
    pub const fn prefix(&self) -> Option<u8> {
        self.prefix
    }

    #[must_use]
    pub const fn is_ipv6(&self) -> bool {
        self.is_ipv6
    }

    #[must_use]
    pub const fn gateway(&self) -> Option<IpAddr> {
        self.gateway
    }

    #[must_use]
    pub const fn has_gateway(&self) -> bool {
        self.has_gateway
    }

    /// Whether the provider flagged this route as default.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// True for `/32` (IPv4) and `/128` (IPv6) destinations.
    #[must_use]
    pub const fn is_host_route(&self) -> bool {
        self.is_host_route
    }

    /// True when neither a host route nor the default route.
    #[must_use]
    pub const fn is_network_route(&self) -> bool {
        self.is_network_route
    }

    /// True for on-link routes (no gateway).
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.is_direct
    }

    /// Scope flags of the destination network address.
    #[must_use]
    pub const fn scope(&self) -> AddressScope {
        self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> IpNet {
        s.parse().unwrap()
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    mod destination {
        use super::*;

        #[test]
        fn absent_destination_has_no_prefix() {
            let route = Route::classify(&RawRoute::new(None, None, false));

            assert_eq!(route.destination(), None);
            assert_eq!(route.address(), None);
            assert_eq!(route.prefix(), None);
            assert!(!route.is_ipv6());
            assert_eq!(route.scope(), AddressScope::default());
        }

        #[test]
        fn absent_destination_is_network_route_unless_default() {
            let plain = Route::classify(&RawRoute::new(None, None, false));
            assert!(!plain.is_host_route());
            assert!(plain.is_network_route());

            let default = Route::classify(&RawRoute::new(None, Some(ip("10.0.0.1")), true));
            assert!(!default.is_host_route());
            assert!(!default.is_network_route());
        }

        #[test]
        fn destination_is_truncated_to_network() {
            let route = Route::classify(&RawRoute::on_link(net("192.168.1.77/24")));

            assert_eq!(route.destination(), Some(net("192.168.1.0/24")));
            assert_eq!(route.address(), Some(ip("192.168.1.0")));
            assert_eq!(route.prefix(), Some(24));
        }

        #[test]
        fn family_follows_destination() {
            let v6 = Route::classify(&RawRoute::on_link(net("fe80::/64")));
            assert!(v6.is_ipv6());

            let v4 = Route::classify(&RawRoute::new(Some(net("10.0.0.0/8")), Some(ip("fe80::1")), false));
            assert!(!v4.is_ipv6());
        }
    }

    mod category {
        use super::*;

        #[test]
        fn full_length_prefixes_are_host_routes() {
            for (dest, default) in [
                ("10.0.0.5/32", false),
                ("10.0.0.5/32", true),
                ("2001:db8::5/128", false),
                ("2001:db8::5/128", true),
            ] {
                let route = Route::classify(&RawRoute::new(Some(net(dest)), None, default));
                assert!(route.is_host_route(), "{dest}");
                assert!(!route.is_network_route(), "{dest}");
            }
        }

        #[test]
        fn ipv6_slash_32_is_not_host_route() {
            let route = Route::classify(&RawRoute::on_link(net("2001:db8::/32")));
            assert!(!route.is_host_route());
            assert!(route.is_network_route());
        }

        #[test]
        fn default_route_is_never_network_route() {
            for dest in [None, Some(net("0.0.0.0/0")), Some(net("::/0")), Some(net("1.2.3.4/32"))] {
                let route = Route::classify(&RawRoute::new(dest, Some(ip("192.168.1.1")), true));
                assert!(route.is_default());
                assert!(!route.is_network_route());
            }
        }

        #[test]
        fn default_flag_is_not_recomputed() {
            let route = Route::classify(&RawRoute::new(Some(net("0.0.0.0/0")), Some(ip("10.0.0.1")), false));
            assert!(!route.is_default());
            assert!(route.is_network_route());
        }

        #[test]
        fn host_route_with_gateway() {
            let route = Route::classify(&RawRoute::new(Some(net("10.0.0.5/32")), Some(ip("10.0.0.1")), false));

            assert!(route.is_host_route());
            assert!(!route.is_direct());
            assert!(!route.is_network_route());
        }
    }

    mod gateway {
        use super::*;

        #[test]
        fn has_gateway_is_inverse_of_direct() {
            for gw in [None, Some(ip("192.168.1.1")), Some(ip("fe80::1"))] {
                for dest in [None, Some(net("192.168.1.0/24"))] {
                    let route = Route::classify(&RawRoute::new(dest, gw, false));
                    assert_eq!(route.has_gateway(), !route.is_direct());
                    assert_eq!(route.gateway(), gw);
                }
            }
        }
    }

    mod scope {
        use super::*;

        #[test]
        fn scope_comes_from_destination_not_gateway() {
            let route = Route::classify(&RawRoute::new(
                Some(net("8.8.8.0/24")),
                Some(ip("192.168.1.1")),
                false,
            ));
            assert!(!route.scope().is_site_local);
            assert!(route.scope().is_global());
        }

        #[test]
        fn private_destination_is_site_local() {
            let route = Route::classify(&RawRoute::on_link(net("192.168.1.0/24")));
            assert!(route.scope().is_site_local);
        }

        #[test]
        fn default_destination_is_any_local() {
            let route = Route::classify(&RawRoute::default_via(Some(net("0.0.0.0/0")), ip("10.0.0.1")));
            assert!(route.scope().is_any_local);
        }
    }

    #[test]
    fn serializes_with_camel_case_flags() {
        let route = Route::classify(&RawRoute::on_link(net("192.168.1.0/24")));
        let json = serde_json::to_value(&route).unwrap();

        assert_eq!(json["destination"], "192.168.1.0/24");
        assert_eq!(json["address"], "192.168.1.0");
        assert_eq!(json["prefix"], 24);
        assert_eq!(json["isIPv6"], false);
        assert_eq!(json["gateway"], serde_json::Value::Null);
        assert_eq!(json["isDirect"], true);
        assert_eq!(json["isSiteLocal"], true);
    }
}
