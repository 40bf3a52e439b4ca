//! Address scope classification.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

/// Scope flags of a single IP address.
///
/// Each flag is evaluated on its own; the classifier does not force the
/// flags to be mutually exclusive. An absent address yields all-`false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)] // one flag per scope predicate
pub struct AddressScope {
    /// Unspecified address (`0.0.0.0` or `::`).
    pub is_any_local: bool,
    /// RFC 1918 private range, or IPv6 unique-local / site-local.
    pub is_site_local: bool,
    /// `127.0.0.0/8` or `::1`.
    pub is_loopback: bool,
    /// `169.254.0.0/16` or `fe80::/10`.
    pub is_link_local: bool,
    /// `224.0.0.0/4` or `ff00::/8`.
    pub is_multicast: bool,
}

impl AddressScope {
    /// Classifies an optional address.
    #[must_use]
    pub fn classify(addr: Option<IpAddr>) -> Self {
        match addr {
            Some(IpAddr::V4(v4)) => Self::classify_v4(v4),
            Some(IpAddr::V6(v6)) => Self::classify_v6(v6),
            None => Self::default(),
        }
    }

    /// Classifies an IPv4 address.
    #[must_use]
    pub const fn classify_v4(addr: Ipv4Addr) -> Self {
        Self {
            is_any_local: addr.is_unspecified(),
            is_site_local: addr.is_private(),
            is_loopback: addr.is_loopback(),
            is_link_local: addr.is_link_local(),
            is_multicast: addr.is_multicast(),
        }
    }

    /// Classifies an IPv6 address.
    ///
    /// Site-local covers both the unique-local block (`fc00::/7`) and the
    /// deprecated site-local block (`fec0::/10`).
    #[must_use]
    pub const fn classify_v6(addr: Ipv6Addr) -> Self {
        let first = addr.segments()[0];
        Self {
            is_any_local: addr.is_unspecified(),
            is_site_local: addr.is_unique_local() || (first & 0xffc0) == 0xfec0,
            is_loopback: addr.is_loopback(),
            is_link_local: addr.is_unicast_link_local(),
            is_multicast: addr.is_multicast(),
        }
    }

    /// Returns true if no scope flag is set (a global unicast address).
    #[must_use]
    pub const fn is_global(&self) -> bool {
        !(self.is_any_local
            || self.is_site_local
            || self.is_loopback
            || self.is_link_local
            || self.is_multicast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(addr: &str) -> AddressScope {
        AddressScope::classify(Some(addr.parse().unwrap()))
    }

    #[test]
    fn absent_address_has_no_flags() {
        assert_eq!(AddressScope::classify(None), AddressScope::default());
    }

    #[test]
    fn unspecified_is_any_local() {
        assert!(scope("0.0.0.0").is_any_local);
        assert!(scope("::").is_any_local);
    }

    #[test]
    fn loopback_sets_only_loopback() {
        for addr in ["127.0.0.1", "127.8.9.10", "127.255.255.255", "::1"] {
            let s = scope(addr);
            assert_eq!(
                s,
                AddressScope {
                    is_loopback: true,
                    ..AddressScope::default()
                },
                "{addr}"
            );
        }
    }

    #[test]
    fn private_ranges_are_site_local() {
        for addr in ["10.1.2.3", "172.16.0.1", "172.31.255.254", "192.168.1.0"] {
            assert!(scope(addr).is_site_local, "{addr}");
        }
        assert!(!scope("172.32.0.1").is_site_local);
        assert!(!scope("8.8.8.8").is_site_local);
    }

    #[test]
    fn ipv6_unique_and_site_local() {
        assert!(scope("fd12:3456::1").is_site_local);
        assert!(scope("fec0::1").is_site_local);
        assert!(!scope("2001:db8::1").is_site_local);
    }

    #[test]
    fn link_local_ranges() {
        assert!(scope("169.254.10.1").is_link_local);
        assert!(scope("fe80::1").is_link_local);
        assert!(scope("febf::1").is_link_local);
        assert!(!scope("fec0::1").is_link_local);
    }

    #[test]
    fn multicast_ranges() {
        assert!(scope("224.0.0.1").is_multicast);
        assert!(scope("239.255.255.250").is_multicast);
        assert!(scope("ff02::1").is_multicast);
        assert!(!scope("240.0.0.1").is_multicast);
    }

    #[test]
    fn public_address_is_global() {
        assert!(scope("8.8.8.8").is_global());
        assert!(scope("2606:4700::1111").is_global());
        assert!(!scope("10.0.0.1").is_global());
    }
}
