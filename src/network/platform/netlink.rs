//! Route-socket dumps for the Linux provider.
//!
//! Links and routes are read with `RTM_GETLINK` / `RTM_GETROUTE` dump
//! requests. A route dump with an unspecified table returns every routing
//! table, so policy tables used by VPNs and per-network routing are included.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::IpNet;
use netlink_packet_route::link::nlas::Nla as LinkNla;
use netlink_packet_route::route::nlas::Nla as RouteNla;
use netlink_packet_route::{
    AF_INET, AF_INET6, LinkMessage, NLM_F_DUMP, NLM_F_REQUEST, NetlinkHeader, NetlinkMessage,
    NetlinkPayload, RTN_UNICAST, RouteMessage, RtnlMessage,
};
use netlink_sys::constants::NETLINK_ROUTE;
use netlink_sys::{Socket, SocketAddr};

use crate::network::{ProviderError, RawRoute};

#[cfg(test)]
#[path = "netlink_tests.rs"]
mod tests;

const RECEIVE_BUFFER_LEN: usize = 64 * 1024;

/// Name and MTU of one kernel link, keyed by its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LinkEntry {
    pub index: u32,
    pub name: String,
    pub mtu: u32,
}

/// A bound `NETLINK_ROUTE` socket.
pub(super) struct RouteSocket {
    socket: Socket,
}

impl RouteSocket {
    pub fn open() -> Result<Self, ProviderError> {
        let mut socket = Socket::new(NETLINK_ROUTE)
            .map_err(|e| ProviderError::from_netlink("socket", e))?;
        socket
            .bind_auto()
            .map_err(|e| ProviderError::from_netlink("bind", e))?;
        socket
            .connect(&SocketAddr::new(0, 0))
            .map_err(|e| ProviderError::from_netlink("connect", e))?;
        Ok(Self { socket })
    }

    /// Dumps every link, in kernel order.
    pub fn links(&self) -> Result<Vec<LinkEntry>, ProviderError> {
        let replies = self.dump("link dump", RtnlMessage::GetLink(LinkMessage::default()))?;

        Ok(replies
            .iter()
            .filter_map(|reply| match reply {
                RtnlMessage::NewLink(link) => {
                    let entry = link_entry(link);
                    if entry.is_none() {
                        tracing::debug!("Skipping link {} without name or MTU", link.header.index);
                    }
                    entry
                }
                _ => None,
            })
            .collect())
    }

    /// Dumps the routes of all tables for both address families, IPv4 first.
    ///
    /// Each route is paired with its output interface index.
    pub fn routes(&self) -> Result<Vec<(u32, RawRoute)>, ProviderError> {
        let mut routes = Vec::new();
        for family in [AF_INET, AF_INET6] {
            let mut request = RouteMessage::default();
            request.header.address_family = family as u8;

            for reply in self.dump("route dump", RtnlMessage::GetRoute(request))? {
                if let RtnlMessage::NewRoute(message) = reply {
                    match raw_route(&message) {
                        Some(route) => routes.push(route),
                        None => tracing::debug!("Skipping route {:?}", message.header),
                    }
                }
            }
        }
        Ok(routes)
    }

    fn dump(
        &self,
        operation: &'static str,
        message: RtnlMessage,
    ) -> Result<Vec<RtnlMessage>, ProviderError> {
        let mut request = NetlinkMessage {
            header: NetlinkHeader {
                flags: NLM_F_REQUEST | NLM_F_DUMP,
                ..Default::default()
            },
            payload: NetlinkPayload::from(message),
        };
        request.finalize();

        let mut buf = vec![0; request.header.length as usize];
        request.serialize(&mut buf[..]);
        self.socket
            .send(&buf[..], 0)
            .map_err(|e| ProviderError::from_netlink(operation, e))?;

        let mut replies = Vec::new();
        let mut receive_buffer = vec![0; RECEIVE_BUFFER_LEN];

        loop {
            let size = self
                .socket
                .recv(&mut &mut receive_buffer[..], 0)
                .map_err(|e| ProviderError::from_netlink(operation, e))?;

            let mut offset = 0;
            while offset < size {
                let reply: NetlinkMessage<RtnlMessage> =
                    NetlinkMessage::deserialize(&receive_buffer[offset..size]).map_err(|e| {
                        ProviderError::Platform {
                            message: format!("Malformed netlink {operation} reply: {e}"),
                        }
                    })?;
                let length = reply.header.length as usize;

                match reply.payload {
                    NetlinkPayload::Done => return Ok(replies),
                    NetlinkPayload::Error(err) if err.code != 0 => {
                        return Err(ProviderError::from_netlink(
                            operation,
                            io::Error::from_raw_os_error(-err.code),
                        ));
                    }
                    NetlinkPayload::InnerMessage(inner) => replies.push(inner),
                    _ => {}
                }

                if length == 0 {
                    break;
                }
                offset += length;
            }
        }
    }
}

/// Extracts index, name and MTU from a link message.
pub(super) fn link_entry(message: &LinkMessage) -> Option<LinkEntry> {
    let mut name = None;
    let mut mtu = None;

    for nla in &message.nlas {
        match nla {
            LinkNla::IfName(ifname) => name = Some(ifname.clone()),
            LinkNla::Mtu(value) => mtu = Some(*value),
            _ => {}
        }
    }

    Some(LinkEntry {
        index: message.header.index,
        name: name?,
        mtu: mtu?,
    })
}

/// Maps a route message to its output interface and a [`RawRoute`].
///
/// Only unicast routes are kept: local, broadcast, multicast, unreachable,
/// blackhole and prohibit entries are dropped. Routes without a single
/// output interface (multipath) are dropped as well. A missing destination
/// attribute means the all-zero address of the family.
pub(super) fn raw_route(message: &RouteMessage) -> Option<(u32, RawRoute)> {
    let header = &message.header;
    if header.kind != RTN_UNICAST {
        return None;
    }

    let mut destination = None;
    let mut gateway = None;
    let mut oif = None;

    for nla in &message.nlas {
        match nla {
            RouteNla::Destination(bytes) => destination = ip_from_bytes(bytes),
            RouteNla::Gateway(bytes) => gateway = ip_from_bytes(bytes),
            RouteNla::Oif(index) => oif = Some(*index),
            _ => {}
        }
    }

    let prefix = header.destination_prefix_length;
    let address = match destination {
        Some(address) => address,
        None => unspecified(header.address_family)?,
    };
    let network = IpNet::new(address, prefix).ok()?;
    let gateway = gateway.filter(|gw| !gw.is_unspecified());

    Some((oif?, RawRoute::new(Some(network), gateway, prefix == 0)))
}

fn unspecified(family: u8) -> Option<IpAddr> {
    if family == AF_INET as u8 {
        Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    } else if family == AF_INET6 as u8 {
        Some(IpAddr::V6(Ipv6Addr::UNSPECIFIED))
    } else {
        None
    }
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(IpAddr::from),
        16 => <[u8; 16]>::try_from(bytes).ok().map(IpAddr::from),
        _ => None,
    }
}
