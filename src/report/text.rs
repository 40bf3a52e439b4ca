//! Human-readable diagnostic report.

use std::fmt::Display;
use std::io::{self, Write};

use super::{SinkError, SnapshotSink};
use crate::network::{Adapter, Route, Topology};

const SEPARATOR: &str = "=====================================";

/// Writes a diagnostic dump of every adapter and route.
///
/// Absent values are printed as `none`, an absent prefix as `-1`. MTU, DNS
/// and route sections appear only for adapters with link properties.
#[derive(Debug)]
pub struct TextSink<W> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_adapter(&mut self, adapter: &Adapter) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "{SEPARATOR}")?;
        writeln!(w, "{}:", adapter.name())?;
        if adapter.display_name() != adapter.name() {
            writeln!(w, "    Display name: {}", adapter.display_name())?;
        }
        writeln!(w, "    Up: {}", adapter.is_up())?;
        writeln!(w, "    Loopback: {}", adapter.is_loopback())?;
        writeln!(w, "    Virtual: {}", adapter.is_virtual())?;
        writeln!(w, "    Supports Multicast: {}", adapter.supports_multicast())?;
        writeln!(w, "    Address:")?;
        for addr in adapter.ip_addresses() {
            writeln!(w, "        {addr}")?;
        }

        let Some(mtu) = adapter.mtu() else {
            return Ok(());
        };
        writeln!(w, "    MTU: {mtu}")?;
        writeln!(w, "    DNS servers ({}):", adapter.dns_servers().len())?;
        for dns in adapter.dns_servers() {
            writeln!(w, "        {dns}")?;
        }
        writeln!(w, "    Routes ({}):", adapter.routes().len())?;
        for route in adapter.routes() {
            write_route(w, route, mtu)?;
        }
        Ok(())
    }
}

fn or_none<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

fn write_route(w: &mut impl Write, route: &Route, mtu: u32) -> io::Result<()> {
    let destination = or_none(route.destination());
    let gateway = or_none(route.gateway());
    let prefix = route.prefix().map_or(-1, i16::from);
    let scope = route.scope();

    writeln!(w, "        {destination} -> {gateway}:")?;
    writeln!(w, "            Destination: {destination}")?;
    writeln!(w, "            Address: {}", or_none(route.address()))?;
    writeln!(w, "            Prefix: {prefix}")?;
    writeln!(w, "            isIPv6: {}", route.is_ipv6())?;
    writeln!(w, "            hasGateway: {}", route.has_gateway())?;
    writeln!(w, "            Gateway: {gateway}")?;
    writeln!(w, "            isDefault: {}", route.is_default())?;
    writeln!(w, "            isHostRoute: {}", route.is_host_route())?;
    writeln!(w, "            isNetworkRoute: {}", route.is_network_route())?;
    writeln!(w, "            isDirect: {}", route.is_direct())?;
    writeln!(w, "            Interface MTU: {mtu}")?;
    writeln!(w, "            isAnyLocal: {}", scope.is_any_local)?;
    writeln!(w, "            isSiteLocal: {}", scope.is_site_local)?;
    writeln!(w, "            isLoopback: {}", scope.is_loopback)?;
    writeln!(w, "            isLinkLocal: {}", scope.is_link_local)?;
    writeln!(w, "            isMulticast: {}", scope.is_multicast)
}

impl<W: Write> SnapshotSink for TextSink<W> {
    fn deliver(&mut self, topology: &Topology) -> Result<(), SinkError> {
        for adapter in topology.adapters() {
            self.write_adapter(adapter)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
