//! Topology snapshot construction and lookup.

use std::net::IpAddr;

use serde::Serialize;
use thiserror::Error;

use super::filter::AdapterFilter;
use super::{Adapter, LinkProperties, NetworkInfoProvider, ProviderError, Route};

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;

/// Error type for snapshot construction.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The provider failed; the snapshot was abandoned as a whole.
    #[error("Network information provider unavailable while listing {stage}: {source}")]
    ProviderUnavailable {
        /// Which provider call failed.
        stage: &'static str,
        /// Underlying provider error.
        #[source]
        source: ProviderError,
    },
}

/// Provider call names used in [`SnapshotError::ProviderUnavailable`].
pub mod stage {
    /// `list_interfaces`.
    pub const INTERFACES: &str = "interfaces";
    /// `list_link_properties`.
    pub const LINK_PROPERTIES: &str = "link properties";
}

/// Builds [`Topology`] snapshots from a [`NetworkInfoProvider`].
///
/// Every call to [`build`](Self::build) is an independent rebuild; nothing
/// is cached between snapshots.
///
/// # Failure policy
///
/// Any provider error aborts the snapshot with a single
/// [`SnapshotError`]. Interfaces are not isolated from each other.
pub struct SnapshotBuilder<P> {
    provider: P,
    filter: Option<Box<dyn AdapterFilter>>,
}

impl<P: NetworkInfoProvider> SnapshotBuilder<P> {
    /// Creates a builder that reports every adapter.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            filter: None,
        }
    }

    /// Restricts the snapshot to adapters accepted by `filter`.
    #[must_use]
    pub fn with_filter<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Returns a reference to the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Enumerates the provider and builds one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::ProviderUnavailable`] if either provider call fails.
    pub fn build(&self) -> Result<Topology, SnapshotError> {
        let interfaces = self
            .provider
            .list_interfaces()
            .map_err(|source| unavailable(stage::INTERFACES, source))?;
        let links = self
            .provider
            .list_link_properties()
            .map_err(|source| unavailable(stage::LINK_PROPERTIES, source))?;

        tracing::debug!(
            "Provider reported {} interface(s) and {} link set(s)",
            interfaces.len(),
            links.len()
        );

        let adapters = interfaces
            .into_iter()
            .map(|iface| {
                let link = find_link(&links, &iface.name);
                if link.is_none() {
                    tracing::debug!("No link properties for {}", iface.name);
                }
                Adapter::aggregate(iface, link)
            })
            .filter(|adapter| self.filter.as_ref().is_none_or(|f| f.matches(adapter)))
            .collect();

        Ok(Topology::new(adapters))
    }
}

impl<P> std::fmt::Debug for SnapshotBuilder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotBuilder")
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

fn unavailable(stage: &'static str, source: ProviderError) -> SnapshotError {
    tracing::warn!("Snapshot aborted, failed to list {stage}: {source}");
    SnapshotError::ProviderUnavailable { stage, source }
}

/// First link set whose interface name equals `name`.
fn find_link<'a>(links: &'a [LinkProperties], name: &str) -> Option<&'a LinkProperties> {
    links.iter().find(|link| link.interface_name == name)
}

/// An ordered, immutable list of classified adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Topology {
    adapters: Vec<Adapter>,
}

impl Topology {
    /// Wraps an ordered adapter list.
    #[must_use]
    pub const fn new(adapters: Vec<Adapter>) -> Self {
        Self { adapters }
    }

    #[must_use]
    pub fn adapters(&self) -> &[Adapter] {
        &self.adapters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// First adapter named `name`.
    #[must_use]
    pub fn adapter(&self, name: &str) -> Option<&Adapter> {
        self.adapters.iter().find(|a| a.name() == name)
    }

    /// Gateways of the adapter's IPv4, non-default, non-any-local routes.
    ///
    /// Routes without a gateway contribute nothing, so on-link routes do not
    /// appear as placeholder entries. Unknown adapters yield an empty list.
    #[must_use]
    pub fn gateways(&self, name: &str) -> Vec<IpAddr> {
        self.adapter(name)
            .map(|adapter| {
                adapter
                    .routes()
                    .iter()
                    .filter(|r| !r.is_ipv6() && !r.is_default() && !r.scope().is_any_local)
                    .filter_map(Route::gateway)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Primary and secondary DNS servers of the adapter.
    #[must_use]
    pub fn dns_pair(&self, name: &str) -> (Option<IpAddr>, Option<IpAddr>) {
        self.adapter(name).map_or((None, None), |adapter| {
            let dns = adapter.dns_servers();
            (dns.first().copied(), dns.get(1).copied())
        })
    }

    /// Every route flagged default, with the adapter that carries it.
    pub fn default_routes(&self) -> impl Iterator<Item = (&Adapter, &Route)> {
        self.adapters.iter().flat_map(|adapter| {
            adapter
                .routes()
                .iter()
                .filter(|r| r.is_default())
                .map(move |r| (adapter, r))
        })
    }
}

impl IntoIterator for Topology {
    type Item = Adapter;
    type IntoIter = std::vec::IntoIter<Adapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.adapters.into_iter()
    }
}
