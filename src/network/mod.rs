//! Network layer: raw provider data, classification and snapshots.
//!
//! This module provides types and traits for:
//! - Address scope classification ([`AddressScope`])
//! - Route classification ([`RawRoute`], [`Route`])
//! - Adapter aggregation ([`RawInterface`], [`LinkProperties`], [`Adapter`])
//! - Providers of raw data ([`NetworkInfoProvider`])
//! - Snapshot construction and lookup ([`SnapshotBuilder`], [`Topology`])
//! - Platform-specific providers ([`platform`])

mod adapter;
pub mod filter;
pub mod platform;
mod provider;
mod route;
mod scope;
mod snapshot;


pub use adapter::{Adapter, LinkProperties, RawInterface};
pub use provider::{NetworkInfoProvider, ProviderError};
pub use route::{RawRoute, Route};
pub use scope::AddressScope;
pub use snapshot::{SnapshotBuilder, SnapshotError, Topology, stage};
