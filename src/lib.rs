//! netsnap: network adapter and route snapshots
//!
//! A library for enumerating network adapters, classifying their routes
//! and addresses, and deriving a stable pseudo-MAC for the device.

pub mod config;
pub mod device;
pub mod network;
pub mod report;
