//! Platform-specific network information providers.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`NetworkInfoProvider`](super::NetworkInfoProvider) trait.
//!
//! # Platform Support
//!
//! - **Linux**: `getifaddrs` for interfaces, netlink link and route dumps
//!   (all routing tables) for MTU and routes, `/etc/resolv.conf` for DNS.
//! - **Windows**: `GetAdaptersAddresses` for interfaces, DNS, gateways and prefixes.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
mod netlink;

#[cfg(windows)]
mod windows;

#[cfg(target_os = "linux")]
pub use linux::LinuxProvider;

#[cfg(windows)]
pub use windows::WindowsProvider;

// Re-export platform-specific provider as PlatformProvider for convenience
#[cfg(target_os = "linux")]
pub use linux::LinuxProvider as PlatformProvider;

#[cfg(windows)]
pub use windows::WindowsProvider as PlatformProvider;
