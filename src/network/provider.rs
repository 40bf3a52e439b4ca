//! Network information provider trait and error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::{LinkProperties, RawInterface};

/// Error type for provider operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// The snapshot builder reports any of these once for the whole snapshot.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// Permission denied to access network information.
    #[error("Permission denied: {context}")]
    PermissionDenied {
        /// Additional context about what permission was denied.
        context: String,
    },

    /// Reading an OS-provided file or socket failed.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A netlink request on the route socket failed.
    #[cfg(target_os = "linux")]
    #[error("Netlink {operation} failed: {source}")]
    Netlink {
        /// The request or socket call that failed.
        operation: &'static str,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

impl ProviderError {
    /// Wraps an I/O error, mapping `PermissionDenied` to its own variant.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                context: format!("reading {}", path.display()),
            }
        } else {
            Self::Io { path, source }
        }
    }

    /// Wraps a netlink socket error, mapping `PermissionDenied` to its own variant.
    #[cfg(target_os = "linux")]
    #[must_use]
    pub fn from_netlink(operation: &'static str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                context: format!("netlink {operation}"),
            }
        } else {
            Self::Netlink { operation, source }
        }
    }
}

/// Source of raw interface and link data.
///
/// # Design
///
/// - All OS access sits behind this trait
/// - Enables dependency injection for testing with mock implementations
/// - Platform-specific implementations provided in [`super::platform`]
///
/// # Example
///
/// ```
/// use netsnap::network::{LinkProperties, NetworkInfoProvider, ProviderError, RawInterface};
///
/// struct Fixed;
///
/// impl NetworkInfoProvider for Fixed {
///     fn list_interfaces(&self) -> Result<Vec<RawInterface>, ProviderError> {
///         Ok(vec![RawInterface::new("eth0", vec![])])
///     }
///
///     fn list_link_properties(&self) -> Result<Vec<LinkProperties>, ProviderError> {
///         Ok(vec![LinkProperties::new("eth0", 1500)])
///     }
/// }
///
/// assert_eq!(Fixed.list_interfaces().unwrap().len(), 1);
/// ```
pub trait NetworkInfoProvider: Send + Sync {
    /// Lists all interfaces on the host.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when enumeration fails or is not permitted.
    ///
    /// # Implementation Notes
    ///
    /// - Implementations should return ALL interfaces; filtering is done by the caller
    /// - Order should be stable across calls
    fn list_interfaces(&self) -> Result<Vec<RawInterface>, ProviderError>;

    /// Lists the link-property sets of every known network.
    ///
    /// At most one set per interface name is expected; callers use the
    /// first one when a provider reports more.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when link data cannot be read.
    fn list_link_properties(&self) -> Result<Vec<LinkProperties>, ProviderError>;
}

impl<T: NetworkInfoProvider + ?Sized> NetworkInfoProvider for &T {
    fn list_interfaces(&self) -> Result<Vec<RawInterface>, ProviderError> {
        (*self).list_interfaces()
    }

    fn list_link_properties(&self) -> Result<Vec<LinkProperties>, ProviderError> {
        (*self).list_link_properties()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_io_maps_to_permission_variant() {
        let error = ProviderError::from_io(
            "/etc/resolv.conf",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );

        assert!(matches!(error, ProviderError::PermissionDenied { .. }));
        assert!(error.to_string().contains("/etc/resolv.conf"));
    }

    #[test]
    fn other_io_errors_keep_path() {
        let error = ProviderError::from_io("/etc/resolv.conf", io::Error::from(io::ErrorKind::InvalidData));

        assert!(matches!(error, ProviderError::Io { .. }));
        assert!(error.to_string().contains("/etc/resolv.conf"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn netlink_errors_keep_operation() {
        let denied = ProviderError::from_netlink("route dump", io::Error::from_raw_os_error(1));
        assert!(matches!(denied, ProviderError::PermissionDenied { .. }));

        let other = ProviderError::from_netlink("route dump", io::Error::from_raw_os_error(105));
        assert!(matches!(other, ProviderError::Netlink { operation: "route dump", .. }));
    }

    #[test]
    fn platform_error_displays_message() {
        let error = ProviderError::Platform {
            message: "unsupported operation".to_string(),
        };
        assert!(error.to_string().contains("unsupported operation"));
    }
}
