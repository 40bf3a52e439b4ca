//! Deterministic pseudo-MAC derivation from a device identifier.
//!
//! The identifier is hashed with MD5 and the first six digest bytes become
//! the address. The result is stable for a given identifier and carries no
//! security meaning.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use serde::{Serialize, Serializer};

/// Address returned when no identifier is available.
pub const ZERO_MAC: &str = "00:00:00:00:00:00";

/// Locations of the systemd / D-Bus machine identifier, in lookup order.
pub const MACHINE_ID_PATHS: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// A six-byte hardware-style address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DeviceMac([u8; 6]);

impl DeviceMac {
    /// The all-zero address.
    pub const ZERO: Self = Self([0; 6]);

    /// Derives the address from an identifier.
    ///
    /// Absent or empty identifiers map to [`DeviceMac::ZERO`].
    #[must_use]
    pub fn derive(identifier: Option<&str>) -> Self {
        match identifier {
            Some(id) if !id.is_empty() => {
                let digest = Md5::digest(id.as_bytes());
                let mut bytes = [0u8; 6];
                bytes.copy_from_slice(&digest[..6]);
                Self(bytes)
            }
            _ => Self::ZERO,
        }
    }

    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for DeviceMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Serialize for DeviceMac {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Derives the colon-separated uppercase pseudo-MAC for `identifier`.
///
/// Never fails: absent or empty identifiers yield [`ZERO_MAC`].
///
/// ```
/// let mac = netsnap::device::derive_mac(Some("0123456789abcdef"));
/// assert_eq!(mac.len(), 17);
/// assert_eq!(netsnap::device::derive_mac(None), netsnap::device::ZERO_MAC);
/// ```
#[must_use]
pub fn derive_mac(identifier: Option<&str>) -> String {
    DeviceMac::derive(identifier).to_string()
}

/// Supplies the opaque identifier used for pseudo-MAC derivation.
pub trait DeviceIdSource: Send + Sync {
    /// Returns the identifier, or `None` when it is unknown.
    fn device_id(&self) -> Option<String>;
}

/// A fixed identifier (from configuration or the command line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDeviceId(pub String);

impl DeviceIdSource for FixedDeviceId {
    fn device_id(&self) -> Option<String> {
        Some(self.0.clone()).filter(|id| !id.is_empty())
    }
}

/// Reads the machine identifier from the first readable, non-empty file.
#[derive(Debug, Clone)]
pub struct MachineIdSource {
    paths: Vec<PathBuf>,
}

impl Default for MachineIdSource {
    fn default() -> Self {
        Self::with_paths(MACHINE_ID_PATHS)
    }
}

impl MachineIdSource {
    /// Looks up the identifier in `paths`, in order.
    #[must_use]
    pub fn with_paths(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    fn read(path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content.trim().to_string()).filter(|id| !id.is_empty()),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!("Cannot read {}: {e}", path.display());
                }
                None
            }
        }
    }
}

impl DeviceIdSource for MachineIdSource {
    fn device_id(&self) -> Option<String> {
        self.paths.iter().find_map(|path| Self::read(path))
    }
}
