//! TOML configuration file parsing.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Report output section
    #[serde(default)]
    pub output: OutputSection,

    /// Adapter filter section
    #[serde(default)]
    pub filter: FilterSection,

    /// Device identity section
    #[serde(default)]
    pub device: DeviceSection,
}

/// Report output section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Report format: "json" or "text"
    pub format: Option<String>,

    /// Report file path (stdout when unset)
    pub path: Option<String>,
}

/// Adapter filter section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Regex patterns for adapters to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns for adapters to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub exclude_loopback: bool,

    #[serde(default)]
    pub exclude_virtual: bool,

    #[serde(default)]
    pub up_only: bool,
}

/// Device identity section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSection {
    /// Device identifier for pseudo-MAC derivation
    pub id: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# netsnap configuration file

[output]
# Report format: "json" or "text" (default: json)
# format = "json"

# Report file (default: stdout)
# path = "snapshot.json"

[filter]
# Regex patterns for adapters to include (empty = all)
# Note: CLI patterns REPLACE these entirely (not merged)
# include = ["^wlan", "^eth"]

# Regex patterns for adapters to exclude
# Note: CLI patterns REPLACE these entirely (not merged)
# exclude = ["^docker", "^veth"]

# Skip loopback adapters
exclude_loopback = false

# Skip virtual adapters (aliases, tunnels, PPP)
exclude_virtual = false

# Report only adapters that are up
up_only = false

[device]
# Identifier used for pseudo-MAC derivation
# (default: /etc/machine-id, then /var/lib/dbus/machine-id)
# id = "0123456789abcdef"
"#
    .to_string()
}
