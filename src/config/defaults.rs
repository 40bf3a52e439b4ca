//! Default values for configuration options.

use super::OutputFormat;

/// Default report format.
pub const FORMAT: OutputFormat = OutputFormat::Json;

/// Default file name for `netsnap init`.
pub const CONFIG_FILE_NAME: &str = "netsnap.toml";
