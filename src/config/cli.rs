//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use super::OutputFormat;

/// netsnap: network adapter and route snapshot
///
/// Lists network adapters with their addresses, DNS servers and classified
/// routes. Without a subcommand a snapshot is written to stdout or `--output`.
#[derive(Debug, Parser)]
#[command(name = "netsnap")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the report to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Regex pattern for adapters to include (can be specified multiple times)
    #[arg(long = "include-adapter", value_name = "PATTERN")]
    pub include_adapters: Vec<String>,

    /// Regex pattern for adapters to exclude (can be specified multiple times)
    #[arg(long = "exclude-adapter", value_name = "PATTERN")]
    pub exclude_adapters: Vec<String>,

    /// Exclude loopback adapters
    #[arg(long = "exclude-loopback")]
    pub exclude_loopback: bool,

    /// Exclude virtual adapters (aliases, tunnels, PPP)
    #[arg(long = "exclude-virtual")]
    pub exclude_virtual: bool,

    /// Report only adapters that are up
    #[arg(long = "up-only")]
    pub up_only: bool,

    /// Device identifier used for pseudo-MAC derivation
    #[arg(long = "device-id", global = true)]
    pub device_id: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for netsnap
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect and print a snapshot (the default)
    Snapshot,

    /// Print the pseudo-MAC derived from the device identifier
    Mac,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE_NAME)]
        output: PathBuf,
    },
}

/// Report format argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Pretty-printed JSON
    Json,
    /// Human-readable diagnostic dump
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Text => Self::Text,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
