//! Configuration layer for netsnap.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! For filter patterns (`include_adapters`, `exclude_adapters`), CLI patterns **replace**
//! TOML patterns entirely (not merged). Include and exclude lists are replaced
//! independently.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`--exclude-loopback`, `--exclude-virtual`, `--up-only`) use OR semantics:
//! set in either CLI or TOML means set. Flags only enable, never disable.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, FormatArg};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{OutputFormat, ValidatedConfig, write_default_config};
