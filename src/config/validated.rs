//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::network::filter::{AdapterFlag, FilterChain, FlagFilter, NameRegexFilter};

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Report format for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of adapters.
    Json,
    /// Human-readable diagnostic dump.
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Report format
    pub format: OutputFormat,

    /// Report file; `None` writes to stdout
    pub output: Option<PathBuf>,

    /// Adapter filter chain
    pub filter: FilterChain,

    /// Device identifier for pseudo-MAC derivation.
    /// If `None`, the machine id files are consulted.
    pub device_id: Option<String>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output_str = self
            .output
            .as_ref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());

        write!(
            f,
            "Config {{ format: {}, output: {}, device_id: {}, filters: {} }}",
            self.format,
            output_str,
            if self.device_id.is_some() { "set" } else { "auto" },
            self.filter.len(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The format value in the TOML file is unknown
    /// - Regex patterns are invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let format = Self::resolve_format(cli, toml)?;
        let output = Self::resolve_output(cli, toml);
        let filter = Self::build_filter(cli, toml)?;
        let device_id = Self::resolve_device_id(cli, toml);

        Ok(Self {
            format,
            output,
            filter,
            device_id,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_format(cli: &Cli, toml: Option<&TomlConfig>) -> Result<OutputFormat, ConfigError> {
        if let Some(format) = cli.format {
            return Ok(format.into());
        }

        match toml.and_then(|t| t.output.format.as_deref()) {
            Some(value) => parse_format(value),
            None => Ok(defaults::FORMAT),
        }
    }

    fn resolve_output(cli: &Cli, toml: Option<&TomlConfig>) -> Option<PathBuf> {
        if let Some(ref path) = cli.output {
            return Some(path.clone());
        }

        toml.and_then(|t| t.output.path.as_ref().map(PathBuf::from))
    }

    fn resolve_device_id(cli: &Cli, toml: Option<&TomlConfig>) -> Option<String> {
        cli.device_id
            .clone()
            .or_else(|| toml.and_then(|t| t.device.id.clone()))
    }

    fn build_filter(cli: &Cli, toml: Option<&TomlConfig>) -> Result<FilterChain, ConfigError> {
        let section = toml.map(|t| &t.filter);
        let mut chain = FilterChain::new();

        let mut flags = Vec::new();
        if cli.exclude_loopback || section.is_some_and(|s| s.exclude_loopback) {
            flags.push(AdapterFlag::Loopback);
        }
        if cli.exclude_virtual || section.is_some_and(|s| s.exclude_virtual) {
            flags.push(AdapterFlag::Virtual);
        }
        if cli.up_only || section.is_some_and(|s| s.up_only) {
            flags.push(AdapterFlag::Down);
        }
        if !flags.is_empty() {
            chain = chain.exclude(FlagFilter::new(flags));
        }

        // CLI patterns replace TOML patterns, per list
        let includes = pick_patterns(&cli.include_adapters, section.map(|s| s.include.as_slice()));
        for pattern in includes {
            chain = chain.include(compile_pattern("include", pattern)?);
        }

        let excludes = pick_patterns(&cli.exclude_adapters, section.map(|s| s.exclude.as_slice()));
        for pattern in excludes {
            chain = chain.exclude(compile_pattern("exclude", pattern)?);
        }

        Ok(chain)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_format(s: &str) -> Result<OutputFormat, ConfigError> {
    match s.to_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "text" | "txt" => Ok(OutputFormat::Text),
        _ => Err(ConfigError::InvalidFormat {
            value: s.to_string(),
        }),
    }
}

fn pick_patterns<'a>(cli: &'a [String], toml: Option<&'a [String]>) -> &'a [String] {
    if cli.is_empty() {
        toml.unwrap_or_default()
    } else {
        cli
    }
}

fn compile_pattern(list: &'static str, pattern: &str) -> Result<NameRegexFilter, ConfigError> {
    NameRegexFilter::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        list,
        pattern: pattern.to_string(),
        source: e,
    })
}
