//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file passed with `--config` could not be read.
    #[error("Cannot read config file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("Invalid config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `netsnap init` could not write the template.
    #[error("Cannot write config template '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An adapter name pattern does not compile.
    #[error("Invalid {list} adapter pattern '{pattern}': {source}")]
    InvalidRegex {
        /// `"include"` or `"exclude"`
        list: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `output.format` in the config file is neither `json` nor `text`.
    #[error("Invalid output.format '{value}': expected \"json\" or \"text\"")]
    InvalidFormat { value: String },
}

impl ConfigError {
    /// A short suggestion for fixing the error, if there is one.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::FileRead { .. } | Self::TomlParse(_) => {
                Some("Run 'netsnap init' to generate a configuration template.")
            }
            Self::FileWrite { .. } => Some("Pass a writable path with 'netsnap init -o <path>'."),
            Self::InvalidRegex { .. } => {
                Some("Adapter patterns use Rust regex syntax, e.g. '^eth' or 'docker\\d+'.")
            }
            Self::InvalidFormat { .. } => {
                Some("Set output.format to \"json\" or \"text\", or pass --format.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_hint() {
        let regex_error = regex::Regex::new("[").unwrap_err();
        let errors = [
            ConfigError::FileRead {
                path: "a.toml".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            ConfigError::InvalidRegex {
                list: "exclude",
                pattern: "[".to_string(),
                source: regex_error,
            },
            ConfigError::InvalidFormat {
                value: "yaml".to_string(),
            },
        ];

        for error in &errors {
            assert!(error.hint().is_some(), "no hint for {error:?}");
        }
    }

    #[test]
    fn regex_error_names_the_list() {
        let error = ConfigError::InvalidRegex {
            list: "include",
            pattern: "(".to_string(),
            source: regex::Regex::new("(").unwrap_err(),
        };
        assert!(error.to_string().starts_with("Invalid include adapter pattern '('"));
    }

    #[test]
    fn format_hint_mentions_cli_flag() {
        let error = ConfigError::InvalidFormat {
            value: "xml".to_string(),
        };
        assert!(error.hint().is_some_and(|hint| hint.contains("--format")));
    }
}
