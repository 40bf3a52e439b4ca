//! Tests for configuration merging and validation.

use std::net::IpAddr;
use std::path::PathBuf;

use super::{Cli, ConfigError, OutputFormat, TomlConfig, ValidatedConfig, write_default_config};
use crate::network::filter::AdapterFilter;
use crate::network::{Adapter, RawInterface};

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from_iter(std::iter::once("netsnap").chain(args.iter().copied()))
}

fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn adapter(name: &str) -> Adapter {
    let ip: IpAddr = "192.168.1.2".parse().unwrap();
    Adapter::aggregate(RawInterface::new(name, vec![ip]), None)
}

fn loopback() -> Adapter {
    let mut raw = RawInterface::new("lo", vec![]);
    raw.is_loopback = true;
    Adapter::aggregate(raw, None)
}

mod resolution {
    use super::*;

    #[test]
    fn defaults_without_toml() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.output.is_none());
        assert!(config.filter.is_empty());
        assert!(config.device_id.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn toml_values_apply() {
        let file = toml(
            r#"
            [output]
            format = "text"
            path = "snap.txt"

            [device]
            id = "from-toml"
            "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&file)).unwrap();

        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.output, Some(PathBuf::from("snap.txt")));
        assert_eq!(config.device_id.as_deref(), Some("from-toml"));
    }

    #[test]
    fn cli_overrides_toml() {
        let file = toml(
            r#"
            [output]
            format = "text"
            path = "snap.txt"

            [device]
            id = "from-toml"
            "#,
        );
        let args = cli(&["--format", "json", "-o", "cli.json", "--device-id", "from-cli"]);

        let config = ValidatedConfig::from_raw(&args, Some(&file)).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.output, Some(PathBuf::from("cli.json")));
        assert_eq!(config.device_id.as_deref(), Some("from-cli"));
    }

    #[test]
    fn toml_format_is_case_insensitive() {
        let file = toml("[output]\nformat = \"TEXT\"");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&file)).unwrap();
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn unknown_toml_format_is_rejected() {
        let file = toml("[output]\nformat = \"yaml\"");
        let err = ValidatedConfig::from_raw(&cli(&[]), Some(&file)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { ref value } if value == "yaml"));
    }

    #[test]
    fn display_mentions_destination() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();
        let shown = config.to_string();
        assert!(shown.contains("format: json"));
        assert!(shown.contains("output: stdout"));
    }
}

mod filtering {
    use super::*;

    #[test]
    fn no_filters_match_everything() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert!(config.filter.matches(&loopback()));
        assert!(config.filter.matches(&adapter("eth0")));
    }

    #[test]
    fn exclude_loopback_from_toml() {
        let file = toml("[filter]\nexclude_loopback = true");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&file)).unwrap();

        assert!(!config.filter.matches(&loopback()));
        assert!(config.filter.matches(&adapter("eth0")));
    }

    #[test]
    fn boolean_flags_use_or_semantics() {
        let file = toml("[filter]\nexclude_loopback = false");
        let config =
            ValidatedConfig::from_raw(&cli(&["--exclude-loopback"]), Some(&file)).unwrap();

        assert!(!config.filter.matches(&loopback()));
    }

    #[test]
    fn up_only_excludes_down_adapters() {
        let mut raw = RawInterface::new("eth1", vec![]);
        raw.is_up = false;
        let down = Adapter::aggregate(raw, None);

        let config = ValidatedConfig::from_raw(&cli(&["--up-only"]), None).unwrap();

        assert!(!config.filter.matches(&down));
    }

    #[test]
    fn cli_include_replaces_toml_include() {
        let file = toml("[filter]\ninclude = [\"^wlan\"]");
        let config =
            ValidatedConfig::from_raw(&cli(&["--include-adapter", "^eth"]), Some(&file)).unwrap();

        assert!(config.filter.matches(&adapter("eth0")));
        assert!(!config.filter.matches(&adapter("wlan0")));
    }

    #[test]
    fn toml_exclude_survives_cli_include() {
        let file = toml("[filter]\nexclude = [\"^eth1$\"]");
        let config =
            ValidatedConfig::from_raw(&cli(&["--include-adapter", "^eth"]), Some(&file)).unwrap();

        assert!(config.filter.matches(&adapter("eth0")));
        assert!(!config.filter.matches(&adapter("eth1")));
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = ValidatedConfig::from_raw(&cli(&["--exclude-adapter", "[unclosed"]), None)
            .unwrap_err();

        assert!(
            matches!(err, ConfigError::InvalidRegex { list: "exclude", ref pattern, .. } if pattern == "[unclosed")
        );
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netsnap.toml");
        std::fs::write(&path, "[output]\nformat = \"text\"\n").unwrap();

        let args = cli(&["-c", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&args).unwrap();

        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn load_propagates_missing_file() {
        let args = cli(&["-c", "/nonexistent/netsnap.toml"]);
        assert!(matches!(
            ValidatedConfig::load(&args),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn written_template_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netsnap.toml");

        write_default_config(&path).unwrap();
        let args = cli(&["-c", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&args).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.filter.is_empty());
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("netsnap.toml");

        assert!(matches!(
            write_default_config(&path),
            Err(ConfigError::FileWrite { .. })
        ));
    }
}
