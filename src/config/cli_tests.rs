//! Tests for CLI argument parsing.

use std::path::PathBuf;

use super::cli::{Cli, Command, FormatArg};

mod parsing {
    use super::*;

    #[test]
    fn no_arguments_means_snapshot_with_defaults() {
        let cli = Cli::parse_from_iter(["netsnap"]);

        assert!(cli.command.is_none());
        assert!(cli.format.is_none());
        assert!(cli.output.is_none());
        assert!(cli.include_adapters.is_empty());
        assert!(cli.exclude_adapters.is_empty());
        assert!(!cli.exclude_loopback);
        assert!(!cli.exclude_virtual);
        assert!(!cli.up_only);
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_formats() {
        let json = Cli::parse_from_iter(["netsnap", "--format", "json"]);
        assert_eq!(json.format, Some(FormatArg::Json));

        let text = Cli::parse_from_iter(["netsnap", "--format", "text"]);
        assert_eq!(text.format, Some(FormatArg::Text));
    }

    #[test]
    fn invalid_format_is_rejected() {
        let result = <Cli as clap::Parser>::try_parse_from(["netsnap", "--format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_filter_options() {
        let cli = Cli::parse_from_iter([
            "netsnap",
            "--include-adapter",
            "^eth",
            "--include-adapter",
            "^wlan",
            "--exclude-adapter",
            "^docker",
            "--exclude-loopback",
            "--exclude-virtual",
            "--up-only",
        ]);

        assert_eq!(cli.include_adapters, vec!["^eth", "^wlan"]);
        assert_eq!(cli.exclude_adapters, vec!["^docker"]);
        assert!(cli.exclude_loopback);
        assert!(cli.exclude_virtual);
        assert!(cli.up_only);
    }

    #[test]
    fn parse_output_short_flag() {
        let cli = Cli::parse_from_iter(["netsnap", "-o", "snap.json"]);
        assert_eq!(cli.output, Some(PathBuf::from("snap.json")));
    }

    #[test]
    fn parse_config_and_verbose() {
        let cli = Cli::parse_from_iter(["netsnap", "-c", "netsnap.toml", "-v"]);

        assert_eq!(cli.config, Some(PathBuf::from("netsnap.toml")));
        assert!(cli.verbose);
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn explicit_snapshot_subcommand() {
        let cli = Cli::parse_from_iter(["netsnap", "--format", "text", "snapshot"]);

        assert!(matches!(cli.command, Some(Command::Snapshot)));
        assert_eq!(cli.format, Some(FormatArg::Text));
    }

    #[test]
    fn mac_with_device_id() {
        let cli = Cli::parse_from_iter(["netsnap", "mac", "--device-id", "abc"]);

        assert!(matches!(cli.command, Some(Command::Mac)));
        assert_eq!(cli.device_id.as_deref(), Some("abc"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from_iter(["netsnap", "mac", "-c", "cfg.toml", "-v"]);

        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn init_default_output() {
        let cli = Cli::parse_from_iter(["netsnap", "init"]);

        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, PathBuf::from("netsnap.toml")),
            other => panic!("Expected Init command, got {other:?}"),
        }
    }

    #[test]
    fn init_custom_output() {
        let cli = Cli::parse_from_iter(["netsnap", "init", "-o", "custom.toml"]);

        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, PathBuf::from("custom.toml")),
            other => panic!("Expected Init command, got {other:?}"),
        }
    }
}
