use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod dispatcher;
pub mod handlers;

/// timekeep: named stopwatch timers with moving-average reporting.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to a `timekeep.toml`. Overrides `TIMEKEEP_CONFIG` and the user config.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lists the files of a directory tree grouped by install directory.
    Manifest(handlers::manifest::ManifestArgs),
    /// Runs a command repeatedly and reports its smoothed run time.
    Bench(handlers::bench::BenchArgs),
    /// Shows the effective timer configuration.
    Config(handlers::config::ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bench_with_trailing_command() {
        let cli = Cli::try_parse_from([
            "timekeep", "bench", "-r", "3", "--name", "ls", "--", "ls", "-la",
        ])
        .unwrap();

        match cli.command {
            Command::Bench(args) => {
                assert_eq!(args.repeat, 3);
                assert_eq!(args.name, "ls");
                assert_eq!(args.filter, None);
                assert_eq!(args.command, vec!["ls", "-la"]);
            }
            other => panic!("expected bench, got {:?}", other),
        }
    }

    #[test]
    fn test_bench_requires_command_and_positive_repeat() {
        assert!(Cli::try_parse_from(["timekeep", "bench"]).is_err());
        assert!(Cli::try_parse_from(["timekeep", "bench", "-r", "0", "--", "true"]).is_err());
    }

    #[test]
    fn test_parse_manifest_excludes() {
        let cli = Cli::try_parse_from([
            "timekeep", "manifest", "share/pkg", "data", "--exclude", ".pyc,.tmp", "-e", ".log",
        ])
        .unwrap();

        match cli.command {
            Command::Manifest(args) => {
                assert_eq!(args.install_path, "share/pkg");
                assert_eq!(args.source_path, "data");
                assert_eq!(args.exclude, vec![".pyc", ".tmp", ".log"]);
                assert!(!args.json);
            }
            other => panic!("expected manifest, got {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["timekeep", "config", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Command::Config(_)));
    }
}
