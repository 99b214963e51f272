use anyhow::Result;

use crate::{
    cli::{Cli, Command, handlers},
    core::config,
};

/// Routes a parsed command line to its handler.
///
/// The configuration is only loaded for commands that use it, so a broken
/// `timekeep.toml` never gets in the way of `timekeep manifest`.
pub fn dispatch(cli: Cli) -> Result<()> {
    log::debug!("Dispatching command: {:?}", cli.command);

    match cli.command {
        Command::Manifest(args) => handlers::manifest::handle(args),
        Command::Bench(args) => {
            let loaded = config::load(cli.config.as_deref())?;
            handlers::bench::handle(args, &loaded)
        }
        Command::Config(args) => {
            let loaded = config::load(cli.config.as_deref())?;
            handlers::config::handle(args, &loaded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_dispatch_manifest_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.bin"), "x").unwrap();
        let source = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["timekeep", "manifest", "share", source, "--json"]).unwrap();

        assert!(dispatch(cli).is_ok());
    }

    #[test]
    fn test_dispatch_manifest_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let cli =
            Cli::try_parse_from(["timekeep", "manifest", "share", missing.to_str().unwrap()])
                .unwrap();

        assert!(dispatch(cli).is_err());
    }

    #[test]
    fn test_dispatch_config_with_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[timers.db]\nfilter_strength = 4\n").unwrap();
        file.flush().unwrap();

        let cli = Cli::try_parse_from([
            "timekeep",
            "config",
            "--config",
            file.path().to_str().unwrap(),
            "--timer",
            "render",
        ])
        .unwrap();

        assert!(dispatch(cli).is_ok());
    }

    #[test]
    fn test_dispatch_config_with_broken_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[defaults]\nfilter_strength = \"many\"\n").unwrap();
        file.flush().unwrap();

        let cli = Cli::try_parse_from([
            "timekeep",
            "config",
            "--config",
            file.path().to_str().unwrap(),
        ])
        .unwrap();

        assert!(dispatch(cli).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_dispatch_bench_runs_command() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();
        file.flush().unwrap();

        let cli = Cli::try_parse_from([
            "timekeep",
            "bench",
            "--config",
            file.path().to_str().unwrap(),
            "-r",
            "2",
            "-q",
            "--",
            "true",
        ])
        .unwrap();

        assert!(dispatch(cli).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_dispatch_bench_accepts_quoted_command_line() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();
        file.flush().unwrap();

        let cli = Cli::try_parse_from([
            "timekeep",
            "bench",
            "--config",
            file.path().to_str().unwrap(),
            "-q",
            "--",
            "test -n 'a b'",
        ])
        .unwrap();

        assert!(dispatch(cli).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_dispatch_bench_failure_propagates() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();
        file.flush().unwrap();

        let cli = Cli::try_parse_from([
            "timekeep",
            "bench",
            "--config",
            file.path().to_str().unwrap(),
            "-q",
            "--",
            "false",
        ])
        .unwrap();

        assert!(dispatch(cli).is_err());
    }
}
