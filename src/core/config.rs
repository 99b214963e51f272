//! # Config Loader
//!
//! Locates and parses `timekeep.toml`, and turns its `[defaults]` and
//! `[timers.<name>]` tables into `TimerOptions`.
//!
//! Lookup order: an explicit path, then the `TIMEKEEP_CONFIG` environment variable,
//! then `<config dir>/timekeep/timekeep.toml`. When nothing is found the built-in
//! defaults apply.

use crate::{
    constants::CONFIG_ENV_VAR,
    core::{paths, sink::Sink, timer::TimerOptions},
    models::TimekeepConfig,
};
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// A parsed configuration and the file it came from, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: TimekeepConfig,
    pub source: Option<PathBuf>,
}

/// Parses a configuration file.
pub fn load_from_path(path: &Path) -> Result<TimekeepConfig> {
    debug!("Loading timer configuration from '{}'", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config: TimekeepConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    validate(&config).with_context(|| format!("Invalid config file '{}'", path.display()))?;
    Ok(config)
}

/// Finds and loads the configuration, following the lookup order above.
///
/// An explicit path or `TIMEKEEP_CONFIG` must point at an existing file; the
/// user-level file is optional.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let requested = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => match env::var(CONFIG_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => Some(
                paths::expand_path(&value)
                    .with_context(|| format!("Failed to expand {}", CONFIG_ENV_VAR))?,
            ),
            _ => None,
        },
    };

    if let Some(path) = requested {
        let config = load_from_path(&path)?;
        return Ok(LoadedConfig {
            config,
            source: Some(path),
        });
    }

    match paths::get_config_file_path() {
        Ok(path) if path.is_file() => {
            let config = load_from_path(&path)?;
            Ok(LoadedConfig {
                config,
                source: Some(path),
            })
        }
        Ok(path) => {
            debug!("No config at '{}', using defaults", path.display());
            Ok(LoadedConfig::default())
        }
        Err(e) => {
            debug!("{}; using defaults", e);
            Ok(LoadedConfig::default())
        }
    }
}

fn validate(config: &TimekeepConfig) -> Result<()> {
    if config.defaults.filter_strength == 0 {
        return Err(anyhow!("[defaults] filter_strength must be at least 1"));
    }
    for (name, timer) in &config.timers {
        if timer.filter_strength == Some(0) {
            return Err(anyhow!("[timers.{}] filter_strength must be at least 1", name));
        }
    }
    Ok(())
}

impl TimekeepConfig {
    /// Options for the timer `name`: per-name overrides on top of `[defaults]`.
    /// The logger is the standard output sink.
    pub fn options_for(&self, name: &str) -> TimerOptions {
        let defaults = &self.defaults;
        let overrides = self.timers.get(name);

        TimerOptions {
            name: Some(name.to_string()),
            log_on_stop: overrides
                .and_then(|o| o.log_on_stop)
                .unwrap_or(defaults.log_on_stop),
            filter_strength: overrides
                .and_then(|o| o.filter_strength)
                .unwrap_or(defaults.filter_strength),
            text: overrides
                .and_then(|o| o.text.clone())
                .unwrap_or_else(|| defaults.text.clone()),
            logger: Some(Sink::stdout()),
        }
    }
}
