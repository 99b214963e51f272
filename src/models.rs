// src/models.rs

use crate::constants::{DEFAULT_FILTER_STRENGTH, DEFAULT_TEXT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// --- CONFIGURATION MODELS (timekeep.toml) ---

/// The contents of a `timekeep.toml` file. Every table and key is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TimekeepConfig {
    /// Settings applied to every timer.
    pub defaults: TimerDefaults,
    /// Per-name overrides, keyed by timer name.
    pub timers: BTreeMap<String, TimerOverride>,
}

/// The `[defaults]` table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TimerDefaults {
    pub filter_strength: usize,
    pub log_on_stop: bool,
    pub text: String,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            filter_strength: DEFAULT_FILTER_STRENGTH,
            log_on_stop: false,
            text: DEFAULT_TEXT.to_string(),
        }
    }
}

/// A `[timers.<name>]` table. Unset keys fall back to `[defaults]`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TimerOverride {
    pub filter_strength: Option<usize>,
    pub log_on_stop: Option<bool>,
    pub text: Option<String>,
}

// --- MANIFEST MODELS ---

/// One directory of a packaging manifest: where its files get installed, and
/// which source files go there.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub install_dir: PathBuf,
    pub files: Vec<PathBuf>,
}
