// src/constants.rs

/// The display template used when a timer is built without one.
/// Slot `{0}` is the timer name, slot `{1}` the smoothed average in milliseconds.
pub const DEFAULT_TEXT: &str = "Elapsed time for '{0}': {1:0.1f} milliseconds";

/// The moving-average window used when none is configured.
pub const DEFAULT_FILTER_STRENGTH: usize = 1;

/// Reported instead of an average when a timer has no samples yet.
pub const EMPTY_AVERAGE: f64 = -1.0;

/// Name rendered into the display template for timers built without a name.
pub const UNNAMED_TIMER: &str = "<unnamed>";

/// The `log` target used by the logging sink.
pub const LOG_TARGET: &str = "timekeep";

/// The name of the configuration directory (in the system config dir).
pub const CONFIG_DIR_NAME: &str = "timekeep";

/// The name of the configuration file.
pub const CONFIG_FILENAME: &str = "timekeep.toml";

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "TIMEKEEP_CONFIG";
