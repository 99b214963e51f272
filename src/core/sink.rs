//! Destinations for timer reports.

use crate::constants::LOG_TARGET;
use std::fmt;
use std::sync::Arc;

/// A consumer of rendered report lines.
///
/// The default sink prints to standard output. `Sink::log` forwards into the `log`
/// facade instead, and `Sink::from_fn` accepts any single-string consumer.
#[derive(Clone)]
pub struct Sink(Arc<dyn Fn(&str) + Send + Sync>);

impl Sink {
    /// Prints each line to standard output.
    pub fn stdout() -> Self {
        Self::from_fn(|line| println!("{}", line))
    }

    /// Emits each line through the `log` facade at `level`.
    pub fn log(level: log::Level) -> Self {
        Self::from_fn(move |line| log::log!(target: LOG_TARGET, level, "{}", line))
    }

    /// Wraps an arbitrary consumer.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Hands `line` to the consumer.
    pub fn emit(&self, line: &str) {
        (self.0)(line);
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sink(..)")
    }
}
