//! # Timer
//!
//! A `Timer` is one configured stopwatch. It can be driven directly with
//! `start`/`stop`, through a scope guard (`Timer::scope`, `Timer::measure`), or by
//! wrapping a function (`crate::core::wrap`).
//!
//! Named timers push every measurement into their `Registry` entry and report the
//! moving average over the entry's window. Unnamed timers keep no history: `stop`
//! returns the raw elapsed time, and a logged report uses the `<unnamed>` placeholder.

use crate::{
    constants::{DEFAULT_FILTER_STRENGTH, DEFAULT_TEXT, UNNAMED_TIMER},
    core::{
        registry::Registry,
        scope::TimerGuard,
        sink::Sink,
        template::{Template, TemplateError},
    },
};
use std::time::Instant;
use thiserror::Error;

/// Misuse of a timer or a lookup of an unknown timer name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimerError {
    #[error("Timer '{name}' is already running. Use stop() before starting it again.")]
    AlreadyRunning { name: String },
    #[error("Timer '{name}' is not running. Use start() to start it.")]
    NotRunning { name: String },
    #[error("No timer named '{0}' is registered.")]
    NotFound(String),
    #[error("Filter strength must be at least 1, got {0}.")]
    InvalidFilterStrength(usize),
    #[error("Invalid display text: {0}")]
    Template(#[from] TemplateError),
}

/// Configuration of a `Timer`.
#[derive(Debug, Clone)]
pub struct TimerOptions {
    /// Key into the registry. Timers sharing a name share their history.
    pub name: Option<String>,
    /// Emit the rendered `text` through `logger` on every stop.
    pub log_on_stop: bool,
    /// Number of recent samples averaged. Only the first timer created for a name
    /// decides the window size.
    pub filter_strength: usize,
    /// Display template; `{0}` is the name, `{1}` the average in milliseconds.
    pub text: String,
    /// Where reports go. `None` silences the timer.
    pub logger: Option<Sink>,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            name: None,
            log_on_stop: false,
            filter_strength: DEFAULT_FILTER_STRENGTH,
            text: DEFAULT_TEXT.to_string(),
            logger: Some(Sink::stdout()),
        }
    }
}

impl TimerOptions {
    /// Default options for a timer called `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// A stopwatch bound to a registry.
#[derive(Debug)]
pub struct Timer {
    registry: Registry,
    options: TimerOptions,
    template: Template,
    started_at: Option<Instant>,
}

impl Timer {
    /// Builds a timer, registering its name in `registry` if it is not there yet.
    ///
    /// An existing entry keeps its original window size and samples. An empty
    /// name counts as no name.
    ///
    /// # Errors
    /// Returns `TimerError::InvalidFilterStrength` for a zero window and
    /// `TimerError::Template` for a malformed `text`.
    pub fn new(registry: &Registry, mut options: TimerOptions) -> Result<Self, TimerError> {
        options.name = options.name.filter(|name| !name.is_empty());
        if options.filter_strength == 0 {
            return Err(TimerError::InvalidFilterStrength(options.filter_strength));
        }
        let template = Template::parse(&options.text)?;

        if let Some(name) = &options.name {
            registry.ensure(name, options.filter_strength)?;
        }

        Ok(Self {
            registry: registry.clone(),
            options,
            template,
            started_at: None,
        })
    }

    /// An idle timer with the same configuration and registry.
    pub(crate) fn fresh(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            options: self.options.clone(),
            template: self.template.clone(),
            started_at: None,
        }
    }

    /// The timer's name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    /// The options this timer was built with.
    pub fn options(&self) -> &TimerOptions {
        &self.options
    }

    /// The registry this timer records into.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether `start` has been called without a matching `stop`.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    fn display_name(&self) -> &str {
        self.name().unwrap_or(UNNAMED_TIMER)
    }

    /// Starts a new measurement.
    ///
    /// # Errors
    /// Returns `TimerError::AlreadyRunning` if a measurement is in progress.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.started_at.is_some() {
            return Err(TimerError::AlreadyRunning {
                name: self.display_name().to_string(),
            });
        }
        self.started_at = Some(Instant::now());
        Ok(())
    }

    /// Stops the measurement and returns the moving average in milliseconds.
    ///
    /// For a named timer the elapsed time is pushed into the registry first and the
    /// average covers the whole window; an unnamed timer returns the elapsed time.
    ///
    /// # Errors
    /// Returns `TimerError::NotRunning` if `start` was not called.
    pub fn stop(&mut self) -> Result<f64, TimerError> {
        let started_at = self.started_at.ok_or_else(|| TimerError::NotRunning {
            name: self.display_name().to_string(),
        })?;
        let elapsed_ms = started_at.elapsed().as_secs_f64() * 1000.0;

        let average = match &self.options.name {
            Some(name) => self.registry.record(name, elapsed_ms)?,
            None => elapsed_ms,
        };
        self.started_at = None;

        if self.options.log_on_stop {
            if let Some(logger) = &self.options.logger {
                logger.emit(&self.template.render(self.display_name(), average));
            }
        }

        Ok(average)
    }

    /// Reports the moving average of the given timers, or of every registered
    /// timer when `timer_names` is `None`.
    ///
    /// The line is emitted through the logger when one is configured and is
    /// returned either way. Empty histories report `-1.0`.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` for an unknown name; nothing is emitted then.
    pub fn print(&self, timer_names: Option<&[&str]>) -> Result<String, TimerError> {
        let line = self.registry.report(timer_names)?;
        if let Some(logger) = &self.options.logger {
            logger.emit(&line);
        }
        Ok(line)
    }

    /// Clears the history of the given timers, or of every registered timer when
    /// `timer_names` is `None`. Window sizes are kept.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` for an unknown name; nothing is cleared then.
    pub fn reset(&self, timer_names: Option<&[&str]>) -> Result<(), TimerError> {
        self.registry.reset(timer_names)
    }

    /// Starts the timer and returns a guard that stops it when dropped.
    ///
    /// # Errors
    /// Returns `TimerError::AlreadyRunning` if a measurement is in progress.
    pub fn scope(&mut self) -> Result<TimerGuard<'_>, TimerError> {
        TimerGuard::begin(self)
    }

    /// Runs `f` inside a scope and returns its result. The timer is stopped on
    /// every exit path, including a panic inside `f`.
    ///
    /// # Errors
    /// Returns `TimerError::AlreadyRunning` if a measurement is in progress; `f`
    /// is not called then.
    pub fn measure<R, F>(&mut self, f: F) -> Result<R, TimerError>
    where
        F: FnOnce() -> R,
    {
        let _guard = self.scope()?;
        Ok(f())
    }
}
