//! # Function Wrapping
//!
//! `wrap` turns a function into a timed callable. Every call builds a fresh, idle
//! timer from the stored options, so recursive calls or calls from several threads
//! never collide on a single in-progress measurement. Because timers with the same
//! name share one registry entry, the moving average still spans every call.
//!
//! Arguments are passed as a single value; use a tuple for several.

use crate::core::{
    registry::Registry,
    timer::{Timer, TimerError, TimerOptions},
};
use scopeguard::guard;

/// A function instrumented with a timer.
#[derive(Debug)]
pub struct Timed<F> {
    prototype: Timer,
    func: F,
}

/// Wraps `func` so that each call is timed with `options`.
///
/// The timer name (if any) is registered immediately, with `options.filter_strength`
/// as its window unless the name already exists.
///
/// # Errors
/// Returns the construction errors of `Timer::new`.
pub fn wrap<F>(registry: &Registry, options: TimerOptions, func: F) -> Result<Timed<F>, TimerError> {
    Ok(Timed {
        prototype: Timer::new(registry, options)?,
        func,
    })
}

impl<F> Timed<F> {
    /// An idle timer with the wrapper's configuration, useful for `print`/`reset`.
    pub fn timer(&self) -> &Timer {
        &self.prototype
    }

    /// Unwraps the original function.
    pub fn into_inner(self) -> F {
        self.func
    }

    fn started(&self) -> Result<Timer, TimerError> {
        let mut timer = self.prototype.fresh();
        timer.start()?;
        Ok(timer)
    }

    /// Calls the wrapped function with `args` and returns its result.
    ///
    /// The measurement is recorded even if the function panics.
    ///
    /// # Errors
    /// Only fails if the timer cannot be started, which a fresh timer never does.
    pub fn call<A, R>(&self, args: A) -> Result<R, TimerError>
    where
        F: Fn(A) -> R,
    {
        let _running = guard(self.started()?, |mut timer| {
            let _ = timer.stop();
        });
        Ok((self.func)(args))
    }

    /// Like `call`, for functions that need mutable access to their state.
    ///
    /// # Errors
    /// Only fails if the timer cannot be started, which a fresh timer never does.
    pub fn call_mut<A, R>(&mut self, args: A) -> Result<R, TimerError>
    where
        F: FnMut(A) -> R,
    {
        let _running = guard(self.started()?, |mut timer| {
            let _ = timer.stop();
        });
        Ok((self.func)(args))
    }
}
