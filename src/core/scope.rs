// src/core/scope.rs

use crate::core::timer::{Timer, TimerError};

/// A running measurement tied to a lexical scope.
///
/// Created by `Timer::scope`. When the guard is dropped (normal exit, early `?`
/// return or unwinding panic) the timer is stopped and the average discarded.
/// Call `finish` to stop explicitly and keep the average.
#[must_use = "the timer stops as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TimerGuard<'a> {
    timer: &'a mut Timer,
    finished: bool,
}

impl<'a> TimerGuard<'a> {
    pub(crate) fn begin(timer: &'a mut Timer) -> Result<Self, TimerError> {
        timer.start()?;
        Ok(Self {
            timer,
            finished: false,
        })
    }

    /// The timer being measured.
    pub fn timer(&self) -> &Timer {
        self.timer
    }

    /// Stops the timer now and returns the moving average in milliseconds.
    ///
    /// # Errors
    /// Propagates the error of `Timer::stop`.
    pub fn finish(mut self) -> Result<f64, TimerError> {
        self.finished = true;
        self.timer.stop()
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.timer.stop() {
            log::debug!("Scoped timer could not be stopped: {}", e);
        }
    }
}
