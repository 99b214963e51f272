//! # Timer Registry
//!
//! Holds the bounded sample history of every named timer. A `Registry` is a cheap,
//! clonable handle: clones share the same underlying map, so every `Timer` built
//! from the same registry (or a clone of it) reads and appends to the same history.
//!
//! Entries are created at most once per name. The capacity given on creation is
//! final; later requests for the same name reuse the existing entry untouched.

use crate::constants::EMPTY_AVERAGE;
use crate::core::timer::TimerError;
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The moving-average window of a single named timer.
#[derive(Debug, Clone)]
struct SampleWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl SampleWindow {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            // `capacity` only bounds eviction; the buffer grows with the samples.
            samples: VecDeque::new(),
        }
    }

    /// Appends a sample, evicting the oldest one when the window is full.
    fn push(&mut self, sample: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Names in the order they were first registered.
    order: Vec<String>,
    windows: HashMap<String, SampleWindow>,
}

impl RegistryInner {
    fn window(&self, name: &str) -> Result<&SampleWindow, TimerError> {
        self.windows
            .get(name)
            .ok_or_else(|| TimerError::NotFound(name.to_string()))
    }

    /// Resolves an optional selection to an owned list of names, failing on the
    /// first unknown one. `None` selects every registered name.
    fn select(&self, names: Option<&[&str]>) -> Result<Vec<String>, TimerError> {
        match names {
            None => Ok(self.order.clone()),
            Some(names) => names
                .iter()
                .map(|name| self.window(name).map(|_| (*name).to_string()))
                .collect(),
        }
    }
}

/// Shared store of per-name sample windows.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl Registry {
    /// Creates a fresh, empty registry, isolated from every other one.
    pub fn new() -> Self {
        Self::default()
    }

    // The guarded data is never left half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ensures an entry exists for `name`, creating it with `capacity` if needed.
    ///
    /// Returns the effective capacity of the entry, which is the capacity of the
    /// first registration for that name.
    ///
    /// # Errors
    /// Returns `TimerError::InvalidFilterStrength` if `capacity` is zero.
    pub fn ensure(&self, name: &str, capacity: usize) -> Result<usize, TimerError> {
        if capacity == 0 {
            return Err(TimerError::InvalidFilterStrength(capacity));
        }

        let mut inner = self.lock();
        if let Some(window) = inner.windows.get(name) {
            if window.capacity != capacity {
                debug!(
                    "Timer '{}' already registered with a window of {}; ignoring requested {}",
                    name, window.capacity, capacity
                );
            }
            return Ok(window.capacity);
        }

        debug!("Registering timer '{}' with a window of {}", name, capacity);
        inner.order.push(name.to_string());
        inner
            .windows
            .insert(name.to_string(), SampleWindow::new(capacity));
        Ok(capacity)
    }

    /// Appends a sample (in milliseconds) to `name` and returns the new average.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` if `name` was never registered.
    pub fn record(&self, name: &str, sample_ms: f64) -> Result<f64, TimerError> {
        let mut inner = self.lock();
        let window = inner
            .windows
            .get_mut(name)
            .ok_or_else(|| TimerError::NotFound(name.to_string()))?;
        window.push(sample_ms);
        Ok(window.average().unwrap_or(sample_ms))
    }

    /// The current average of `name`, or `None` if its history is empty.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` if `name` was never registered.
    pub fn average(&self, name: &str) -> Result<Option<f64>, TimerError> {
        Ok(self.lock().window(name)?.average())
    }

    /// A snapshot of the samples currently held for `name`, oldest first.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` if `name` was never registered.
    pub fn samples(&self, name: &str) -> Result<Vec<f64>, TimerError> {
        Ok(self.lock().window(name)?.samples.iter().copied().collect())
    }

    /// The fixed window size of `name`.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` if `name` was never registered.
    pub fn capacity(&self, name: &str) -> Result<usize, TimerError> {
        Ok(self.lock().window(name)?.capacity)
    }

    /// Whether an entry exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().windows.contains_key(name)
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    /// The number of registered names.
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Whether no timer has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    /// Builds the one-line report of `'name': average ` fragments.
    ///
    /// Averages use one decimal place; an empty history reports `-1.0`.
    /// `None` reports every registered name in registration order.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` for the first unknown name.
    pub fn report(&self, names: Option<&[&str]>) -> Result<String, TimerError> {
        let inner = self.lock();
        let selected = inner.select(names)?;

        let mut line = String::new();
        for name in &selected {
            let average = inner.window(name)?.average().unwrap_or(EMPTY_AVERAGE);
            // Writing into a String cannot fail.
            let _ = write!(line, "'{}': {:.1} ", name, average);
        }
        Ok(line)
    }

    /// Clears the history of the given names, keeping their capacity.
    /// `None` clears every registered name.
    ///
    /// All names are checked before anything is cleared.
    ///
    /// # Errors
    /// Returns `TimerError::NotFound` for the first unknown name.
    pub fn reset(&self, names: Option<&[&str]>) -> Result<(), TimerError> {
        let mut inner = self.lock();
        let selected = inner.select(names)?;

        for name in &selected {
            if let Some(window) = inner.windows.get_mut(name) {
                window.samples.clear();
            }
        }
        debug!("Reset {} timer(s)", selected.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_evicts_oldest_sample() {
        let registry = Registry::new();
        registry.ensure("db", 3).unwrap();

        for sample in [10.0, 20.0, 30.0, 40.0] {
            registry.record("db", sample).unwrap();
        }

        assert_eq!(registry.samples("db").unwrap(), vec![20.0, 30.0, 40.0]);
        assert_eq!(registry.average("db").unwrap(), Some(30.0));
    }

    #[test]
    fn test_record_returns_running_average() {
        let registry = Registry::new();
        registry.ensure("io", 2).unwrap();

        assert_eq!(registry.record("io", 4.0).unwrap(), 4.0);
        assert_eq!(registry.record("io", 8.0).unwrap(), 6.0);
        assert_eq!(registry.record("io", 12.0).unwrap(), 10.0);
    }

    #[test]
    fn test_first_registration_fixes_capacity() {
        let registry = Registry::new();
        assert_eq!(registry.ensure("parse", 2).unwrap(), 2);
        assert_eq!(registry.ensure("parse", 10).unwrap(), 2);
        assert_eq!(registry.capacity("parse").unwrap(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ensure_keeps_existing_samples() {
        let registry = Registry::new();
        registry.ensure("render", 4).unwrap();
        registry.record("render", 1.5).unwrap();

        registry.ensure("render", 4).unwrap();

        assert_eq!(registry.samples("render").unwrap(), vec![1.5]);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let registry = Registry::new();
        let result = registry.ensure("bad", 0);
        assert!(matches!(result, Err(TimerError::InvalidFilterStrength(0))));
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let registry = Registry::new();
        assert_eq!(registry.ensure("big", usize::MAX).unwrap(), usize::MAX);
        assert_eq!(registry.ensure("large", 1usize << 40).unwrap(), 1usize << 40);

        registry.record("big", 2.0).unwrap();
        registry.record("large", 4.0).unwrap();

        assert_eq!(registry.samples("big").unwrap(), vec![2.0]);
        assert_eq!(registry.average("large").unwrap(), Some(4.0));
    }

    #[test]
    fn test_report_in_registration_order() {
        let registry = Registry::new();
        registry.ensure("zeta", 1).unwrap();
        registry.ensure("alpha", 1).unwrap();
        registry.record("zeta", 2.5).unwrap();
        registry.record("alpha", 7.0).unwrap();

        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
        assert_eq!(registry.report(None).unwrap(), "'zeta': 2.5 'alpha': 7.0 ");
    }

    #[test]
    fn test_report_empty_history_uses_sentinel() {
        let registry = Registry::new();
        registry.ensure("idle", 5).unwrap();
        assert_eq!(registry.report(Some(&["idle"])).unwrap(), "'idle': -1.0 ");
    }

    #[test]
    fn test_report_unknown_name_fails() {
        let registry = Registry::new();
        registry.ensure("known", 1).unwrap();
        let result = registry.report(Some(&["known", "missing"]));
        assert!(matches!(result, Err(TimerError::NotFound(name)) if name == "missing"));
    }

    #[test]
    fn test_reset_preserves_capacity() {
        let registry = Registry::new();
        registry.ensure("db", 3).unwrap();
        for sample in [1.0, 2.0, 3.0] {
            registry.record("db", sample).unwrap();
        }

        registry.reset(Some(&["db"])).unwrap();
        assert!(registry.samples("db").unwrap().is_empty());
        assert_eq!(registry.average("db").unwrap(), None);

        for sample in [4.0, 5.0, 6.0, 7.0] {
            registry.record("db", sample).unwrap();
        }
        assert_eq!(registry.samples("db").unwrap(), vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_reset_is_all_or_nothing() {
        let registry = Registry::new();
        registry.ensure("a", 2).unwrap();
        registry.record("a", 1.0).unwrap();

        let result = registry.reset(Some(&["a", "unknown"]));

        assert!(matches!(result, Err(TimerError::NotFound(name)) if name == "unknown"));
        assert_eq!(registry.samples("a").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_reset_all_names() {
        let registry = Registry::new();
        registry.ensure("a", 2).unwrap();
        registry.ensure("b", 2).unwrap();
        registry.record("a", 1.0).unwrap();
        registry.record("b", 2.0).unwrap();

        registry.reset(None).unwrap();

        assert_eq!(registry.report(None).unwrap(), "'a': -1.0 'b': -1.0 ");
    }

    #[test]
    fn test_clones_share_state() {
        let registry = Registry::new();
        let clone = registry.clone();
        registry.ensure("shared", 2).unwrap();
        clone.record("shared", 3.0).unwrap();
        assert_eq!(registry.average("shared").unwrap(), Some(3.0));
    }

    #[test]
    fn test_unknown_name_lookups_fail() {
        let registry = Registry::new();
        assert!(matches!(registry.record("x", 1.0), Err(TimerError::NotFound(_))));
        assert!(matches!(registry.average("x"), Err(TimerError::NotFound(_))));
        assert!(matches!(registry.capacity("x"), Err(TimerError::NotFound(_))));
        assert!(registry.is_empty());
    }
}
