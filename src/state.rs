// src/state.rs

use crate::core::registry::Registry;
use std::sync::OnceLock;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, created empty on first use.
///
/// Convenient when timers in unrelated modules should share history without
/// passing a registry around. Tests and libraries that want isolation should
/// build their own with `Registry::new()`.
pub fn global_registry() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(|| {
        log::debug!("Initialising the global timer registry");
        Registry::new()
    })
}
