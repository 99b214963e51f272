//! Named stopwatch timers with moving-average reporting, and a directory
//! manifest helper for packaging.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod system;

pub use crate::core::registry::Registry;
pub use crate::core::scope::TimerGuard;
pub use crate::core::sink::Sink;
pub use crate::core::timer::{Timer, TimerError, TimerOptions};
pub use crate::core::wrap::{Timed, wrap};
