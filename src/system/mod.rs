//! # System Interaction Layer
//!
//! The boundary between timekeep and the operating system. `executor` spawns the
//! external commands that `timekeep bench` measures.

pub mod executor;
