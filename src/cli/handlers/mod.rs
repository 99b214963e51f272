// src/cli/handlers/mod.rs

// One module per CLI action.

pub mod bench;
pub mod config;
pub mod manifest;
