// src/core/mod.rs

pub mod config;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod scope;
pub mod sink;
pub mod template;
pub mod timer;
pub mod wrap;
