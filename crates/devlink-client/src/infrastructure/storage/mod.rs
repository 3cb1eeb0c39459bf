//! Configuration persistence.

/// TOML-based application configuration.
pub mod config;
