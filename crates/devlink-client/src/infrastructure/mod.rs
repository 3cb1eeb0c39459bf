//! Infrastructure layer for the devlink client.
//!
//! Everything here either *is* an external-world seam (the provider traits,
//! the config files) or stands in for one (the simulated providers used by
//! tests and the demo binary).  Application-layer code depends on the
//! traits declared in [`providers`], never on a concrete transport.

/// Process-wide platform lifecycle.
pub mod platform;

/// Provider traits and the in-memory implementations that back tests and
/// the demo binary.
pub mod providers;

/// TOML configuration persistence.
pub mod storage;
