//! devlink-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the demo binary in `main.rs` share the same module tree.
//!
//! # What does devlink-client do? (for beginners)
//!
//! This crate is the client side of a remote-device story: the machine it
//! runs on wants to *find* the user's other devices and *send them a URI*
//! to open.  The heavy lifting — the cloud registry, the proximal radio
//! broadcasts, the authenticated transport to each device — lives behind
//! provider traits and is supplied by whoever hosts the SDK.
//!
//! What this crate owns:
//!
//! 1. The **discovery session**: subscribe to a provider with a filter,
//!    keep a sorted, duplicate-free view of the systems that match, and
//!    stream incremental `Added`/`Updated`/`Removed` events to subscribers.
//! 2. The **launch dispatcher**: resolve a connection to a chosen system
//!    and asynchronously ask its remote launcher to open a URI, reporting
//!    exactly one success-or-failure outcome per request.
//! 3. The **platform lifecycle**: explicit `initialize`/`resume`/`suspend`/
//!    `shutdown` calls the host application drives, including the one-time
//!    OAuth auth-code fetch on first run.

/// Application layer: use cases over the provider seams.
pub mod application;

/// Infrastructure layer: provider traits, simulated providers, platform
/// lifecycle, and config storage.
pub mod infrastructure;
