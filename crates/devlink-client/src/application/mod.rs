//! Application layer use cases for the devlink client.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules) and the infrastructure (OS/network/storage).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "keep a
//!   sorted view of my devices up to date while I pick one").
//! - **Depend on abstractions** (traits) rather than concrete
//!   implementations, so the transport can be swapped without changing
//!   this code.
//! - **Contain no OS calls, no network I/O, no file system access.**
//!
//! # Sub-modules
//!
//! - **`discover_systems`** – Owns the filtered, incrementally updated
//!   registry of discoverable remote systems and streams its changes to
//!   subscribers.
//!
//! - **`launch_uri`** – Asynchronously asks a discovered system to open a
//!   URI and reports exactly one outcome per request.

pub mod discover_systems;
pub mod launch_uri;
