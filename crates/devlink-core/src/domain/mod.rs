//! Domain entities for devlink.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from OS APIs, network libraries, database drivers, or
//!   UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//! - Defines the data types and operations that make the system uniquely what
//!   it is: in this case, the concept of a filtered, incrementally updated
//!   view of the user's remote systems.
//!
//! Code in outer layers (infrastructure, application, UI) depends on the
//! domain, but the domain never depends on them.  This makes the domain easy
//! to unit-test in isolation.

/// Typed discovery events exchanged between providers, sessions, and
/// subscribers.
pub mod events;

/// The `DiscoveryFilter` value object.
pub mod filter;

/// Launch request/outcome vocabulary.
pub mod launch;

/// The sorted, duplicate-free registry of visible systems — the core domain
/// concept.  See [`registry::SystemRegistry`] for the main type.
pub mod registry;

/// The `RemoteSystem` entity and its classifications.
pub mod system;
