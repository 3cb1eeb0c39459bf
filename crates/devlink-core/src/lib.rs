//! # devlink-core
//!
//! Shared domain library for devlink, a client-side toolkit for discovering
//! remote systems and launching URIs on them.
//!
//! This crate is used by the client SDK and any host application built on it.
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! devlink talks to a fleet of *remote systems*: other devices belonging to
//! the same user that can be asked to open a URI in their default handler
//! (think "send this video to my desktop").  Systems are found through a
//! *discovery* transport — either a cloud registry the devices register with,
//! or a proximal broadcast on the local network — and addressed through a
//! *connection* established by the transport layer.
//!
//! This crate (`devlink-core`) is the shared foundation.  It defines:
//!
//! - **`domain::system`** – The `RemoteSystem` entity and its identity,
//!   kind, and discovery-type classifications.
//!
//! - **`domain::filter`** – The `DiscoveryFilter` value object that decides
//!   which systems a discovery session considers visible.
//!
//! - **`domain::registry`** – The `SystemRegistry`: the ordered, duplicate-free
//!   collection of currently visible systems, updated incrementally by
//!   discovery events.
//!
//! - **`domain::events`** / **`domain::launch`** – The typed event and
//!   outcome vocabulary shared between providers, sessions, and callers.

// Declare the top-level module.  Rust will look for it in a subdirectory
// with the same name (src/domain/mod.rs).
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `devlink_core::RemoteSystem` instead of `devlink_core::domain::system::RemoteSystem`.
pub use domain::events::DiscoveryEvent;
pub use domain::filter::DiscoveryFilter;
pub use domain::launch::{LaunchOutcome, LaunchRequest};
pub use domain::registry::SystemRegistry;
pub use domain::system::{DiscoveryType, ParseEnumError, RemoteSystem, SystemId, SystemKind};
