//! Typed discovery events.
//!
//! Discovery providers push these into a session; the session re-emits them
//! to its subscribers *after* applying the mutation, so a subscriber always
//! observes the registry in its post-mutation state.  The typed enum on an
//! mpsc channel replaces the anonymous listener-object-per-call pattern of
//! callback SDKs: any consumer can subscribe without the session knowing
//! who is listening.

use super::system::{RemoteSystem, SystemId};

/// An incremental change to the set of discoverable systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// A system became visible.
    Added(RemoteSystem),
    /// A visible system changed (typically a display-name rename).
    Updated(RemoteSystem),
    /// A system is no longer visible.
    Removed(SystemId),
}

impl DiscoveryEvent {
    /// The id of the system the event concerns.
    pub fn system_id(&self) -> &SystemId {
        match self {
            DiscoveryEvent::Added(system) | DiscoveryEvent::Updated(system) => &system.id,
            DiscoveryEvent::Removed(id) => id,
        }
    }
}
