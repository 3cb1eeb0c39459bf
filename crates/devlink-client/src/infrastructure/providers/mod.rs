//! Provider traits: the seams between the devlink core and the transport SDK.
//!
//! The real engineering of remote-system discovery — cloud registry queries,
//! proximal radio listeners, pairing, token refresh, the wire protocol to a
//! target device — is owned by an external transport layer.  This module
//! declares the four capabilities the core consumes from it:
//!
//! - [`DiscoveryProvider`] – a filtered stream of add/update/remove events.
//! - [`ConnectionProvider`] – established transport state to a given system.
//! - [`RemoteLauncherProvider`] – the wire-level "open this URI" RPC.
//! - [`AuthProvider`] – the out-of-band interactive auth-code flow driven
//!   once by platform initialization.
//!
//! # Unsubscribing by dropping (for beginners)
//!
//! `DiscoveryProvider::subscribe` returns the receiving half of an mpsc
//! channel.  There is no explicit `unsubscribe` call: when the session drops
//! the receiver, the provider's next send fails and it tears the
//! subscription down.  This is the standard Tokio idiom for cancelling a
//! producer — channel closure *is* the cancellation signal.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use devlink_core::{DiscoveryEvent, DiscoveryFilter, SystemId};

pub mod mock;

/// Error type for provider operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The discovery transport could not establish a subscription.
    #[error("discovery transport unavailable: {0}")]
    Unavailable(String),
    /// The interactive auth flow did not produce an auth code.
    #[error("auth flow failed: {0}")]
    AuthFailed(String),
}

/// Established transport state to a single remote system.
///
/// Opaque to the core: the token is whatever the transport needs to route a
/// call; the core only threads it from [`ConnectionProvider`] to
/// [`RemoteLauncherProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    /// The system this connection reaches.
    pub system_id: SystemId,
    /// Transport-private routing token.
    pub transport_token: String,
}

/// Source of discovery events for systems matching a filter.
///
/// A well-behaved provider pre-filters its stream, but the session enforces
/// the filter again on every event; the provider is trusted for liveness,
/// not for correctness of the visible set.
#[cfg_attr(test, mockall::automock)]
pub trait DiscoveryProvider: Send + Sync {
    /// Opens a subscription for systems matching `filter`.
    ///
    /// Events arrive on the returned channel until the receiver is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] when the transport cannot be
    /// reached; the caller's session stays stopped.
    fn subscribe(
        &self,
        filter: DiscoveryFilter,
    ) -> Result<mpsc::Receiver<DiscoveryEvent>, ProviderError>;
}

/// Lookup of established connections by system id.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionProvider: Send + Sync {
    /// Returns the live connection to `id`, or `None` when the system is
    /// not currently reachable.
    fn connection(&self, id: &SystemId) -> Option<ConnectionContext>;
}

/// The wire-level remote launch call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteLauncherProvider: Send + Sync {
    /// Asks the system behind `ctx` to open `uri` in its default handler.
    ///
    /// # Errors
    ///
    /// `Err` carries the opaque status string reported by the remote side.
    async fn launch_uri(&self, ctx: &ConnectionContext, uri: &str) -> Result<(), String>;
}

/// Interactive auth-code acquisition (browser / redirect capture).
///
/// Consumed exactly once per fresh install by platform initialization;
/// never called when a saved refresh token exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Drives the out-of-band flow at `oauth_url` and returns the captured
    /// auth code.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::AuthFailed`] when the user cancels or the
    /// flow errors out.
    async fn fetch_auth_code(&self, oauth_url: &str) -> Result<String, ProviderError>;
}
