//! Launch request/outcome vocabulary.
//!
//! A *launch* asks a remote system to open a URI in whatever application
//! that system considers the default handler.  The request resolves
//! asynchronously to exactly one outcome; the failure reason is an opaque
//! status surfaced by the remote launcher and is not interpreted here.

use std::fmt;

use super::system::SystemId;

/// Sentinel failure reason when no connection to the target exists at
/// launch time.  The dispatcher fails fast with this reason instead of
/// invoking the remote launcher.
pub const REASON_NO_CONNECTION: &str = "no-connection";

/// Sentinel failure reason for an empty URI, rejected before any provider
/// is consulted.
pub const REASON_EMPTY_URI: &str = "empty-uri";

/// Result of a remote launch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The remote system accepted and dispatched the URI.
    Success,
    /// The launch did not happen; the reason is an opaque status string.
    Failed(String),
}

impl LaunchOutcome {
    /// Shorthand for a failed outcome.
    pub fn failed(reason: impl Into<String>) -> Self {
        LaunchOutcome::Failed(reason.into())
    }

    /// Returns `true` for [`LaunchOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, LaunchOutcome::Success)
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchOutcome::Success => f.write_str("launch succeeded"),
            LaunchOutcome::Failed(reason) => write!(f, "launch failed with status {reason}"),
        }
    }
}

/// A target/URI pair, as accepted by the dispatcher.
///
/// Kept as a plain value object so logs and demo flows can speak about a
/// launch without holding the full [`super::system::RemoteSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// The system the URI should open on.
    pub system_id: SystemId,
    /// The URI to open.  Format is the remote side's problem; only
    /// non-emptiness is checked locally.
    pub uri: String,
}

impl LaunchRequest {
    pub fn new(system_id: impl Into<SystemId>, uri: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            uri: uri.into(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
