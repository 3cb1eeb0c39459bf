//! LaunchDispatcher: asynchronous remote URI launch.
//!
//! The dispatcher turns "open this URI on that system" into one async call
//! that resolves to exactly one [`LaunchOutcome`].  It depends only on the
//! [`ConnectionProvider`] and [`RemoteLauncherProvider`] traits; the real
//! transport is injected at construction time, which makes the use case
//! fully unit-testable.
//!
//! # Failure shape
//!
//! Every way a launch can go wrong is an outcome, not a panic and not a
//! swallowed error:
//!
//! - empty URI → `Failed("empty-uri")`, checked before any provider call;
//! - no live connection to the target → `Failed("no-connection")`, without
//!   invoking the remote launcher at all;
//! - remote side reports failure → `Failed(status)` with the opaque status
//!   it sent.
//!
//! URI *format* is deliberately not validated here — the remote system's
//! default-handler resolution is the authority on what it can open.
//!
//! # Concurrency
//!
//! Concurrent launches are independent: no dedup, no ordering, and
//! relaunching the same URI on the same system may overlap its own prior
//! call.  No retries are performed; retry policy belongs to the caller.
//! Stopping a discovery session never cancels a launch already in flight.

use std::sync::Arc;

use tracing::{info, warn};

use devlink_core::domain::launch::{REASON_EMPTY_URI, REASON_NO_CONNECTION};
use devlink_core::{LaunchOutcome, LaunchRequest, RemoteSystem};

use crate::infrastructure::providers::{ConnectionProvider, RemoteLauncherProvider};

/// Issues remote launch requests against discovered systems.
pub struct LaunchDispatcher {
    connections: Arc<dyn ConnectionProvider>,
    launcher: Arc<dyn RemoteLauncherProvider>,
}

impl LaunchDispatcher {
    pub fn new(
        connections: Arc<dyn ConnectionProvider>,
        launcher: Arc<dyn RemoteLauncherProvider>,
    ) -> Self {
        Self {
            connections,
            launcher,
        }
    }

    /// Asks `system` to open `uri`, resolving to exactly one outcome.
    pub async fn launch(&self, system: &RemoteSystem, uri: &str) -> LaunchOutcome {
        let request = LaunchRequest::new(system.id.clone(), uri);

        if request.uri.is_empty() {
            warn!(system = %system.id, "rejecting launch of empty uri");
            return LaunchOutcome::failed(REASON_EMPTY_URI);
        }

        let Some(ctx) = self.connections.connection(&request.system_id) else {
            warn!(system = %system.id, "no connection to target, failing fast");
            return LaunchOutcome::failed(REASON_NO_CONNECTION);
        };

        info!(system = %system.id, uri = %request.uri, "launching uri on {}", system.display_name);
        match self.launcher.launch_uri(&ctx, &request.uri).await {
            Ok(()) => LaunchOutcome::Success,
            Err(status) => {
                warn!(system = %system.id, %status, "remote launch failed");
                LaunchOutcome::Failed(status)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
