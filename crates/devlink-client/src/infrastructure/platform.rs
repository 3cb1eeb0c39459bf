//! Process-wide platform lifecycle.
//!
//! Host applications drive an explicit `initialize` / `resume` / `suspend` /
//! `shutdown` lifecycle around SDK usage; there is no hidden global state
//! keyed to a UI framework.  The platform gates access to the discovery
//! session and launch dispatcher: both are handed out only while the
//! platform is `Ready`, which is how "initialization completed before
//! discovery may start" is enforced at compile-visible seams instead of by
//! convention.
//!
//! # First-run auth (for beginners)
//!
//! The transport needs an OAuth credential for cloud discovery.  On first
//! run there is no saved refresh token, so initialization builds the
//! authorize URL from the app's registered client id and asks the
//! [`AuthProvider`] to drive the interactive flow (a browser window whose
//! redirect is captured).  The captured auth code is kept as the session
//! credential; exchanging and refreshing tokens against the identity
//! service is the transport SDK's business, not ours.  On later runs a
//! saved refresh token short-circuits the whole flow and the auth provider
//! is never called.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use devlink_core::DiscoveryEvent;

use crate::application::discover_systems::DiscoverySession;
use crate::application::launch_uri::LaunchDispatcher;
use crate::infrastructure::providers::{
    AuthProvider, ConnectionProvider, DiscoveryProvider, ProviderError, RemoteLauncherProvider,
};
use crate::infrastructure::storage::config::PlatformConfig;

/// Error type for platform lifecycle operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// A session or dispatcher was requested while the platform was not
    /// `Ready`.
    #[error("platform is {state:?}, not ready")]
    NotReady { state: PlatformState },
    /// The interactive auth flow failed during initialization.
    #[error("platform initialization failed: {0}")]
    Auth(#[from] ProviderError),
}

/// Lifecycle state of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformState {
    /// Initialized and usable.
    Ready,
    /// Host is backgrounded; new sessions are refused until `resume`.
    Suspended,
    /// Terminal. `resume` does not revive a shut-down platform.
    Shutdown,
}

/// The transport implementations the platform hands to use cases.
#[derive(Clone)]
pub struct PlatformProviders {
    pub discovery: Arc<dyn DiscoveryProvider>,
    pub connections: Arc<dyn ConnectionProvider>,
    pub launcher: Arc<dyn RemoteLauncherProvider>,
}

/// The initialized platform.
pub struct Platform {
    state: Mutex<PlatformState>,
    providers: PlatformProviders,
    /// Auth code captured on first run, or `None` when a saved refresh
    /// token made the interactive flow unnecessary.
    auth_code: Option<String>,
}

impl Platform {
    /// Initializes the platform, driving the interactive auth flow when no
    /// refresh token is saved in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Auth`] when the auth provider fails; the
    /// platform is not created and nothing needs tearing down.
    pub async fn initialize(
        config: &PlatformConfig,
        auth: Arc<dyn AuthProvider>,
        providers: PlatformProviders,
    ) -> Result<Self, PlatformError> {
        let auth_code = if config.refresh_token.is_some() {
            info!("using previously saved refresh token");
            None
        } else {
            let oauth_url = config.authorize_url();
            info!(%oauth_url, "no saved token, driving interactive auth flow");
            let code = auth.fetch_auth_code(&oauth_url).await?;
            info!("auth code captured, platform initialization complete");
            Some(code)
        };

        Ok(Self {
            state: Mutex::new(PlatformState::Ready),
            providers,
            auth_code,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlatformState {
        *self.state.lock().expect("lock poisoned")
    }

    /// Returns to `Ready` from `Suspended`.  A shut-down platform stays
    /// shut down.
    pub fn resume(&self) {
        let mut state = self.state.lock().expect("lock poisoned");
        match *state {
            PlatformState::Suspended => {
                *state = PlatformState::Ready;
                info!("platform resumed");
            }
            PlatformState::Ready => {}
            PlatformState::Shutdown => warn!("resume ignored, platform is shut down"),
        }
    }

    /// Moves a `Ready` platform to `Suspended`.
    pub fn suspend(&self) {
        let mut state = self.state.lock().expect("lock poisoned");
        if *state == PlatformState::Ready {
            *state = PlatformState::Suspended;
            info!("platform suspended");
        }
    }

    /// Terminal shutdown.
    pub fn shutdown(&self) {
        *self.state.lock().expect("lock poisoned") = PlatformState::Shutdown;
        info!("platform shut down");
    }

    /// The auth code captured during initialization, if the interactive
    /// flow ran.
    pub fn auth_code(&self) -> Option<&str> {
        self.auth_code.as_deref()
    }

    /// Creates a stopped [`DiscoverySession`] over the platform's discovery
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NotReady`] unless the platform is `Ready`.
    pub fn discovery_session(
        &self,
    ) -> Result<(DiscoverySession, mpsc::Receiver<DiscoveryEvent>), PlatformError> {
        self.require_ready()?;
        Ok(DiscoverySession::new(Arc::clone(&self.providers.discovery)))
    }

    /// Creates a [`LaunchDispatcher`] over the platform's connection and
    /// launcher providers.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NotReady`] unless the platform is `Ready`.
    pub fn launch_dispatcher(&self) -> Result<LaunchDispatcher, PlatformError> {
        self.require_ready()?;
        Ok(LaunchDispatcher::new(
            Arc::clone(&self.providers.connections),
            Arc::clone(&self.providers.launcher),
        ))
    }

    fn require_ready(&self) -> Result<(), PlatformError> {
        let state = self.state();
        if state == PlatformState::Ready {
            Ok(())
        } else {
            Err(PlatformError::NotReady { state })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
