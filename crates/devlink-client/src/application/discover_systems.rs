//! DiscoverySession: the filtered, incrementally updated view of remote
//! systems.
//!
//! The session subscribes to a [`DiscoveryProvider`] with a
//! [`DiscoveryFilter`] and pumps the provider's events through the
//! [`SystemRegistry`], re-emitting each post-mutation event on a typed
//! subscriber channel.  Consumers therefore observe two things that always
//! agree: the event stream, and [`DiscoverySession::systems`] snapshots that
//! are sorted and duplicate-free at every point between events.
//!
//! # Lifecycle
//!
//! ```text
//! created (stopped) ──start(filter)──► running ──stop()──► stopped
//!                          ▲                                  │
//!                          └──────── start(new filter) ◄──────┘
//! ```
//!
//! - A session is created stopped; `start` begins emission and returns a
//!   [`SessionHandle`] for the run it started.
//! - `start` while running stops the prior run first: the filter defines
//!   the view, so replacing it invalidates everything seen so far.  All
//!   previously visible systems are dropped before any event from the new
//!   subscription is delivered.
//! - `stop` is idempotent; stopping a stopped session is a no-op and
//!   produces no events.  Stopping cancels the discovery subscription only;
//!   in-flight launches are unaffected.
//!
//! # Serialization
//!
//! Each run owns one pump task *and its own registry*, so event
//! applications are naturally serialized; the registry mutex only
//! arbitrates between the pump and snapshot readers.  The lock is never
//! held across an await: the mutation happens under the lock, the
//! subscriber send happens after it, so a subscriber woken by an event
//! reads the registry already in its post-mutation state.
//!
//! The per-run registry is what makes restart safe under load.  Aborting
//! a task only takes effect at its next pending await, so a pump busy
//! draining a deep backlog can outlive `stop()` by a few iterations.  It
//! keeps writing into the registry of the run that spawned it — an orphan
//! after restart — never into the fresh registry the new run reads from.
//! A per-run cancellation flag, set before the abort, additionally stops
//! a lingering pump from emitting stale events to subscribers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use devlink_core::{DiscoveryEvent, DiscoveryFilter, RemoteSystem, SystemRegistry};

use crate::infrastructure::providers::{DiscoveryProvider, ProviderError};

/// Capacity of the subscriber event channel.
const SUBSCRIBER_BUFFER: usize = 64;

/// Error type for discovery session operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The provider could not establish the subscription; the session
    /// remains stopped.  Surfaced once per `start` call.
    #[error("discovery unavailable: {0}")]
    Unavailable(#[from] ProviderError),
}

/// Identifies one `start`..`stop` run of a session.
///
/// A handle from a superseded run is inert: passing it to
/// [`DiscoverySession::stop_run`] is a no-op, so a stale handle can never
/// kill a newer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    run: u64,
}

/// A live run: the pump task, its cancellation flag, and the run counter
/// that made it.
struct ActiveRun {
    run: u64,
    pump: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

/// Owns the visible-systems registry and its subscriber channel.
pub struct DiscoverySession {
    provider: Arc<dyn DiscoveryProvider>,
    /// The *current run's* registry.  Replaced wholesale on every start,
    /// so a pump that outlives its run keeps writing into an orphan.
    registry: Arc<Mutex<SystemRegistry>>,
    subscriber_tx: mpsc::Sender<DiscoveryEvent>,
    active: Option<ActiveRun>,
    run_counter: u64,
}

impl DiscoverySession {
    /// Creates a stopped session and returns it together with the
    /// subscriber event receiver.
    pub fn new(provider: Arc<dyn DiscoveryProvider>) -> (Self, mpsc::Receiver<DiscoveryEvent>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let session = Self {
            provider,
            registry: Arc::new(Mutex::new(SystemRegistry::new())),
            subscriber_tx: tx,
            active: None,
            run_counter: 0,
        };
        (session, rx)
    }

    /// Starts (or restarts) discovery under `filter`.
    ///
    /// If a run is active it is stopped first, and the visible collection
    /// is replaced with an empty one before the new subscription is opened —
    /// no event from the new filter is delivered while systems from the old
    /// one are still visible.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Unavailable`] when the provider rejects
    /// the subscription; the session is left stopped and the fresh
    /// collection stays empty.
    pub fn start(&mut self, filter: DiscoveryFilter) -> Result<SessionHandle, DiscoveryError> {
        self.stop();
        // Fresh registry per run.  A pump from the previous run that has
        // not yet observed its abort keeps writing into the old Arc, which
        // nothing reads any more.
        self.registry = Arc::new(Mutex::new(SystemRegistry::new()));

        let events = self.provider.subscribe(filter.clone())?;

        self.run_counter += 1;
        let run = self.run_counter;
        info!(run, "discovery session starting");

        let registry = Arc::clone(&self.registry);
        let subscriber_tx = self.subscriber_tx.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let pump = tokio::spawn(pump_events(
            events,
            filter,
            registry,
            subscriber_tx,
            Arc::clone(&cancelled),
            run,
        ));

        self.active = Some(ActiveRun {
            run,
            pump,
            cancelled,
        });
        Ok(SessionHandle { run })
    }

    /// Stops the current run, if any.  Idempotent: a stopped session stays
    /// stopped and no event is produced.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            // The flag lands before the abort: a pump mid-iteration sees it
            // and stops emitting even though the abort itself only takes
            // effect at the pump's next pending await.
            active.cancelled.store(true, Ordering::Relaxed);
            // Aborting the pump drops the provider receiver, which is the
            // unsubscribe signal for the transport.
            active.pump.abort();
            info!(run = active.run, "discovery session stopped");
        }
    }

    /// Stops the run identified by `handle`; a handle from a superseded run
    /// is a no-op.
    pub fn stop_run(&mut self, handle: SessionHandle) {
        match &self.active {
            Some(active) if active.run == handle.run => self.stop(),
            _ => debug!(run = handle.run, "stop for superseded run ignored"),
        }
    }

    /// Whether a run is currently active.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Read-only snapshot of the visible systems, in display order.
    pub fn systems(&self) -> Vec<RemoteSystem> {
        self.registry.lock().expect("lock poisoned").snapshot()
    }
}

impl Drop for DiscoverySession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The per-run pump: applies provider events to the registry and forwards
/// the post-mutation events to subscribers.
async fn pump_events(
    mut events: mpsc::Receiver<DiscoveryEvent>,
    filter: DiscoveryFilter,
    registry: Arc<Mutex<SystemRegistry>>,
    subscriber_tx: mpsc::Sender<DiscoveryEvent>,
    cancelled: Arc<AtomicBool>,
    run: u64,
) {
    while let Some(event) = events.recv().await {
        // Under a deep backlog recv never pends, so the abort may not be
        // observed for many iterations; the flag is.
        if cancelled.load(Ordering::Relaxed) {
            debug!(run, "pump cancelled, exiting");
            break;
        }

        // Mutate under the lock, release it, then notify: subscribers must
        // only ever observe post-mutation state.
        let emitted = {
            let mut registry = registry.lock().expect("lock poisoned");
            apply_filtered(&mut registry, &filter, event)
        };

        if let Some(event) = emitted {
            if cancelled.load(Ordering::Relaxed) {
                debug!(run, "pump cancelled, dropping event");
                break;
            }
            if subscriber_tx.send(event).await.is_err() {
                // Subscriber dropped its receiver; nobody is watching.
                debug!(run, "subscriber channel closed, pump exiting");
                break;
            }
        }
    }
    debug!(run, "discovery pump finished");
}

/// Applies one event, enforcing the session filter even when the provider
/// already pre-filtered.
///
/// An `Added`/`Updated` for a system the filter rejects is dropped — unless
/// the system is currently visible (an update moved it out of the filter),
/// in which case it is removed and a `Removed` is emitted, keeping
/// "visible iff matching" true at every observation point.
fn apply_filtered(
    registry: &mut SystemRegistry,
    filter: &DiscoveryFilter,
    event: DiscoveryEvent,
) -> Option<DiscoveryEvent> {
    match event {
        DiscoveryEvent::Added(system) | DiscoveryEvent::Updated(system) => {
            if filter.matches(&system) {
                registry.apply(DiscoveryEvent::Added(system))
            } else if registry.get(&system.id).is_some() {
                warn!(id = %system.id, "update moved system outside the filter, removing");
                registry.apply(DiscoveryEvent::Removed(system.id))
            } else {
                None
            }
        }
        removed @ DiscoveryEvent::Removed(_) => registry.apply(removed),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
