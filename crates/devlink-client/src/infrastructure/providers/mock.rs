//! In-memory provider implementations for tests and the demo binary.
//!
//! These stand in for the external transport SDK: the discovery provider
//! replays scripted events into live subscriptions, the connection provider
//! answers from a fixed reachability set, and the launcher records every
//! call it receives.  None of them touch the network.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use devlink_core::{DiscoveryEvent, DiscoveryFilter, RemoteSystem, SystemId};

use super::{
    AuthProvider, ConnectionContext, ConnectionProvider, DiscoveryProvider, ProviderError,
    RemoteLauncherProvider,
};

/// Capacity of each simulated subscription channel.
const SUBSCRIPTION_BUFFER: usize = 64;

// ── Discovery ─────────────────────────────────────────────────────────────────

/// One live subscription held by the simulated provider.
struct Subscription {
    tx: mpsc::Sender<DiscoveryEvent>,
    filter: DiscoveryFilter,
}

/// A scriptable [`DiscoveryProvider`].
///
/// Seeded systems are announced as `Added` on every new subscription (the
/// way a cloud registry replays its current state); further events are
/// injected with [`emit`](Self::emit).  Like a real transport the provider
/// pre-filters `Added`/`Updated` against each subscription's filter;
/// [`emit_raw`](Self::emit_raw) bypasses that to exercise the session's own
/// enforcement.
#[derive(Default)]
pub struct SimulatedDiscoveryProvider {
    seeds: Mutex<Vec<RemoteSystem>>,
    subscriptions: Mutex<Vec<Subscription>>,
    fail_next: Mutex<Option<String>>,
}

impl SimulatedDiscoveryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Systems replayed as `Added` to every future subscription.
    pub fn seed(&self, systems: impl IntoIterator<Item = RemoteSystem>) {
        self.seeds.lock().expect("lock poisoned").extend(systems);
    }

    /// Makes the next `subscribe` call fail with `reason`.
    pub fn fail_next_subscribe(&self, reason: impl Into<String>) {
        *self.fail_next.lock().expect("lock poisoned") = Some(reason.into());
    }

    /// Injects an event into every live subscription whose filter admits it
    /// (`Removed` is always forwarded — the provider cannot know whether
    /// the receiver still shows the system).
    pub fn emit(&self, event: DiscoveryEvent) {
        self.fan_out(event, true);
    }

    /// Injects an event into every live subscription *without* pre-filtering,
    /// as a sloppy transport would.
    pub fn emit_raw(&self, event: DiscoveryEvent) {
        self.fan_out(event, false);
    }

    fn fan_out(&self, event: DiscoveryEvent, pre_filter: bool) {
        let mut subs = self.subscriptions.lock().expect("lock poisoned");
        // Dropped receivers are unsubscriptions: prune as we go.  A full
        // buffer is not — the subscriber is merely behind, so the event is
        // dropped and the subscription kept.
        subs.retain(|sub| {
            let admit = !pre_filter
                || match &event {
                    DiscoveryEvent::Added(system) | DiscoveryEvent::Updated(system) => {
                        sub.filter.matches(system)
                    }
                    DiscoveryEvent::Removed(_) => true,
                };
            if admit {
                if let Err(mpsc::error::TrySendError::Full(event)) = sub.tx.try_send(event.clone())
                {
                    debug!(?event, "subscription buffer full, dropping event");
                }
            }
            !sub.tx.is_closed()
        });
    }

    /// Number of subscriptions still holding an open receiver.
    pub fn live_subscriptions(&self) -> usize {
        let mut subs = self.subscriptions.lock().expect("lock poisoned");
        subs.retain(|sub| !sub.tx.is_closed());
        subs.len()
    }
}

impl DiscoveryProvider for SimulatedDiscoveryProvider {
    fn subscribe(
        &self,
        filter: DiscoveryFilter,
    ) -> Result<mpsc::Receiver<DiscoveryEvent>, ProviderError> {
        if let Some(reason) = self.fail_next.lock().expect("lock poisoned").take() {
            return Err(ProviderError::Unavailable(reason));
        }

        // Replay current registry state to the new subscriber.  The channel
        // is sized to hold the whole replay so a seed set larger than the
        // steady-state buffer still fits.
        let matching: Vec<RemoteSystem> = self
            .seeds
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|system| filter.matches(system))
            .cloned()
            .collect();
        let (tx, rx) = mpsc::channel(matching.len().max(SUBSCRIPTION_BUFFER));
        for system in matching {
            tx.try_send(DiscoveryEvent::Added(system))
                .expect("channel sized to fit the replay");
        }

        debug!("simulated discovery subscription opened");
        self.subscriptions
            .lock()
            .expect("lock poisoned")
            .push(Subscription { tx, filter });
        Ok(rx)
    }
}

// ── Connections ───────────────────────────────────────────────────────────────

/// A [`ConnectionProvider`] with a fixed reachability set.
#[derive(Default)]
pub struct StaticConnectionProvider {
    reachable: Mutex<HashSet<SystemId>>,
}

impl StaticConnectionProvider {
    pub fn new(reachable: impl IntoIterator<Item = SystemId>) -> Self {
        Self {
            reachable: Mutex::new(reachable.into_iter().collect()),
        }
    }

    /// Marks `id` as reachable.
    pub fn connect(&self, id: SystemId) {
        self.reachable.lock().expect("lock poisoned").insert(id);
    }

    /// Marks `id` as unreachable.
    pub fn disconnect(&self, id: &SystemId) {
        self.reachable.lock().expect("lock poisoned").remove(id);
    }
}

impl ConnectionProvider for StaticConnectionProvider {
    fn connection(&self, id: &SystemId) -> Option<ConnectionContext> {
        let reachable = self.reachable.lock().expect("lock poisoned");
        reachable.contains(id).then(|| ConnectionContext {
            system_id: id.clone(),
            transport_token: format!("sim:{id}"),
        })
    }
}

// ── Remote launcher ───────────────────────────────────────────────────────────

/// A [`RemoteLauncherProvider`] that records every call.
///
/// Outcomes are scripted per URI; unscripted URIs succeed.  An optional
/// artificial latency lets tests hold a launch in flight across other
/// lifecycle events.
#[derive(Default)]
pub struct RecordingLauncher {
    calls: Mutex<Vec<(SystemId, String)>>,
    failures: Mutex<HashMap<String, String>>,
    latency: Mutex<Option<Duration>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `uri` to fail with `reason`.
    pub fn fail_uri(&self, uri: impl Into<String>, reason: impl Into<String>) {
        self.failures
            .lock()
            .expect("lock poisoned")
            .insert(uri.into(), reason.into());
    }

    /// Adds an artificial delay before every completion.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().expect("lock poisoned") = Some(latency);
    }

    /// Every `(system_id, uri)` pair launched so far.
    pub fn calls(&self) -> Vec<(SystemId, String)> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl RemoteLauncherProvider for RecordingLauncher {
    async fn launch_uri(&self, ctx: &ConnectionContext, uri: &str) -> Result<(), String> {
        let latency = *self.latency.lock().expect("lock poisoned");
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.calls
            .lock()
            .expect("lock poisoned")
            .push((ctx.system_id.clone(), uri.to_string()));

        match self.failures.lock().expect("lock poisoned").get(uri) {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}

// ── Auth ──────────────────────────────────────────────────────────────────────

/// An [`AuthProvider`] returning a canned auth code, or failing when
/// constructed with [`StaticAuthProvider::denying`].
pub struct StaticAuthProvider {
    code: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl StaticAuthProvider {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose flow always fails (user pressed cancel).
    pub fn denying() -> Self {
        Self {
            code: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// OAuth URLs this provider was asked to drive.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn fetch_auth_code(&self, oauth_url: &str) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(oauth_url.to_string());
        self.code
            .clone()
            .ok_or_else(|| ProviderError::AuthFailed("user cancelled sign-in".to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use devlink_core::{DiscoveryType, SystemKind};

    fn desktop(id: &str, name: &str) -> RemoteSystem {
        RemoteSystem::new(id, name, SystemKind::Desktop, DiscoveryType::Cloud)
    }

    #[test]
    fn test_subscribe_replays_matching_seeds() {
        // Arrange
        let provider = SimulatedDiscoveryProvider::new();
        provider.seed([
            desktop("A", "Zeta"),
            RemoteSystem::new("X", "Lounge", SystemKind::Xbox, DiscoveryType::Proximal),
        ]);

        // Act
        let mut rx = provider
            .subscribe(DiscoveryFilter::any().with_system_kinds([SystemKind::Desktop]))
            .expect("subscribe");

        // Assert – only the desktop seed comes through.
        let event = rx.try_recv().expect("one seed event");
        assert_eq!(event, DiscoveryEvent::Added(desktop("A", "Zeta")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_fail_next_subscribe_fails_exactly_once() {
        let provider = SimulatedDiscoveryProvider::new();
        provider.fail_next_subscribe("registry offline");

        let first = provider.subscribe(DiscoveryFilter::any());
        assert_eq!(
            first.unwrap_err(),
            ProviderError::Unavailable("registry offline".to_string())
        );

        assert!(provider.subscribe(DiscoveryFilter::any()).is_ok());
    }

    #[test]
    fn test_emit_pre_filters_but_emit_raw_does_not() {
        let provider = SimulatedDiscoveryProvider::new();
        let mut rx = provider
            .subscribe(DiscoveryFilter::any().with_system_kinds([SystemKind::Xbox]))
            .expect("subscribe");

        provider.emit(DiscoveryEvent::Added(desktop("A", "Zeta")));
        assert!(rx.try_recv().is_err(), "emit must honor the filter");

        provider.emit_raw(DiscoveryEvent::Added(desktop("A", "Zeta")));
        assert!(rx.try_recv().is_ok(), "emit_raw must bypass the filter");
    }

    #[test]
    fn test_slow_subscriber_keeps_its_subscription_when_the_buffer_fills() {
        // Arrange: a subscriber that never drains.
        let provider = SimulatedDiscoveryProvider::new();
        let mut rx = provider.subscribe(DiscoveryFilter::any()).expect("subscribe");

        // Act: overflow the buffer comfortably.
        for i in 0..(SUBSCRIPTION_BUFFER + 32) {
            provider.emit(DiscoveryEvent::Added(desktop(&format!("D{i}"), "Desk")));
        }

        // Assert: the subscription survives; only the excess was shed.
        assert_eq!(provider.live_subscriptions(), 1);
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, SUBSCRIPTION_BUFFER);
    }

    #[test]
    fn test_seed_replay_larger_than_the_buffer_is_delivered_whole() {
        // Arrange: more seeds than the steady-state buffer holds.
        let provider = SimulatedDiscoveryProvider::new();
        provider.seed((0..SUBSCRIPTION_BUFFER + 40).map(|i| desktop(&format!("D{i}"), "Desk")));

        // Act
        let mut rx = provider.subscribe(DiscoveryFilter::any()).expect("subscribe");

        // Assert
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, SUBSCRIPTION_BUFFER + 40);
    }

    #[test]
    fn test_dropping_the_receiver_unsubscribes() {
        let provider = SimulatedDiscoveryProvider::new();
        let rx = provider.subscribe(DiscoveryFilter::any()).expect("subscribe");
        assert_eq!(provider.live_subscriptions(), 1);

        drop(rx);
        assert_eq!(provider.live_subscriptions(), 0);
    }

    #[test]
    fn test_static_connection_provider_answers_reachability() {
        let provider = StaticConnectionProvider::new([SystemId::from("A")]);

        let ctx = provider.connection(&SystemId::from("A")).expect("reachable");
        assert_eq!(ctx.system_id, SystemId::from("A"));
        assert!(provider.connection(&SystemId::from("B")).is_none());

        provider.disconnect(&SystemId::from("A"));
        assert!(provider.connection(&SystemId::from("A")).is_none());
    }

    #[tokio::test]
    async fn test_recording_launcher_records_and_scripts_failures() {
        // Arrange
        let launcher = RecordingLauncher::new();
        launcher.fail_uri("bad://uri", "protocol-unavailable");
        let ctx = ConnectionContext {
            system_id: SystemId::from("A"),
            transport_token: "sim:A".to_string(),
        };

        // Act / Assert
        assert_eq!(launcher.launch_uri(&ctx, "https://ok").await, Ok(()));
        assert_eq!(
            launcher.launch_uri(&ctx, "bad://uri").await,
            Err("protocol-unavailable".to_string())
        );
        assert_eq!(launcher.call_count(), 2);
        assert_eq!(launcher.calls()[0].1, "https://ok");
    }

    #[tokio::test]
    async fn test_static_auth_provider_returns_code_and_records_url() {
        let auth = StaticAuthProvider::new("code-123");
        let code = auth.fetch_auth_code("https://login/authorize").await;
        assert_eq!(code, Ok("code-123".to_string()));
        assert_eq!(auth.requests(), vec!["https://login/authorize".to_string()]);
    }

    #[tokio::test]
    async fn test_denying_auth_provider_fails() {
        let auth = StaticAuthProvider::denying();
        let result = auth.fetch_auth_code("https://login/authorize").await;
        assert!(matches!(result, Err(ProviderError::AuthFailed(_))));
    }
}
