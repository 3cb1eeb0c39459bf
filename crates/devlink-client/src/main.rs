//! devlink demo application entry point.
//!
//! Wires the SDK together against the simulated providers and walks the
//! whole flow once: platform initialization (with the canned auth flow),
//! a discovery session streaming events, and a remote URI launch on the
//! first system that shows up.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML config, defaults on first run
//!  └─ Platform::initialize()   -- auth-code flow unless a token is saved
//!  └─ discovery_session()      -- start(filter), event pump task
//!  └─ launch_dispatcher()      -- launch default URI on first system
//!  └─ Ctrl-C                   -- stop session, shut platform down
//! ```
//!
//! In a production build the three simulated providers are replaced by the
//! real transport SDK's implementations of the provider traits; nothing
//! else in this file changes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use devlink_client::infrastructure::platform::{Platform, PlatformProviders};
use devlink_client::infrastructure::providers::mock::{
    RecordingLauncher, SimulatedDiscoveryProvider, StaticAuthProvider, StaticConnectionProvider,
};
use devlink_client::infrastructure::storage::config;
use devlink_core::{DiscoveryEvent, DiscoveryType, RemoteSystem, SystemKind};

/// Builds the simulated device fleet the demo discovers.
fn demo_fleet() -> Vec<RemoteSystem> {
    vec![
        RemoteSystem::new(
            Uuid::new_v4().to_string(),
            "Office Desktop",
            SystemKind::Desktop,
            DiscoveryType::Cloud,
        ),
        RemoteSystem::new(
            Uuid::new_v4().to_string(),
            "Hallway Phone",
            SystemKind::Phone,
            DiscoveryType::Proximal,
        ),
        RemoteSystem::new(
            Uuid::new_v4().to_string(),
            "Living Room Xbox",
            SystemKind::Xbox,
            DiscoveryType::Proximal,
        ),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("devlink demo starting");

    // ── Configuration ─────────────────────────────────────────────────────────
    let app_config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("could not load config ({e}), using defaults");
            config::AppConfig::default()
        }
    };
    let filter = app_config
        .discovery
        .to_filter()
        .context("discovery filter in config is invalid")?;

    // ── Simulated transport ───────────────────────────────────────────────────
    let fleet = demo_fleet();
    let discovery = Arc::new(SimulatedDiscoveryProvider::new());
    discovery.seed(fleet.clone());
    let connections = Arc::new(StaticConnectionProvider::new(
        fleet.iter().map(|s| s.id.clone()),
    ));
    let launcher = Arc::new(RecordingLauncher::new());

    // ── Platform initialization ───────────────────────────────────────────────
    let auth = Arc::new(StaticAuthProvider::new("demo-auth-code"));
    let platform = Platform::initialize(
        &app_config.platform,
        auth,
        PlatformProviders {
            discovery: Arc::clone(&discovery) as _,
            connections: Arc::clone(&connections) as _,
            launcher: Arc::clone(&launcher) as _,
        },
    )
    .await
    .context("platform initialization failed")?;
    info!("platform initialization complete");

    // ── Discovery ─────────────────────────────────────────────────────────────
    let (mut session, mut events) = platform
        .discovery_session()
        .context("platform refused a discovery session")?;
    session.start(filter).context("could not start discovery")?;

    // Event pump: log every incremental change.
    let pump = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                DiscoveryEvent::Added(system) => info!("system added: {system}"),
                DiscoveryEvent::Updated(system) => info!("system updated: {system}"),
                DiscoveryEvent::Removed(id) => info!("system removed: id={id}"),
            }
        }
    });

    // Let the seeded fleet arrive, then demonstrate an incremental rename.
    tokio::time::sleep(Duration::from_millis(200)).await;
    if let Some(first) = session.systems().first().cloned() {
        discovery.emit(DiscoveryEvent::Updated(RemoteSystem {
            display_name: format!("{} (renamed)", first.display_name),
            ..first
        }));
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    // ── Launch ────────────────────────────────────────────────────────────────
    let dispatcher = platform
        .launch_dispatcher()
        .context("platform refused a launch dispatcher")?;

    let visible = session.systems();
    match (visible.first(), app_config.launch.default_uris.first()) {
        (Some(target), Some(uri)) => {
            info!("launching {uri} on {}", target.display_name);
            let outcome = dispatcher.launch(target, uri).await;
            info!("{outcome}");
        }
        (None, _) => warn!("no systems visible under the configured filter, nothing to launch"),
        (_, None) => warn!("no default URIs configured, nothing to launch"),
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    info!("devlink demo ready; press Ctrl-C to exit");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
    }

    session.stop();
    platform.shutdown();
    pump.abort();
    info!("devlink demo stopped");
    Ok(())
}
