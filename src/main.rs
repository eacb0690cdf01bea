use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dispatch_monitor::config::Config;
use dispatch_monitor::engine::alerts::{AlertEngine, LogNotifier};
use dispatch_monitor::engine::scheduler::Scheduler;
use dispatch_monitor::error::AppError;
use dispatch_monitor::snapshot::SnapshotLoader;
use dispatch_monitor::state::StateStore;
use dispatch_monitor::stream::connection::ConnectionManager;
use dispatch_monitor::stream::router::MessageRouter;
use dispatch_monitor::stream::transport::WsTransport;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let store = Arc::new(StateStore::new(
        config.active_window(),
        config.event_buffer_size,
    ));
    let loader = SnapshotLoader::new(config.api_base_url.clone());

    let thresholds = match loader.load_alert_config().await {
        Ok(thresholds) => Some(thresholds),
        Err(err) => {
            warn!(error = %err, "threshold scanner disabled");
            None
        }
    };

    let engine = Arc::new(AlertEngine::new(
        store.clone(),
        thresholds,
        config.alert_ttl(),
        Arc::new(LogNotifier),
    ));

    let scheduler = Scheduler::new();
    {
        let store = store.clone();
        scheduler.schedule_repeating(config.activity_recompute_period(), move || {
            store.recompute_activity();
        });
    }
    engine.clone().start(
        &scheduler,
        config.threshold_scan_period(),
        config.alert_sweep_period(),
    );

    // Bootstrap concurrently with the stream. A failed snapshot is degraded
    // mode, not a startup failure: the store stays empty and fills from live
    // events.
    let snapshot_task = {
        let store = store.clone();
        tokio::spawn(async move {
            match loader.load_initial_state().await {
                Ok(snapshot) => {
                    info!(
                        couriers = snapshot.couriers.len(),
                        orders = snapshot.orders.len(),
                        "snapshot loaded"
                    );
                    store.hydrate(snapshot);
                }
                Err(err) => {
                    warn!(error = %err, "snapshot fetch failed; continuing live-only");
                }
            }
        })
    };

    let router = MessageRouter::new(store.clone(), engine.clone());
    let transport = Arc::new(WsTransport::new(config.ws_url.clone()));
    let manager = ConnectionManager::new(transport, router, config.reconnect_delay());
    let connection_task = tokio::spawn(manager.run());

    shutdown_signal().await;
    info!("shutting down");

    scheduler.shutdown();
    connection_task.abort();
    snapshot_task.abort();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
