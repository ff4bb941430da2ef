//! clippay-gateway server entry point.
//!
//! Starts the Axum HTTP server and the background reconciliation loop.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use clippay_gateway::api;
use clippay_gateway::app_state::AppState;
use clippay_gateway::config::GatewayConfig;
use clippay_gateway::domain::{AccountDirectory, EventBus, PostStore, RateRegistry};
use clippay_gateway::persistence::postgres::PostgresPersistence;
use clippay_gateway::service::TrackingService;
use clippay_gateway::sweep::SweepWorker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting clippay-gateway");

    // Payout ledger (optional)
    let ledger = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("payout ledger connected");
        Some(PostgresPersistence::new(pool))
    } else {
        tracing::warn!("payout ledger disabled; settlements will not be recorded");
        None
    };

    // Build domain layer
    let store = Arc::new(PostStore::new());
    let rates = Arc::new(RateRegistry::new());
    let accounts = Arc::new(AccountDirectory::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let service = Arc::new(TrackingService::new(
        store,
        rates,
        accounts,
        event_bus.clone(),
        ledger,
    ));

    // Start the reconciliation loop
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = SweepWorker::new(
        Arc::clone(&service),
        Duration::from_secs(config.sweep_interval_secs),
        shutdown_rx,
    );
    let worker_handle = tokio::spawn(worker.run());

    // Build application state
    let app_state = AppState { service, event_bus };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the reconciliation loop; an in-flight sweep finishes its current
    // write and exits.
    let _ = shutdown_tx.send(true);
    let _ = worker_handle.await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
