//! # zonehubd — zonehub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize `tracing`
//! - Open the JSON state file
//! - Construct the event bus, device organiser and gateway aggregator
//! - Start the metadata sync task
//! - Register the configured virtual gateways
//! - Build the axum router and serve it
//! - Handle graceful shutdown (Ctrl-C), then stop every gateway poller
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use zonehub_adapter_http_axum::state::AppState;
use zonehub_adapter_storage_file::FileSection;
use zonehub_adapter_virtual::VirtualGateway;
use zonehub_app::aggregator::GatewayAggregator;
use zonehub_app::event_bus::EventBus;
use zonehub_app::metadata_sync;
use zonehub_app::organiser::DeviceOrganiser;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Storage
    let root = FileSection::open(&config.storage.path)?;

    // Core
    let event_bus = Arc::new(EventBus::new());
    let organiser = Arc::new(DeviceOrganiser::new(&root, Arc::clone(&event_bus)));
    let aggregator = Arc::new(GatewayAggregator::new(Arc::clone(&event_bus)));
    let sync = metadata_sync::spawn(
        Arc::clone(&organiser),
        event_bus.subscription(metadata_sync::SUBSCRIPTION_CAPACITY),
    );

    // Gateways
    for gateway in &config.gateways.0 {
        aggregator.add(
            gateway.name.clone(),
            Arc::new(VirtualGateway::new(gateway.name.clone(), gateway.devices)),
        )?;
    }

    // HTTP
    let state = AppState::new(
        Arc::clone(&organiser),
        Arc::clone(&aggregator),
        Arc::clone(&event_bus),
    )
    .with_subscriber_capacity(config.events.subscriber_capacity);
    let app = zonehub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "zonehubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    aggregator.stop();
    aggregator.wait().await;
    sync.abort();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
