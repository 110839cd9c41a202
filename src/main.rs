// SPDX-License-Identifier: MIT

//! Salah-Tracker API Server
//!
//! Persists each signed-in user's five daily prayer completions as one
//! record per calendar day, with optimistic toggles reconciled against
//! the record store.

use salah_tracker::{config::Config, db::FirestoreStore, services::TrackingRegistry, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Salah-Tracker API");

    // Initialize the record store
    let store = FirestoreStore::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Per-user tracking sessions, loaded lazily on first request
    let registry = TrackingRegistry::new(Arc::new(store));

    // Build shared state
    let state = Arc::new(AppState { config: config.clone(), registry });

    // Build router
    let app = salah_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("salah_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
