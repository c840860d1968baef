//! Aegis Console - Rust Implementation
//!
//! Administrative console for the Aegis emergency-response platform.

use aegis_console::{analytics, api, bus, config, emergency, ui};

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aegis_console=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting Aegis Console v{} ({})",
        env!("AEGIS_VERSION"),
        env!("AEGIS_GIT_SHA")
    );

    // Load configuration
    let config = config::load_config()?;
    tracing::info!("Configuration loaded, port: {}", config.port);

    // Create event bus
    let bus = bus::create_bus();
    tracing::info!("Event bus initialized");

    // Initialize emergency store
    let store = if config.seed_sample_data {
        emergency::EmergencyStore::with_sample_data(bus.clone())
    } else {
        emergency::EmergencyStore::new(bus.clone())
    };
    tracing::info!("Emergency store initialized ({} records)", store.len().await);

    // Initialize analytics fetcher
    let source = analytics::HttpAnalyticsSource::new(&config.analytics)?;
    tracing::info!("Analytics endpoint: {}", source.endpoint());
    let fetcher = analytics::AnalyticsFetcher::new(
        Arc::new(source),
        bus.clone(),
        config.analytics.default_range,
        Duration::from_secs(config.analytics.refresh_interval_secs.max(1)),
    );

    // Initial fetch runs in the background so a slow backend never delays startup
    let initial = fetcher.clone();
    tokio::spawn(async move {
        initial.refresh().await;
    });
    if config.analytics.auto_refresh {
        fetcher.set_auto_refresh(true).await;
    }

    // Build application state
    let state = api::AppState::new(store, fetcher.clone(), bus.clone());

    // Build API routes
    let app = Router::new()
        // Health check
        .route("/status", get(api::status_handler))
        // Emergency routes
        .route("/api/emergencies", get(api::list_emergencies_handler))
        .route("/api/emergencies", post(api::add_emergency_handler))
        .route("/api/emergencies", put(api::replace_emergencies_handler))
        .route("/api/emergencies/{id}", put(api::update_emergency_handler))
        .route("/api/emergencies/loading", post(api::set_loading_handler))
        // Analytics routes
        .route("/api/analytics", get(api::analytics_handler))
        .route("/api/analytics/refresh", post(api::analytics_refresh_handler))
        .route("/api/analytics/range", post(api::analytics_range_handler))
        .route("/api/analytics/auto-refresh", post(api::analytics_auto_refresh_handler))
        // Event stream (SSE)
        .route("/events", get(api::events_handler))
        // Web UI routes
        .route("/", get(ui::dashboard_page))
        .route("/analytics", get(ui::analytics_page))
        .route("/reports", get(ui::reports_page))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup: stop background polling
    tracing::info!("Stopping analytics poller...");
    fetcher.stop().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
