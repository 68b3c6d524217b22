//! bid-notifier entry point.
//!
//! Starts the polling engine and the local Axum server with REST and
//! WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bid_notifier::api;
use bid_notifier::app_state::AppState;
use bid_notifier::backend::HttpBackend;
use bid_notifier::config::{LogFormat, NotifierConfig};
use bid_notifier::domain::EventBus;
use bid_notifier::persistence::{JsonFileProvider, MemoryProvider, StorageProvider};
use bid_notifier::service::NotificationService;
use bid_notifier::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = NotifierConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        addr = %config.listen_addr,
        backend = %config.backend_base_url,
        poll_interval_secs = config.poll_interval_secs,
        "starting bid-notifier"
    );

    // Build backend and storage
    let backend = Arc::new(HttpBackend::new(
        &config.backend_base_url,
        config.http_timeout(),
    )?);
    let storage: Arc<dyn StorageProvider> = if config.persistence_enabled {
        tracing::info!(dir = %config.store_dir.display(), "persisting notifications");
        Arc::new(JsonFileProvider::new(config.store_dir.clone()))
    } else {
        tracing::info!("persistence disabled, notifications kept in memory");
        Arc::new(MemoryProvider::new())
    };

    // Build service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let service = Arc::new(NotificationService::new(
        backend,
        storage,
        config.session_key.clone(),
        event_bus,
        config.poll_interval(),
    ));
    if let Some(token) = config.auth_token.clone() {
        drop(service.start_session(token, config.session_key.clone()).await);
    } else {
        tracing::info!("no AUTH_TOKEN set, waiting for PUT /api/v1/session");
    }

    // Build application state
    let app_state = AppState::new(Arc::clone(&service));

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(app_state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    let shutdown_service = Arc::clone(&service);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown_service.shutdown();
        })
        .await?;

    Ok(())
}
