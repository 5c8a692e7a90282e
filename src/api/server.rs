use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::info;

use super::{services, state::AppState};
use crate::config::Config;
use crate::embed::Orchestrator;
use crate::handlers::HandlerRegistry;
use crate::location::{NominatimClient, SearchSession};
use crate::observability::Metrics;
use crate::settings::SettingsStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(address: SocketAddr) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config =
        Arc::new(Config::load().map_err(|e| format!("Failed to load config: {}", e))?);

    info!(path = %config.server.store_path.display(), "Opening settings store");
    let store = SettingsStore::open(&config.server.store_path)
        .map_err(|e| format!("Failed to open settings store: {}", e))?;

    let registry = Arc::new(HandlerRegistry::with_defaults());
    let metrics = Arc::new(Metrics::new());

    let orchestrator = Orchestrator::new(
        Arc::clone(&registry),
        Arc::clone(&metrics),
        config.panel.host_origin.clone(),
        config.panel.load_timeout(),
        config.panel.retry_delay(),
    );

    // Activate the persisted selection before the first request arrives
    let settings = store.load();
    orchestrator.sync_settings(&settings);

    let geocoder = NominatimClient::new(&config.search.endpoint, &config.search.user_agent)
        .map_err(|e| format!("Failed to build geocoding client: {}", e))?;
    let search = Arc::new(SearchSession::new(
        Arc::new(geocoder),
        Arc::clone(&metrics),
        config.search.debounce(),
        config.search.min_query_len,
        config.search.max_results,
    ));

    let state = AppState::new(config, registry, store, orchestrator, search, metrics);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Framebox panel API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Panel API router. Shared by `run` and the integration tests.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(services::health))
        .route("/panel", get(services::get_panel))
        .route("/panel/select", post(services::select_config))
        .route("/panel/retry", post(services::retry))
        .route("/panel/frame-event", post(services::frame_event))
        .route("/panel/params", post(services::update_params))
        .route("/panel/src", post(services::update_src))
        .route("/panel/search", get(services::search))
        .route("/handlers", get(services::list_handlers))
        .route(
            "/configs",
            get(services::list_configs).post(services::create_config),
        )
        .route(
            "/configs/{config_id}",
            put(services::update_config).delete(services::delete_config),
        )
        .route("/settings/export", get(services::export))
        .route("/settings/import", post(services::import))
        .with_state(state)
        // Automatically decompress gzip request bodies (import payloads)
        .layer(RequestDecompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
