use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::runtime;
use service::suggestions::{HttpSuggestionProvider, SuggestionProvider, UnconfiguredSuggestions};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn suggestion_provider(cfg: &AppConfig) -> Result<Arc<dyn SuggestionProvider>, StartupError> {
    match &cfg.suggestions.endpoint {
        Some(endpoint) => {
            let timeout = Duration::from_secs(cfg.suggestions.timeout_secs);
            info!(%endpoint, timeout_secs = cfg.suggestions.timeout_secs, "suggestion endpoint configured");
            Ok(Arc::new(HttpSuggestionProvider::new(endpoint.clone(), timeout)?))
        }
        None => {
            info!("no suggestion endpoint configured; suggestion requests will fail");
            Ok(Arc::new(UnconfiguredSuggestions))
        }
    }
}

/// Open the slot area and mount every admin editor.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let slots = runtime::open_slot_area(&cfg.storage.data_dir, cfg.storage.quota_bytes).await?;
    info!(data_dir = %cfg.storage.data_dir.display(), quota_bytes = cfg.storage.quota_bytes, "slot area opened");
    let state = AppState::new(slots, suggestion_provider(cfg)?);
    state.mount().await;
    Ok(state)
}

/// Public entry: build the app from a validated config and run the HTTP server
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.server.bind_addr())))?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
