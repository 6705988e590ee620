//! HTTP server for triaged

use crate::routes;
use crate::triage::TriageEngine;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub engine: TriageEngine,
}

impl AppState {
    pub fn new(engine: TriageEngine) -> Self {
        Self { engine }
    }
}

/// Build the full router. Split out of `run` so tests can drive it directly.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::info_routes())
        .merge(routes::health_routes())
        .merge(routes::chat_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The booking frontend calls this service from the browser.
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server
pub async fn run(state: AppState, bind_addr: &str) -> Result<()> {
    let app = app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("  Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
