//! API routes for triaged

use crate::server::AppState;
use crate::triage::TriageError;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};
use triage_common::{ChatRequest, ChatResponse, HealthResponse, ServiceInfo};

type AppStateArc = Arc<AppState>;

pub const SERVICE_NAME: &str = "triage-agent-service";

// ============================================================================
// Service Info Routes
// ============================================================================

pub fn info_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(service_info))
}

async fn service_info(State(state): State<AppStateArc>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Triage Agent Service".to_string(),
        status: "running".to_string(),
        model_loaded: state.engine.generator().is_available().await,
    })
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let loaded = state.engine.generator().is_available().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        model_status: if loaded { "loaded" } else { "not_loaded" }.to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

// ============================================================================
// Chat Routes
// ============================================================================

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/chat", post(chat))
}

async fn chat(
    State(state): State<AppStateArc>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    info!("  /chat: {} message(s)", req.messages.len());

    match state.engine.triage(&req.messages).await {
        Ok(result) => {
            info!("  /chat -> intent {}", result.intent.as_str());
            Ok(Json(result.into_chat_response()))
        }
        Err(TriageError::EmptyHistory) => Err((
            StatusCode::BAD_REQUEST,
            "messages must not be empty".to_string(),
        )),
        Err(e) => {
            error!("  /chat failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ))
        }
    }
}
