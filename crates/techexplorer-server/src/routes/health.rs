//! Health routes: static configuration report and agent reachability check.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::SecondsFormat;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ai-agent", get(agent_health))
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET /api/v1/health
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = &state.config;
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": timestamp(),
        "aiAgent": {
            "url": config.agent_base_url,
            "endpoint": config.agent_endpoint,
            "configured": config.agent_configured(),
        },
    }))
}

/// GET /api/v1/health/ai-agent: one bounded check of the agent's `/health`.
async fn agent_health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.agent.health().await {
        Ok(agent_health) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "connected",
                "aiAgentHealth": agent_health,
                "timestamp": timestamp(),
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "disconnected",
                "error": e.to_string(),
                "timestamp": timestamp(),
            })),
        ),
    }
}
