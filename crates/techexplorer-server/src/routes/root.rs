//! Service descriptor at `/`.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(describe))
}

/// GET /: name, version and capabilities.
async fn describe(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Tech Explorer API - Technology Catalog & Discovery",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "capabilities": {
            "catalogSearch": true,
            "technologyMatching": true,
            "externalAI": state.config.agent_configured(),
        },
    }))
}
