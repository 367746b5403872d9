//! Chat routes: streaming relay and single-shot answers.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use axum::routing::post;
use axum::{Json, Router};
use futures::Stream;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;
use techexplorer_discovery::{extract, next_step, recommend, respond};
use techexplorer_relay::{relay_chat, AgentQuestion, ChatRequest, ChatResponse};

type SseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/stream", post(stream_chat))
}

// ---------------------------------------------------------------
// Streaming chat (SSE)
// ---------------------------------------------------------------

/// POST /api/v1/chat/stream
///
/// Validation happens before the SSE response exists; once it is returned,
/// every outcome is reported in-band.
async fn stream_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<KeepAliveStream<SseStream>>, ApiError> {
    let Json(req) = payload?;
    let question = AgentQuestion::streaming(&req)?;

    info!(message = %question.question, "Streaming chat request");

    let events = relay_chat(state.agent.clone(), question);
    let sse_stream: SseStream = Box::pin(
        events.map(|event| Ok::<_, Infallible>(Event::default().data(event.sse_data()))),
    );

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

// ---------------------------------------------------------------
// Non-streaming chat
// ---------------------------------------------------------------

/// POST /api/v1/chat
async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    let question = AgentQuestion::direct(&req)?;

    info!(message = %question.question, "Chat request");

    let message = match state.agent.ask(&question).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("{}; answering from local catalog", e);
            respond(&question.question).to_string()
        }
    };

    let context = extract(&message);
    Ok(Json(ChatResponse {
        next_step: next_step(&context),
        recommendations: recommend(&context),
        context,
        message,
    }))
}
