use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::domains::message::{ChatRequest, ChatResponse};
use crate::error::{MermatesRagError, Result};
use crate::services::chat::ChatService;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::version().to_string(),
    })
}

async fn chat(State(state): State<AppState>, Json(payload): Json<ChatRequest>) -> Response {
    match state.chat.respond(&payload).await {
        Ok(response) => (StatusCode::OK, Json(ChatResponse { response })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, history = payload.history.len(), "chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn run_with_shutdown<F>(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let top_k = state.chat.top_k();
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MermatesRagError::Runtime(format!("cannot bind {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| MermatesRagError::Runtime(e.to_string()))?;
    tracing::info!(%local, top_k, "serving POST /chat");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| MermatesRagError::Runtime(e.to_string()))?;

    tracing::info!("daemon stopped");
    Ok(())
}
