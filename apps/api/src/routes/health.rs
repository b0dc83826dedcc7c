use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version plus whether the completion client and the index are up.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let sessions = state.sessions.len().await;
    let model = state.pipeline.as_ref().map(|p| p.model().to_string());
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "guarani-rag",
        "initialized": model.is_some(),
        "model": model,
        "rag_available": state.retriever.is_available(),
        "retrieval_k": state.config.pipeline_config().retrieval_k,
        "sessions": sessions,
    }))
}
