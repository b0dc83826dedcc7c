pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::state::AppState;
use crate::transform::handlers as transform;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat variant
        .route("/api/v1/sessions", post(chat::handle_create_session))
        .route("/api/v1/sessions/:id/messages", post(chat::handle_message))
        // Form variant
        .route("/api/v1/rules", get(transform::handle_list_rules))
        .route("/api/v1/transform", post(transform::handle_transform))
        .route("/api/v1/ask", post(transform::handle_ask))
        .with_state(state)
}
