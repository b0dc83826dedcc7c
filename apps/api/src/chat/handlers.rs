use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::{format_reply, welcome_text};
use crate::errors::AppError;
use crate::pipeline::models::{CompletionResult, Request};
use crate::prompting::TaskDescriptor;
use crate::session::prompts::{HELP_TEXT, RAG_OFF_REPLY, RAG_ON_REPLY};
use crate::session::ChatCommand;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub welcome: String,
    pub rag_enabled: bool,
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub reply: String,
    /// Absent for slash commands, which never reach the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CompletionResult>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionCreated>, AppError> {
    let pipeline = state.pipeline()?;
    let (session_id, session) = state.sessions.create().await;
    info!("Session {session_id} created");
    Ok(Json(SessionCreated {
        session_id,
        welcome: welcome_text(pipeline.model(), pipeline.rag_available()),
        rag_enabled: session.rag_enabled,
    }))
}

/// POST /api/v1/sessions/:id/messages
pub async fn handle_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content must not be empty".into()));
    }

    if let Some(command) = ChatCommand::parse(content) {
        let reply = match command {
            ChatCommand::RagOn | ChatCommand::RagOff => {
                let enabled = command == ChatCommand::RagOn;
                state
                    .sessions
                    .set_rag(session_id, enabled)
                    .await
                    .ok_or_else(|| unknown_session(session_id))?;
                info!("Session {session_id}: rag_enabled={enabled}");
                if enabled {
                    RAG_ON_REPLY
                } else {
                    RAG_OFF_REPLY
                }
            }
            ChatCommand::Help => {
                state
                    .sessions
                    .snapshot(session_id)
                    .await
                    .ok_or_else(|| unknown_session(session_id))?;
                HELP_TEXT
            }
        };
        return Ok(Json(MessageResponse {
            reply: reply.to_string(),
            result: None,
        }));
    }

    // The snapshot fixes the mode for this request; the lock is released
    // before the completion call.
    let session = state
        .sessions
        .snapshot(session_id)
        .await
        .ok_or_else(|| unknown_session(session_id))?;
    let pipeline = state.pipeline()?;

    let request = Request {
        source_text: content.to_string(),
        task: TaskDescriptor::Question,
        mode: session.mode(),
    };
    let result = pipeline.run(&request).await;

    Ok(Json(MessageResponse {
        reply: format_reply(&result, session.mode()),
        result: Some(result),
    }))
}

fn unknown_session(id: Uuid) -> AppError {
    AppError::NotFound(format!("session {id} not found"))
}
