use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::pipeline::models::{CompletionResult, Mode, Request};
use crate::prompting::rules::{find_rule, TransformRule, RULES};
use crate::prompting::TaskDescriptor;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TransformRequest {
    pub source_text: String,
    pub rule: String,
    pub mode: String,
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Defaults to `RAG`.
    #[serde(default)]
    pub mode: Option<String>,
}

/// GET /api/v1/rules
pub async fn handle_list_rules() -> Json<&'static [TransformRule]> {
    Json(RULES)
}

/// POST /api/v1/transform
pub async fn handle_transform(
    State(state): State<AppState>,
    Json(req): Json<TransformRequest>,
) -> Result<Json<CompletionResult>, AppError> {
    let source_text = non_empty(&req.source_text, "source_text")?;
    let rule = find_rule(&req.rule)
        .ok_or_else(|| AppError::Validation(format!("unknown rule '{}'", req.rule.trim())))?;
    let mode = parse_mode(&req.mode)?;
    let pipeline = state.pipeline()?;

    let request = Request {
        source_text,
        task: TaskDescriptor::Transform(rule),
        mode,
    };
    Ok(Json(pipeline.run(&request).await))
}

/// POST /api/v1/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<CompletionResult>, AppError> {
    let source_text = non_empty(&req.question, "question")?;
    let mode = match req.mode.as_deref() {
        Some(raw) => parse_mode(raw)?,
        None => Mode::Rag,
    };
    let pipeline = state.pipeline()?;

    let request = Request {
        source_text,
        task: TaskDescriptor::Question,
        mode,
    };
    Ok(Json(pipeline.run(&request).await))
}

fn non_empty(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn parse_mode(raw: &str) -> Result<Mode, AppError> {
    raw.parse::<Mode>().map_err(AppError::Validation)
}
