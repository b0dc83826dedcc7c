/// LLM Client: the single point of entry for chat-completion calls.
///
/// ARCHITECTURAL RULE: no other module talks to the completion service directly.
/// Everything goes through `CompletionClient`, so the pipeline can be driven by
/// the HTTP client in production and by a scripted client in tests.
///
/// There is NO retry logic here. A failed call surfaces immediately.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[cfg(test)]
pub mod mock;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum CompletionError {
    /// Network failure or timeout before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("upstream error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    /// 2xx response that could not be decoded or carried no content.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// User-facing rendering, embedded verbatim in the answer field.
    pub fn user_message(&self) -> String {
        match self {
            CompletionError::Transport(msg) => {
                format!("Error al conectar con el servicio de completado: {msg}")
            }
            CompletionError::Upstream { status, body } => format!("Error: {status} - {body}"),
            CompletionError::InvalidResponse(msg) => {
                format!("Respuesta inválida del servicio de completado: {msg}")
            }
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CompletionError::InvalidResponse(e.to_string())
        } else {
            CompletionError::Transport(e.to_string())
        }
    }
}

/// Per-call generation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Anything that turns a prompt into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CompletionError>;

    /// Model identifier, shown in the chat welcome message.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the top choice, if any.
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

/// OpenAI-compatible chat-completions client (OpenRouter by default).
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenRouterClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        debug!(
            "Completion request: model={} prompt_chars={} max_tokens={}",
            self.model,
            prompt.chars().count(),
            params.max_tokens
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .into_text()
            .ok_or_else(|| CompletionError::InvalidResponse("no choices in response".into()))?;

        debug!("Completion response: {} chars", text.chars().count());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
