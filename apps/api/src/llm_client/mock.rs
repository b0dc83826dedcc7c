//! Scripted completion client for tests. Pops one canned reply per call and
//! records every prompt it receives.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CompletionClient, CompletionError, GenerationParams};

pub struct MockCompletionClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl MockCompletionClient {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub async fn calls(&self) -> Vec<(String, GenerationParams)> {
        self.calls.lock().await.clone()
    }

    pub async fn last_prompt(&self) -> Option<String> {
        self.calls.lock().await.last().map(|(p, _)| p.clone())
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CompletionError> {
        self.calls.lock().await.push((prompt.to_string(), params));
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Transport("mock replies exhausted".into())))
    }

    fn model(&self) -> &str {
        "mock/model"
    }
}
