use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::pipeline::Orchestrator;
use crate::retrieval::Retriever;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key was configured and startup was lenient.
    pub pipeline: Option<Orchestrator>,
    /// Read-only index handle, shared with the pipeline.
    pub retriever: Arc<dyn Retriever>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}

impl AppState {
    /// The orchestrator, or `NotInitialized` when the service has no completion client.
    pub fn pipeline(&self) -> Result<&Orchestrator, AppError> {
        self.pipeline.as_ref().ok_or(AppError::NotInitialized)
    }
}
