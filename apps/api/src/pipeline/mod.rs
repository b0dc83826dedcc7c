//! Strategy Selector / Orchestrator.
//!
//! Flow per request:
//!   resolve strategy (with index fallback) → retrieve (if the strategy wants
//!   context) → assemble prompt → complete → clean → CompletionResult.
//!
//! Nothing here returns an error. Completion failures are rendered into the
//! answer text; retrieval failures are already "no context" by contract.
//! No retries anywhere.

pub mod clean;
pub mod models;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::llm_client::{CompletionClient, GenerationParams};
use crate::pipeline::clean::clean_output;
use crate::pipeline::models::{CompletionResult, Diagnostic, Request};
use crate::prompting::{assemble, ContextBudget, PromptInput, Strategy, TaskDescriptor};
use crate::retrieval::Retriever;

/// Tuning knobs for the pipeline. Defaults follow the chat application:
/// creative, longer answers for questions; near-deterministic, short output
/// for sentence transformations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Documents fetched per question.
    pub retrieval_k: usize,
    pub transform_params: GenerationParams,
    pub question_params: GenerationParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieval_k: 3,
            transform_params: GenerationParams {
                max_tokens: 100,
                temperature: 0.1,
            },
            question_params: GenerationParams {
                max_tokens: 500,
                temperature: 0.7,
            },
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    retriever: Arc<dyn Retriever>,
    completion: Arc<dyn CompletionClient>,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        completion: Arc<dyn CompletionClient>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retriever,
            completion,
            config,
        }
    }

    pub fn model(&self) -> &str {
        self.completion.model()
    }

    pub fn rag_available(&self) -> bool {
        self.retriever.is_available()
    }

    /// Strategy actually used for `requested`, given current index availability.
    pub fn effective_strategy(&self, requested: Strategy) -> Strategy {
        if requested.uses_context() && !self.retriever.is_available() {
            requested.without_retrieval()
        } else {
            requested
        }
    }

    /// Context budget for `task`. Questions take `retrieval_k` documents.
    pub fn context_budget(&self, task: &TaskDescriptor) -> ContextBudget {
        let budget = task.context_budget();
        match task {
            TaskDescriptor::Transform(_) => budget,
            TaskDescriptor::Question => ContextBudget {
                max_documents: self.config.retrieval_k.max(1),
                ..budget
            },
        }
    }

    pub async fn run(&self, request: &Request) -> CompletionResult {
        let requested = request.mode.requested_strategy();
        let strategy = self.effective_strategy(requested);
        if strategy != requested {
            info!("Index unavailable: falling back from {requested} to {strategy}");
        }

        let budget = self.context_budget(&request.task);
        let mut documents = if strategy.uses_context() {
            let query = retrieval_query(request);
            let k = budget.max_documents;
            debug!("Retrieving k={k} for query {query:?}");
            self.retriever.retrieve(&query, k)
        } else {
            Vec::new()
        };
        documents.truncate(budget.max_documents);

        let diagnostic = if strategy != requested {
            Diagnostic::Fallback {
                requested,
                effective: strategy,
            }
        } else if !strategy.uses_context() {
            Diagnostic::NoRag
        } else if documents.is_empty() {
            Diagnostic::NoContext
        } else {
            Diagnostic::Chunks(documents.iter().map(|d| d.label()).collect())
        };

        let prompt = assemble(&PromptInput {
            task: request.task,
            source_text: &request.source_text,
            strategy,
            documents: &documents,
            budget,
        });

        let params = match request.task {
            TaskDescriptor::Transform(_) => self.config.transform_params,
            TaskDescriptor::Question => self.config.question_params,
        };

        let (raw_text, cleaned_text) = match self.completion.complete(&prompt, params).await {
            Ok(raw) => {
                let cleaned = clean_output(&request.task, &raw);
                (raw, cleaned)
            }
            Err(e) => {
                warn!("Completion failed ({strategy}): {e}");
                let message = e.user_message();
                (message.clone(), message)
            }
        };

        info!(
            "Pipeline run: mode={} strategy={} diagnostic={:?}",
            request.mode,
            strategy,
            diagnostic.to_string()
        );

        CompletionResult {
            raw_text,
            cleaned_text,
            diagnostic_info: diagnostic.to_string(),
            requested_mode: request.mode,
            strategy,
            sources: documents.iter().map(|d| d.source().to_string()).collect(),
        }
    }
}

/// Query sent to the retriever. Questions search for themselves; rule
/// applications search for the rule's grammar topic plus the sentence.
pub fn retrieval_query(request: &Request) -> String {
    match request.task {
        TaskDescriptor::Question => request.source_text.trim().to_string(),
        TaskDescriptor::Transform(rule) => format!(
            "{} {} {}",
            rule.id,
            rule.keywords,
            request.source_text.trim()
        ),
    }
}
