//! Chat variant of the shell: sessions, slash commands and reply formatting.

pub mod handlers;

use std::collections::BTreeSet;

use crate::pipeline::models::{CompletionResult, Mode};
use crate::session::prompts::{
    RAG_INDICATOR, RAG_STATUS_READY, RAG_STATUS_UNAVAILABLE, SOURCES_PREFIX,
    WELCOME_TEMPLATE, ZERO_SHOT_INDICATOR,
};

/// Renders a pipeline result as a chat reply: answer, optional source list,
/// then the mode indicator.
///
/// Sources are listed only when the session asked for RAG and the run
/// actually used context. The indicator follows the strategy that ran, so a
/// fallback shows as zero-shot.
pub fn format_reply(result: &CompletionResult, session_mode: Mode) -> String {
    let mut reply = result.cleaned_text.clone();
    let used_context = result.strategy.uses_context();

    if session_mode == Mode::Rag && used_context {
        let sources: BTreeSet<&str> = result.sources.iter().map(String::as_str).collect();
        if !sources.is_empty() {
            let list: Vec<&str> = sources.into_iter().collect();
            reply.push_str(&format!("\n\n{SOURCES_PREFIX} {}", list.join(", ")));
        }
    }

    let indicator = if used_context {
        RAG_INDICATOR
    } else {
        ZERO_SHOT_INDICATOR
    };
    reply.push_str("\n\n");
    reply.push_str(indicator);
    reply
}

pub fn welcome_text(model: &str, rag_available: bool) -> String {
    let status = if rag_available {
        RAG_STATUS_READY
    } else {
        RAG_STATUS_UNAVAILABLE
    };
    WELCOME_TEMPLATE
        .replace("{model}", model)
        .replace("{rag_status}", status)
}
