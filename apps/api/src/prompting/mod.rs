//! Prompt Assembler.
//!
//! All four strategies share one skeleton: persona, optional context block,
//! optional worked examples, the task itself (rule + sentence, or question),
//! and the anti-hallucination instructions. Strategies only switch the two
//! optional blocks on or off, so the instruction wording is byte-identical
//! across strategies and A/B comparisons stay valid.
//!
//! Skeleton order:
//! ```text
//! persona [context intro]
//! [CONTEXTO: ...]
//! [EJEMPLOS: ...]
//! REGLA/ORACIÓN | PREGUNTA
//! INSTRUCCIONES: ...
//! RESULTADO: | RESPUESTA:
//! ```

pub mod prompts;
pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::{
    ASSISTANT_PERSONA, CONTEXT_GROUNDING, LINGUIST_PERSONA, QUESTION_GUARD, TRANSFORM_GUARD,
};
use crate::prompting::prompts::*;
use crate::prompting::rules::TransformRule;
use crate::retrieval::RetrievedDocument;

/// Effective assembly strategy, after mode resolution and fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    ZeroShot,
    FewShot,
    #[serde(rename = "SemanticRAG")]
    SemanticRag,
    #[serde(rename = "HybridRAG")]
    HybridRag,
}

impl Strategy {
    pub fn uses_context(self) -> bool {
        matches!(self, Strategy::SemanticRag | Strategy::HybridRag)
    }

    pub fn uses_examples(self) -> bool {
        matches!(self, Strategy::FewShot | Strategy::HybridRag)
    }

    /// Strategy to use when the index is unavailable: drop the context layer,
    /// keep everything else.
    pub fn without_retrieval(self) -> Strategy {
        match self {
            Strategy::HybridRag => Strategy::FewShot,
            Strategy::SemanticRag => Strategy::ZeroShot,
            other => other,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::ZeroShot => "ZeroShot",
            Strategy::FewShot => "FewShot",
            Strategy::SemanticRag => "SemanticRAG",
            Strategy::HybridRag => "HybridRAG",
        };
        f.write_str(name)
    }
}

/// What the request asks the model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDescriptor {
    /// Apply a transformation rule to the source sentence.
    Transform(&'static TransformRule),
    /// Answer the source text as a free-form question.
    Question,
}

/// How much retrieved text goes into the context slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    pub max_documents: usize,
    pub max_chars_per_document: usize,
}

/// Transformations only need a short grammar excerpt.
pub const TRANSFORM_CONTEXT_BUDGET: ContextBudget = ContextBudget {
    max_documents: 2,
    max_chars_per_document: 400,
};

/// Default question budget; the pipeline overrides `max_documents` with its
/// configured retrieval depth.
pub const QUESTION_CONTEXT_BUDGET: ContextBudget = ContextBudget {
    max_documents: 3,
    max_chars_per_document: 1200,
};

impl TaskDescriptor {
    pub fn context_budget(&self) -> ContextBudget {
        match self {
            TaskDescriptor::Transform(_) => TRANSFORM_CONTEXT_BUDGET,
            TaskDescriptor::Question => QUESTION_CONTEXT_BUDGET,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub task: TaskDescriptor,
    pub source_text: &'a str,
    pub strategy: Strategy,
    pub documents: &'a [RetrievedDocument],
    pub budget: ContextBudget,
}

/// Task-specific wording plugged into the shared skeleton.
struct Wording {
    persona: &'static str,
    context_intro: &'static str,
    context_heading: &'static str,
    guard: &'static str,
    answer_label: &'static str,
}

const QUESTION_WORDING: Wording = Wording {
    persona: ASSISTANT_PERSONA,
    context_intro: QUESTION_CONTEXT_INTRO,
    context_heading: QUESTION_CONTEXT_HEADING,
    guard: QUESTION_GUARD,
    answer_label: QUESTION_ANSWER_LABEL,
};

const TRANSFORM_WORDING: Wording = Wording {
    persona: LINGUIST_PERSONA,
    context_intro: TRANSFORM_CONTEXT_INTRO,
    context_heading: TRANSFORM_CONTEXT_HEADING,
    guard: TRANSFORM_GUARD,
    answer_label: TRANSFORM_ANSWER_LABEL,
};

/// Builds the prompt for one request. Pure and deterministic.
pub fn assemble(input: &PromptInput<'_>) -> String {
    let wording = match input.task {
        TaskDescriptor::Transform(_) => &TRANSFORM_WORDING,
        TaskDescriptor::Question => &QUESTION_WORDING,
    };
    let with_context = input.strategy.uses_context();

    let mut sections: Vec<String> = Vec::with_capacity(6);

    if with_context {
        sections.push(format!("{} {}", wording.persona, wording.context_intro));
        sections.push(format!(
            "{}\n{}",
            wording.context_heading,
            context_block(input.documents, input.budget)
        ));
    } else {
        sections.push(wording.persona.to_string());
    }

    if input.strategy.uses_examples() {
        sections.push(examples_block(&input.task));
    }

    sections.push(match input.task {
        TaskDescriptor::Transform(rule) => format!(
            "{RULE_LABEL} {}\n{SENTENCE_LABEL} {}",
            rule.description,
            input.source_text.trim()
        ),
        TaskDescriptor::Question => format!("{QUESTION_LABEL} {}", input.source_text.trim()),
    });

    let mut instructions = String::from(INSTRUCTIONS_HEADING);
    if with_context {
        instructions.push('\n');
        instructions.push_str(CONTEXT_GROUNDING);
    }
    instructions.push('\n');
    instructions.push_str(wording.guard);
    sections.push(instructions);

    sections.push(wording.answer_label.to_string());
    sections.join("\n\n")
}

/// Context slot contents: the top documents within budget, or the literal
/// no-context marker when there are none.
pub fn context_block(documents: &[RetrievedDocument], budget: ContextBudget) -> String {
    let parts: Vec<String> = documents
        .iter()
        .take(budget.max_documents)
        .map(|doc| {
            format!(
                "[{}]\n{}",
                doc.label(),
                truncate_chars(doc.content.trim(), budget.max_chars_per_document)
            )
        })
        .collect();
    if parts.is_empty() {
        NO_CONTEXT_MARKER.to_string()
    } else {
        parts.join("\n\n")
    }
}

/// Fixed worked-examples block for a task, including its heading.
pub fn examples_block(task: &TaskDescriptor) -> String {
    let pairs: Vec<String> = match task {
        TaskDescriptor::Transform(rule) => rule
            .examples
            .iter()
            .map(|(input, output)| format!("Entrada: {input}\nSalida: {output}"))
            .collect(),
        TaskDescriptor::Question => QUESTION_EXAMPLES
            .iter()
            .map(|(q, a)| format!("P: {q}\nR: {a}"))
            .collect(),
    };
    format!("{EXAMPLES_HEADING}\n{}", pairs.join("\n\n"))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::prompting::rules::find_rule;
    use crate::retrieval::testing::doc;

    fn aff() -> TaskDescriptor {
        TaskDescriptor::Transform(find_rule("TYPE:AFF").unwrap())
    }

    fn build(task: TaskDescriptor, strategy: Strategy, docs: &[RetrievedDocument]) -> String {
        assemble(&PromptInput {
            task,
            source_text: "Ore ndorombyai kuri",
            strategy,
            documents: docs,
            budget: task.context_budget(),
        })
    }

    #[test]
    fn test_few_shot_block_precedes_rule_and_sentence() {
        let prompt = build(aff(), Strategy::FewShot, &[]);
        let block = examples_block(&aff());

        let block_at = prompt.find(&block).expect("few-shot block verbatim");
        let rule_at = prompt.find("Convierte negativa a afirmativa").unwrap();
        let source_at = prompt.find("Ore ndorombyai kuri").unwrap();
        assert!(block_at < rule_at);
        assert!(rule_at < source_at);
        assert!(!prompt.contains(TRANSFORM_CONTEXT_HEADING));
    }

    #[test]
    fn test_zero_shot_has_guard_but_no_optional_blocks() {
        let prompt = build(aff(), Strategy::ZeroShot, &[]);
        assert!(prompt.contains("NO SÉ"));
        assert!(prompt.contains("NO inventes"));
        assert!(!prompt.contains(EXAMPLES_HEADING));
        assert!(!prompt.contains(NO_CONTEXT_MARKER));
        assert!(prompt.ends_with(TRANSFORM_ANSWER_LABEL));
    }

    #[test]
    fn test_semantic_rag_without_documents_uses_marker() {
        let prompt = build(aff(), Strategy::SemanticRag, &[]);
        let expected_slot = format!("{TRANSFORM_CONTEXT_HEADING}\n{NO_CONTEXT_MARKER}");
        assert!(prompt.contains(&expected_slot), "{prompt}");
    }

    #[test]
    fn test_semantic_rag_takes_top_two_truncated() {
        let long = "a".repeat(1000);
        let docs = vec![
            doc("negacion.txt", 0, &long),
            doc("verbos.txt", 3, "Ajapo: hago."),
            doc("extra.txt", 1, "Nunca debería aparecer."),
        ];
        let prompt = build(aff(), Strategy::SemanticRag, &docs);
        assert!(prompt.contains("[negacion.txt#0]"));
        assert!(prompt.contains("[verbos.txt#3]\nAjapo: hago."));
        assert!(!prompt.contains("extra.txt"));
        assert!(prompt.contains(&format!("{}…", "a".repeat(400))));
        assert!(!prompt.contains(&"a".repeat(401)));
    }

    #[test]
    fn test_hybrid_combines_context_and_examples() {
        let docs = vec![doc("negacion.txt", 0, "nd- ... -i")];
        let prompt = build(aff(), Strategy::HybridRag, &docs);
        let context_at = prompt.find(TRANSFORM_CONTEXT_HEADING).unwrap();
        let examples_at = prompt.find(&examples_block(&aff())).unwrap();
        let rule_at = prompt.find(RULE_LABEL).unwrap();
        assert!(context_at < examples_at && examples_at < rule_at);
        assert!(prompt.contains(CONTEXT_GROUNDING));
    }

    #[test]
    fn test_instruction_wording_shared_across_strategies() {
        let docs = vec![doc("negacion.txt", 0, "nd- ... -i")];
        for strategy in [
            Strategy::ZeroShot,
            Strategy::FewShot,
            Strategy::SemanticRag,
            Strategy::HybridRag,
        ] {
            let prompt = build(aff(), strategy, &docs);
            assert!(prompt.contains(TRANSFORM_GUARD), "{strategy} lost the guard");
        }
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let docs = vec![doc("a.txt", 0, "uno"), doc("b.txt", 1, "dos")];
        let first = build(aff(), Strategy::HybridRag, &docs);
        let second = build(aff(), Strategy::HybridRag, &docs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_context_block_honours_wider_question_budget() {
        let docs: Vec<RetrievedDocument> = (0..5)
            .map(|i| doc(&format!("d{i}.txt"), 0, "texto"))
            .collect();
        let budget = ContextBudget {
            max_documents: 5,
            ..QUESTION_CONTEXT_BUDGET
        };
        let block = context_block(&docs, budget);
        assert!(block.contains("[d4.txt#0]"));
        assert!(!context_block(&docs, QUESTION_CONTEXT_BUDGET).contains("[d3.txt#0]"));
    }

    #[test]
    fn test_question_rag_prompt_follows_chat_layout() {
        let docs = vec![doc("pronombres.txt", 0, "che = yo")];
        let prompt = assemble(&PromptInput {
            task: TaskDescriptor::Question,
            source_text: "  ¿Cuáles son los pronombres personales?  ",
            strategy: Strategy::SemanticRag,
            documents: &docs,
            budget: QUESTION_CONTEXT_BUDGET,
        });
        assert!(prompt.starts_with(ASSISTANT_PERSONA));
        assert!(prompt.contains("CONTEXTO:\n[pronombres.txt#0]\nche = yo"));
        assert!(prompt.contains("PREGUNTA: ¿Cuáles son los pronombres personales?\n"));
        assert!(prompt.ends_with(QUESTION_ANSWER_LABEL));
    }

    #[test]
    fn test_fallback_mapping() {
        assert_eq!(Strategy::HybridRag.without_retrieval(), Strategy::FewShot);
        assert_eq!(Strategy::SemanticRag.without_retrieval(), Strategy::ZeroShot);
        assert_eq!(Strategy::FewShot.without_retrieval(), Strategy::FewShot);
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("ñañe'ẽ", 3), "ñañ…");
        assert_eq!(truncate_chars("ñe", 5), "ñe");
    }
}
