use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prompting::{Strategy, TaskDescriptor};

/// Mode requested by the caller. `Rag` / `NoRag` are the chat toggle; the
/// rest name an assembly strategy directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "RAG", alias = "rag")]
    Rag,
    #[serde(rename = "NoRAG", alias = "norag", alias = "no_rag")]
    NoRag,
    #[serde(alias = "zero_shot")]
    ZeroShot,
    #[serde(alias = "few_shot")]
    FewShot,
    #[serde(rename = "SemanticRAG", alias = "semantic_rag")]
    SemanticRag,
    #[serde(rename = "HybridRAG", alias = "hybrid_rag")]
    HybridRag,
}

impl Mode {
    /// Strategy this mode asks for before any availability fallback.
    pub fn requested_strategy(self) -> Strategy {
        match self {
            Mode::Rag | Mode::SemanticRag => Strategy::SemanticRag,
            Mode::NoRag | Mode::ZeroShot => Strategy::ZeroShot,
            Mode::FewShot => Strategy::FewShot,
            Mode::HybridRag => Strategy::HybridRag,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Rag => "RAG",
            Mode::NoRag => "NoRAG",
            Mode::ZeroShot => "ZeroShot",
            Mode::FewShot => "FewShot",
            Mode::SemanticRag => "SemanticRAG",
            Mode::HybridRag => "HybridRAG",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "rag" => Ok(Mode::Rag),
            "norag" => Ok(Mode::NoRag),
            "zeroshot" => Ok(Mode::ZeroShot),
            "fewshot" => Ok(Mode::FewShot),
            "semanticrag" | "semantic" => Ok(Mode::SemanticRag),
            "hybridrag" | "hybrid" => Ok(Mode::HybridRag),
            _ => Err(format!("unknown mode '{}'", s.trim())),
        }
    }
}

/// One pipeline request. Immutable once built.
#[derive(Debug, Clone)]
pub struct Request {
    pub source_text: String,
    pub task: TaskDescriptor,
    pub mode: Mode,
}

/// What contributed to an answer, rendered into `diagnostic_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The strategy never asked for retrieval.
    NoRag,
    /// Retrieval ran and returned nothing.
    NoContext,
    /// Retrieval was requested but the index is unavailable.
    Fallback { requested: Strategy, effective: Strategy },
    /// Labels (`source#chunk`) of the documents placed in the prompt.
    Chunks(Vec<String>),
}

pub const NO_RAG_DIAGNOSTIC: &str = "Sin RAG";
pub const NO_CONTEXT_DIAGNOSTIC: &str = "Sin contexto";

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoRag => f.write_str(NO_RAG_DIAGNOSTIC),
            Diagnostic::NoContext => f.write_str(NO_CONTEXT_DIAGNOSTIC),
            Diagnostic::Fallback {
                requested,
                effective,
            } => write!(
                f,
                "{NO_RAG_DIAGNOSTIC} (índice no disponible: {requested} → {effective})"
            ),
            Diagnostic::Chunks(labels) => match labels.as_slice() {
                [] => f.write_str(NO_CONTEXT_DIAGNOSTIC),
                [only] => write!(f, "Fragmento usado: {only}"),
                [first, rest @ ..] => write!(f, "Fragmento usado: {first} (+{} más)", rest.len()),
            },
        }
    }
}

/// Result of one pipeline run. On completion failure both text fields hold
/// the user-visible error message.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionResult {
    pub raw_text: String,
    pub cleaned_text: String,
    pub diagnostic_info: String,
    pub requested_mode: Mode,
    pub strategy: Strategy,
    /// Source names of the documents placed in the prompt, in rank order.
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str_variants() {
        assert_eq!("RAG".parse::<Mode>().unwrap(), Mode::Rag);
        assert_eq!("no-rag".parse::<Mode>().unwrap(), Mode::NoRag);
        assert_eq!("Few_Shot".parse::<Mode>().unwrap(), Mode::FewShot);
        assert_eq!("SemanticRAG".parse::<Mode>().unwrap(), Mode::SemanticRag);
        assert_eq!("hybrid".parse::<Mode>().unwrap(), Mode::HybridRag);
        assert!("turbo".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_serde_names() {
        let m: Mode = serde_json::from_str("\"HybridRAG\"").unwrap();
        assert_eq!(m, Mode::HybridRag);
        let m: Mode = serde_json::from_str("\"rag\"").unwrap();
        assert_eq!(m, Mode::Rag);
        assert_eq!(serde_json::to_string(&Mode::NoRag).unwrap(), "\"NoRAG\"");
    }

    #[test]
    fn test_chat_modes_map_to_strategies() {
        assert_eq!(Mode::Rag.requested_strategy(), Strategy::SemanticRag);
        assert_eq!(Mode::NoRag.requested_strategy(), Strategy::ZeroShot);
    }

    #[test]
    fn test_diagnostic_rendering() {
        assert_eq!(Diagnostic::NoRag.to_string(), "Sin RAG");
        assert_eq!(Diagnostic::NoContext.to_string(), "Sin contexto");
        assert_eq!(
            Diagnostic::Fallback {
                requested: Strategy::HybridRag,
                effective: Strategy::FewShot
            }
            .to_string(),
            "Sin RAG (índice no disponible: HybridRAG → FewShot)"
        );
        assert_eq!(
            Diagnostic::Chunks(vec!["a.txt#0".into(), "b.txt#2".into()]).to_string(),
            "Fragmento usado: a.txt#0 (+1 más)"
        );
    }
}
