// Nearest-neighbour retrieval over the Guaraní reference documents.
// The retriever fails open: an unavailable index or an empty hit list both
// mean "no context", never an error the caller has to handle.

pub mod chunker;
pub mod embedding;
pub mod index;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::retrieval::index::VectorIndex;

/// One retrieved chunk, most relevant first in any returned list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub content: String,
    pub metadata: BTreeMap<String, String>,
    pub score: f32,
}

impl RetrievedDocument {
    /// `source#chunk` label used in diagnostics; falls back to whatever is known.
    pub fn label(&self) -> String {
        let source = self.source();
        match self.metadata.get("chunk") {
            Some(chunk) => format!("{source}#{chunk}"),
            None => source.to_string(),
        }
    }

    pub fn source(&self) -> &str {
        self.metadata
            .get("source")
            .map(String::as_str)
            .unwrap_or("Desconocido")
    }
}

pub trait Retriever: Send + Sync {
    /// Top-`k` documents for `query`. Empty when nothing matches or the index
    /// is unavailable.
    fn retrieve(&self, query: &str, k: usize) -> Vec<RetrievedDocument>;

    /// False when the index never loaded; drives the strategy fallback.
    fn is_available(&self) -> bool;
}

/// Retriever backed by a persisted [`VectorIndex`], or by nothing at all when
/// the index failed to load.
#[derive(Debug)]
pub enum IndexRetriever {
    Ready(VectorIndex),
    Unavailable(String),
}

impl IndexRetriever {
    /// Loads the index at `dir`. Any load failure yields `Unavailable`.
    pub fn load(dir: &Path) -> Self {
        match VectorIndex::load(dir) {
            Ok(index) => IndexRetriever::Ready(index),
            Err(e) => IndexRetriever::Unavailable(e.to_string()),
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            IndexRetriever::Ready(_) => None,
            IndexRetriever::Unavailable(reason) => Some(reason.as_str()),
        }
    }
}

impl Retriever for IndexRetriever {
    fn retrieve(&self, query: &str, k: usize) -> Vec<RetrievedDocument> {
        let index = match self {
            IndexRetriever::Ready(index) => index,
            IndexRetriever::Unavailable(reason) => {
                warn!("Retrieval skipped, index unavailable: {reason}");
                return Vec::new();
            }
        };
        index
            .search(query, k)
            .into_iter()
            .map(|(chunk, score)| RetrievedDocument {
                content: chunk.content.clone(),
                metadata: chunk.metadata.clone(),
                score,
            })
            .collect()
    }

    fn is_available(&self) -> bool {
        matches!(self, IndexRetriever::Ready(_))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Fixed-answer retriever for pipeline tests.
    pub struct StaticRetriever {
        pub available: bool,
        pub documents: Vec<RetrievedDocument>,
        pub queries: std::sync::Mutex<Vec<(String, usize)>>,
    }

    impl StaticRetriever {
        pub fn new(documents: Vec<RetrievedDocument>) -> Self {
            Self {
                available: true,
                documents,
                queries: std::sync::Mutex::new(Vec::new()),
            }
        }

        pub fn unavailable() -> Self {
            Self {
                available: false,
                ..Self::new(Vec::new())
            }
        }

        pub fn queries(&self) -> Vec<(String, usize)> {
            self.queries.lock().map(|q| q.clone()).unwrap_or_default()
        }
    }

    impl Retriever for StaticRetriever {
        fn retrieve(&self, query: &str, k: usize) -> Vec<RetrievedDocument> {
            if let Ok(mut q) = self.queries.lock() {
                q.push((query.to_string(), k));
            }
            if !self.available {
                return Vec::new();
            }
            self.documents.iter().take(k).cloned().collect()
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    pub fn doc(source: &str, chunk: usize, content: &str) -> RetrievedDocument {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), source.to_string());
        metadata.insert("chunk".to_string(), chunk.to_string());
        RetrievedDocument {
            content: content.to_string(),
            metadata,
            score: 1.0,
        }
    }
}
