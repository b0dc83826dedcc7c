//! Persisted vector index: load, save, build, search.
//!
//! On-disk layout is a single `index.json` inside the index directory. The
//! embedding function it was built with is recorded alongside the chunks so a
//! load can rebuild the same embedder and reject mismatched vectors.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::retrieval::chunker::TextChunker;
use crate::retrieval::embedding::{
    cosine_similarity, Embedder, EmbedderSpec, HashEmbedder, HASH_EMBEDDER_KIND,
};

pub const INDEX_FILE: &str = "index.json";
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Why an index could not be loaded. Every variant is recoverable: the
/// service keeps running without retrieval.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index not found at {0}")]
    Missing(PathBuf),

    #[error("I/O error reading index: {0}")]
    Io(#[from] std::io::Error),

    #[error("index format error: {0}")]
    Format(String),

    #[error("embedding dimension mismatch: expected {expected}, chunk {chunk_id} has {found}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        chunk_id: String,
    },
}

impl From<serde_json::Error> for IndexError {
    fn from(e: serde_json::Error) -> Self {
        IndexError::Format(e.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    embedder: EmbedderSpec,
    chunks: Vec<IndexedChunk>,
}

/// In-memory index plus the embedder that produced it.
pub struct VectorIndex {
    embedder: Box<dyn Embedder>,
    chunks: Vec<IndexedChunk>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("embedder", &self.embedder.spec())
            .field("chunks", &self.chunks.len())
            .finish()
    }
}

impl VectorIndex {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            chunks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embeds and appends one chunk.
    pub fn add(&mut self, id: String, content: String, metadata: BTreeMap<String, String>) {
        let embedding = self.embedder.embed(&content);
        self.chunks.push(IndexedChunk {
            id,
            content,
            metadata,
            embedding,
        });
    }

    /// Top-`k` chunks by cosine similarity, best first. Ties keep insertion order.
    pub fn search(&self, query: &str, k: usize) -> Vec<(&IndexedChunk, f32)> {
        if k == 0 || self.chunks.is_empty() {
            return Vec::new();
        }
        let query_embedding = self.embedder.embed(query);
        let mut scored: Vec<(&IndexedChunk, f32)> = self
            .chunks
            .iter()
            .map(|c| (c, cosine_similarity(&query_embedding, &c.embedding)))
            .collect();
        // Stable sort: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    pub fn load(dir: &Path) -> Result<Self, IndexError> {
        let path = dir.join(INDEX_FILE);
        if !path.is_file() {
            return Err(IndexError::Missing(path));
        }
        let raw = fs::read_to_string(&path)?;
        let file: IndexFile = serde_json::from_str(&raw)?;

        if file.version != INDEX_FORMAT_VERSION {
            return Err(IndexError::Format(format!(
                "unsupported index version {} (expected {INDEX_FORMAT_VERSION})",
                file.version
            )));
        }
        let embedder = embedder_from_spec(&file.embedder)?;
        for chunk in &file.chunks {
            if chunk.embedding.len() != embedder.dimension() {
                return Err(IndexError::DimensionMismatch {
                    expected: embedder.dimension(),
                    found: chunk.embedding.len(),
                    chunk_id: chunk.id.clone(),
                });
            }
        }

        info!(
            "Loaded vector index from {} ({} chunks, {} dims)",
            dir.display(),
            file.chunks.len(),
            embedder.dimension()
        );
        Ok(Self {
            embedder,
            chunks: file.chunks,
        })
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf, IndexError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(INDEX_FILE);
        let file = IndexFile {
            version: INDEX_FORMAT_VERSION,
            embedder: self.embedder.spec(),
            chunks: self.chunks.clone(),
        };
        fs::write(&path, serde_json::to_string(&file)?)?;
        info!("Wrote {} chunks to {}", self.chunks.len(), path.display());
        Ok(path)
    }
}

fn embedder_from_spec(spec: &EmbedderSpec) -> Result<Box<dyn Embedder>, IndexError> {
    match spec.kind.as_str() {
        HASH_EMBEDDER_KIND if spec.dimension > 0 => Ok(Box::new(HashEmbedder::new(spec.dimension))),
        HASH_EMBEDDER_KIND => Err(IndexError::Format("embedder dimension must be > 0".into())),
        other => Err(IndexError::Format(format!("unknown embedder kind '{other}'"))),
    }
}

/// Builds an index from every `.txt` / `.md` file directly inside `docs_dir`,
/// visited in file-name order so rebuilds are reproducible.
///
/// Chunk ids are `<file name>#<chunk index>`; metadata carries `source` and
/// `chunk`.
pub fn build_index(
    docs_dir: &Path,
    embedder: Box<dyn Embedder>,
    chunker: &TextChunker,
) -> Result<VectorIndex, IndexError> {
    if !docs_dir.is_dir() {
        return Err(IndexError::Missing(docs_dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(docs_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("txt") | Some("md")
                )
        })
        .collect();
    files.sort();

    let mut index = VectorIndex::new(embedder);
    for path in files {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!("Skipping {}: not valid UTF-8", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let chunks = chunker.chunk(&text);
        debug!("{source}: {} chunks", chunks.len());
        for chunk in chunks {
            let mut metadata = BTreeMap::new();
            metadata.insert("source".to_string(), source.clone());
            metadata.insert("chunk".to_string(), chunk.index.to_string());
            index.add(format!("{source}#{}", chunk.index), chunk.text, metadata);
        }
    }
    Ok(index)
}
