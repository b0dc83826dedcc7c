//! Embedding functions.
//!
//! `HashEmbedder` is a placeholder: it hashes tokens into buckets (the
//! "hashing trick") so that texts sharing words land close together. It has no
//! learned semantics. It exists so the index can be built, persisted and
//! queried end to end without a model runtime.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
    fn dimension(&self) -> usize;
    fn spec(&self) -> EmbedderSpec;
}

/// Persisted description of the embedding function an index was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedderSpec {
    pub kind: String,
    pub dimension: usize,
}

pub const HASH_EMBEDDER_KIND: &str = "hash";

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let bucket = u64::from_le_bytes([
                digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6],
                digest[7],
            ]) as usize
                % self.dimension;
            // Sign bit halves collision bias.
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        normalize(&mut vector);
        vector
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn spec(&self) -> EmbedderSpec {
        EmbedderSpec {
            kind: HASH_EMBEDDER_KIND.to_string(),
            dimension: self.dimension,
        }
    }
}

/// Lower-cased alphanumeric tokens. The apostrophe-like glottal stop (puso)
/// stays inside the word: "ha'e" is one token.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '\'' | '’' | 'ʼ')))
        .map(|t| t.trim_matches(|c| matches!(c, '\'' | '’' | 'ʼ')))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity in [-1, 1]; 0.0 for empty or mismatched vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }
    (dot / denom) as f32
}
