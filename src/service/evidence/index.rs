//! In-memory cosine index with directory persistence
//!
//! One index per ingested corpus. The serialized form lives in a single
//! JSON file inside the index directory; the store replaces the whole
//! directory atomically on re-ingest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::model::EvidenceUnit;

const INDEX_FILE: &str = "index.json";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IndexError {
    #[error("Index I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index serialization failed: {0}")]
    Serialization(String),
}

/// One embedded chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub content: String,
    pub source: String,
    pub vector: Vec<f32>,
}

/// A complete embedded corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Display name of the ingested document
    pub document: String,
    /// Fingerprint of document name + content, for change detection
    pub corpus_hash: String,
    /// Embedding dimensionality all chunks share
    pub dimensions: usize,
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    pub fn new(document: String, corpus_hash: String, chunks: Vec<IndexedChunk>) -> Self {
        let dimensions = chunks.first().map(|c| c.vector.len()).unwrap_or(0);
        Self {
            document,
            corpus_hash,
            dimensions,
            chunks,
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Top-k chunks by cosine similarity to `query_vector`
    ///
    /// Ordered best-first; ties broken by chunk insertion order. The
    /// ordering is total (`total_cmp`), so repeated queries against an
    /// unchanged index return identical lists.
    pub fn search(&self, query_vector: &[f32], k: usize) -> Vec<EvidenceUnit> {
        let mut scored: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (i, cosine_similarity(query_vector, &chunk.vector)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .take(k)
            .map(|(i, score)| EvidenceUnit {
                content: self.chunks[i].content.clone(),
                source: self.chunks[i].source.clone(),
                relevance: score,
            })
            .collect()
    }

    /// Write the index into `dir`, creating the directory if needed
    pub fn save(&self, dir: &Path) -> Result<(), IndexError> {
        fs::create_dir_all(dir)?;
        let json = serde_json::to_vec(self).map_err(|e| IndexError::Serialization(e.to_string()))?;
        fs::write(dir.join(INDEX_FILE), json)?;
        Ok(())
    }

    /// Load the index persisted in `dir`
    pub fn load(dir: &Path) -> Result<Self, IndexError> {
        let bytes = fs::read(dir.join(INDEX_FILE))?;
        serde_json::from_slice(&bytes).map_err(|e| IndexError::Serialization(e.to_string()))
    }
}

/// Cosine similarity in [-1, 1]; 0 for mismatched dimensions or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// SHA256 fingerprint of document name + content
pub fn compute_corpus_hash(document: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
