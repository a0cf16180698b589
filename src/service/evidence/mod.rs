//! Evidence sources for grounding deliberation
//!
//! One trait, two interchangeable backends selected by configuration: the
//! canned [`StubEvidenceSource`] for development without a corpus, and the
//! embedded [`store::VectorEvidenceStore`] for real retrieval.

pub mod chunk;
pub mod embedder;
pub mod index;
pub mod store;

use async_trait::async_trait;
use std::path::Path;

use crate::model::EvidenceUnit;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error("Source file not found: {0}")]
    NotFound(String),

    #[error("Failed to read source document: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to embed document chunks: {0}")]
    Embedding(String),

    #[error("Failed to replace persisted index: {0}")]
    Persist(String),
}

/// A backend answering similarity queries over a legal corpus
///
/// Ingestion failures surface to the caller; retrieval failures never do.
/// `retrieve` degrades to an empty list on any backend problem, because the
/// audit pipeline treats "no evidence" as a valid, conservative outcome.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Ingest a document, replacing any previously ingested corpus.
    /// Returns the number of indexed chunks.
    async fn ingest(&self, path: &Path) -> Result<usize, IngestError>;

    /// Top-k evidence for a query, best first, deterministic against an
    /// unchanged corpus. Empty when no corpus is loaded or the backend is
    /// unavailable.
    async fn retrieve(&self, query: &str, k: usize) -> Vec<EvidenceUnit>;
}

/// Canned legal excerpts with fixed relevance scores
///
/// Stands in for the vector store when no embedding service is available;
/// ingestion is accepted but ignored.
pub struct StubEvidenceSource;

/// (source, content, relevance) triples, best first
const STUB_EXCERPTS: &[(&str, &str, f32)] = &[
    (
        "Ley 24/2015, Art. 4.5",
        "En España, el software como tal no es patentable salvo que aporte una contribución técnica.",
        0.92,
    ),
    (
        "Sentencia CJEU C-406/13",
        "El CJEU aclara que la idea subyacente no es patentable si no cumple requisitos técnicos.",
        0.85,
    ),
    (
        "OEPM - Guía de Patentes",
        "La Oficina Española de Patentes y Marcas establece que el software necesita un elemento técnico adicional.",
        0.81,
    ),
];

#[async_trait]
impl EvidenceSource for StubEvidenceSource {
    async fn ingest(&self, path: &Path) -> Result<usize, IngestError> {
        if !path.exists() {
            return Err(IngestError::NotFound(path.display().to_string()));
        }
        tracing::warn!(
            path = %path.display(),
            "Stub evidence backend ignores ingested documents"
        );
        Ok(0)
    }

    async fn retrieve(&self, _query: &str, k: usize) -> Vec<EvidenceUnit> {
        STUB_EXCERPTS
            .iter()
            .take(k)
            .map(|(source, content, relevance)| EvidenceUnit {
                content: content.to_string(),
                source: source.to_string(),
                relevance: *relevance,
            })
            .collect()
    }
}
