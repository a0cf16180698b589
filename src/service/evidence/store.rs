//! Vector-backed evidence store
//!
//! Ingestion is destructive: each ingest builds a fresh index and replaces
//! the persisted directory entirely. Retrieval never fails; embedding or
//! index problems degrade to an empty result so the audit pipeline treats
//! them as "no evidence found".

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::EvidenceUnit;
use crate::service::evidence::chunk::chunk_text;
use crate::service::evidence::embedder::Embedder;
use crate::service::evidence::index::{compute_corpus_hash, IndexedChunk, VectorIndex};
use crate::service::evidence::{EvidenceSource, IngestError};

/// Evidence store over an embedded, directory-persisted vector index
pub struct VectorEvidenceStore {
    embedder: Arc<dyn Embedder>,
    index_dir: PathBuf,
    chunk_size: usize,
    chunk_overlap: usize,
    /// Concurrent reads are safe; ingest takes the write half for the
    /// replace, so no query ever sees a half-replaced index
    index: RwLock<Option<VectorIndex>>,
}

impl VectorEvidenceStore {
    /// Open the store, loading a previously persisted index if one exists
    pub fn open(
        embedder: Arc<dyn Embedder>,
        index_dir: impl Into<PathBuf>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        let index_dir = index_dir.into();

        let index = if index_dir.exists() {
            match VectorIndex::load(&index_dir) {
                Ok(index) => {
                    tracing::info!(
                        dir = %index_dir.display(),
                        document = %index.document,
                        chunks = index.chunk_count(),
                        "Loaded persisted evidence index"
                    );
                    Some(index)
                }
                Err(e) => {
                    tracing::warn!(
                        dir = %index_dir.display(),
                        error = %e,
                        "Failed to load persisted index, starting without one"
                    );
                    None
                }
            }
        } else {
            tracing::debug!(dir = %index_dir.display(), "No persisted index found");
            None
        };

        Self {
            embedder,
            index_dir,
            chunk_size,
            chunk_overlap,
            index: RwLock::new(index),
        }
    }

    /// Whether an index is currently available for queries
    pub async fn has_index(&self) -> bool {
        self.index.read().await.is_some()
    }

    fn document_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

#[async_trait]
impl EvidenceSource for VectorEvidenceStore {
    async fn ingest(&self, path: &Path) -> Result<usize, IngestError> {
        if !path.exists() {
            return Err(IngestError::NotFound(path.display().to_string()));
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read document");
            IngestError::Read(e)
        })?;

        let document = Self::document_name(path);
        let chunks = chunk_text(&content, self.chunk_size, self.chunk_overlap);
        tracing::info!(
            document = %document,
            chunks = chunks.len(),
            chunk_size = self.chunk_size,
            chunk_overlap = self.chunk_overlap,
            "Chunked document for ingestion"
        );

        let vectors = self
            .embedder
            .embed_batch(&chunks)
            .await
            .map_err(|e| IngestError::Embedding(e.to_string()))?;

        let indexed: Vec<IndexedChunk> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (content, vector))| IndexedChunk {
                source: format!("{}, fragmento {}", document, i + 1),
                content,
                vector,
            })
            .collect();

        let new_index = VectorIndex::new(
            document.clone(),
            compute_corpus_hash(&document, &content),
            indexed,
        );
        let chunk_count = new_index.chunk_count();

        // Exclusive access for the whole replace: queries must never see a
        // half-replaced index
        let mut guard = self.index.write().await;

        // Release the old index before deleting its storage
        let old = guard.take();
        drop(old);

        let tmp_dir = self.index_dir.with_extension("tmp");
        if tmp_dir.exists() {
            std::fs::remove_dir_all(&tmp_dir).map_err(|e| IngestError::Persist(e.to_string()))?;
        }
        new_index
            .save(&tmp_dir)
            .map_err(|e| IngestError::Persist(e.to_string()))?;

        if self.index_dir.exists() {
            std::fs::remove_dir_all(&self.index_dir)
                .map_err(|e| IngestError::Persist(e.to_string()))?;
        }
        std::fs::rename(&tmp_dir, &self.index_dir)
            .map_err(|e| IngestError::Persist(e.to_string()))?;

        *guard = Some(new_index);

        tracing::info!(
            document = %document,
            chunks = chunk_count,
            dir = %self.index_dir.display(),
            "Ingestion completed, previous index replaced"
        );

        Ok(chunk_count)
    }

    async fn retrieve(&self, query: &str, k: usize) -> Vec<EvidenceUnit> {
        let guard = self.index.read().await;

        let Some(index) = guard.as_ref() else {
            tracing::debug!("No index built, returning empty evidence");
            return Vec::new();
        };

        let query_vector = match self.embedder.embed_query(query).await {
            Ok(vector) => vector,
            Err(e) => {
                // No evidence is a valid, conservative outcome; an embedding
                // outage must not crash the deliberation
                tracing::warn!(error = %e, "Query embedding failed, returning empty evidence");
                return Vec::new();
            }
        };

        let results = index.search(&query_vector, k);
        tracing::debug!(
            query_len = query.len(),
            k = k,
            results = results.len(),
            "Evidence retrieved"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::evidence::embedder::EmbedError;
    use std::io::Write;

    /// Deterministic bag-of-characters embedder: close texts get close
    /// vectors, and identical texts get identical vectors
    struct CharFrequencyEmbedder;

    fn char_vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; 64];
        for c in text.to_lowercase().chars() {
            let slot = (c as usize) % 64;
            vector[slot] += 1.0;
        }
        vector
    }

    #[async_trait]
    impl Embedder for CharFrequencyEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(texts.iter().map(|t| char_vector(t)).collect())
        }

        async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            Ok(char_vector(text))
        }
    }

    /// Embedder that always fails, for degrade-path tests
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Err(EmbedError::Backend("offline".to_string()))
        }

        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
            Err(EmbedError::Backend("offline".to_string()))
        }
    }

    fn store_in(dir: &Path, embedder: Arc<dyn Embedder>) -> VectorEvidenceStore {
        VectorEvidenceStore::open(embedder, dir.join("index"), 80, 20)
    }

    fn write_corpus(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn retrieve_without_index_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));
        assert!(store.retrieve("x", 3).await.is_empty());
    }

    #[tokio::test]
    async fn ingest_missing_file_fails_with_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));
        let result = store.ingest(&dir.path().join("no-such-file.txt")).await;
        assert!(matches!(result, Err(IngestError::NotFound(_))));
    }

    #[tokio::test]
    async fn ingest_then_verbatim_query_ranks_its_chunk_top() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));

        let corpus = "El software como tal no es patentable en España. \
                      La marca sonora exige representación clara. \
                      El secreto industrial protege información no divulgada.";
        let path = write_corpus(dir.path(), "ley.txt", corpus);

        let count = store.ingest(&path).await.unwrap();
        assert!(count >= 1);

        let results = store
            .retrieve("El software como tal no es patentable en España.", 2)
            .await;
        assert!(!results.is_empty());
        assert!(results[0].content.contains("software"));
        // Best-first ordering
        if results.len() > 1 {
            assert!(results[0].relevance >= results[1].relevance);
        }
    }

    #[tokio::test]
    async fn repeated_retrieval_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));
        let path = write_corpus(dir.path(), "doc.txt", &"texto legal repetido. ".repeat(30));
        store.ingest(&path).await.unwrap();

        let first = store.retrieve("texto legal", 3).await;
        let second = store.retrieve("texto legal", 3).await;
        let sources_first: Vec<_> = first.iter().map(|u| &u.source).collect();
        let sources_second: Vec<_> = second.iter().map(|u| &u.source).collect();
        assert_eq!(sources_first, sources_second);
    }

    #[tokio::test]
    async fn reingest_replaces_previous_index_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));

        let first = write_corpus(dir.path(), "a.txt", "solo patentes y más patentes");
        store.ingest(&first).await.unwrap();

        let second = write_corpus(dir.path(), "b.txt", "solo marcas y más marcas");
        store.ingest(&second).await.unwrap();

        let results = store.retrieve("marcas", 5).await;
        assert!(results.iter().all(|u| u.source.starts_with("b.txt")));
    }

    #[tokio::test]
    async fn persisted_index_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(dir.path(), "doc.txt", "la ley de patentes española");
        {
            let store = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));
            store.ingest(&path).await.unwrap();
        }

        let reopened = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));
        assert!(reopened.has_index().await);
        assert!(!reopened.retrieve("patentes", 1).await.is_empty());
    }

    #[tokio::test]
    async fn embedding_outage_degrades_retrieve_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(dir.path(), "doc.txt", "contenido legal");
        {
            let store = store_in(dir.path(), Arc::new(CharFrequencyEmbedder));
            store.ingest(&path).await.unwrap();
        }

        // Same persisted index, but the embedding service is now down
        let degraded = store_in(dir.path(), Arc::new(FailingEmbedder));
        assert!(degraded.retrieve("contenido", 3).await.is_empty());
    }

    #[tokio::test]
    async fn embedding_outage_during_ingest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path(), Arc::new(FailingEmbedder));
        let path = write_corpus(dir.path(), "doc.txt", "contenido");
        let result = store.ingest(&path).await;
        assert!(matches!(result, Err(IngestError::Embedding(_))));
    }
}
