//! Embedding provider seam
//!
//! The vector store depends on this trait, not on a provider, so tests can
//! use a deterministic embedder and a service outage degrades instead of
//! crashing retrieval.

use async_trait::async_trait;
use rig::embeddings::EmbeddingModel;

use crate::service::llm::LlmClient;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EmbedError {
    #[error("Embedding request failed: {0}")]
    Backend(String),

    #[error("Embedding backend returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
}

/// Turns text into fixed-dimension vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of chunks, one vector per input, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query string
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// OpenAI embeddings over the shared [`LlmClient`]
pub struct OpenAiEmbedder {
    llm_client: LlmClient,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(llm_client: LlmClient, model: &str) -> Self {
        tracing::info!(model = %model, "Embedding backend initialized");
        Self {
            llm_client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let model = self.llm_client.openai_client().embedding_model(&self.model);

        let embeddings = model
            .embed_texts(texts.to_vec())
            .await
            .map_err(|e| EmbedError::Backend(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                expected: texts.len(),
                got: embeddings.len(),
            });
        }

        Ok(embeddings
            .into_iter()
            .map(|e| e.vec.into_iter().map(|v| v as f32).collect())
            .collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let model = self.llm_client.openai_client().embedding_model(&self.model);

        let embedding = model
            .embed_text(text)
            .await
            .map_err(|e| EmbedError::Backend(e.to_string()))?;

        Ok(embedding.vec.into_iter().map(|v| v as f32).collect())
    }
}
