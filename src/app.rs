//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency
//! injection, making it easier to manage the application lifecycle and
//! test services.

use std::sync::Arc;

use crate::model::{Config, EvidenceBackend};
use crate::service::audit::ClaimAuditor;
use crate::service::context::ContextGenerator;
use crate::service::evidence::embedder::OpenAiEmbedder;
use crate::service::evidence::store::VectorEvidenceStore;
use crate::service::evidence::{EvidenceSource, StubEvidenceSource};
use crate::service::generation::{GenerationBackend, OpenAiBackend};
use crate::service::inquiry::InquiryEngine;
use crate::service::llm::LlmClient;
use crate::service::session::DeliberationService;

/// Application state containing all services and shared resources
pub struct AppState {
    pub config: Config,
    /// Evidence backend serving ingest and retrieval
    pub evidence: Arc<dyn EvidenceSource>,
    /// The concrete vector store when the vector backend is active, for
    /// readiness reporting
    pub vector_store: Option<Arc<VectorEvidenceStore>>,
    /// End-to-end deliberation pipeline
    pub deliberation: DeliberationService,
    /// Standalone claim auditor for the audits endpoint
    pub auditor: ClaimAuditor,
    /// Whether a generation/judge backend is configured
    pub llm_available: bool,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// A missing `OPENAI_API_KEY` puts the service into degraded mode:
    /// expansion flags nodes as service-unavailable and audits fail closed,
    /// but the process starts and serves requests.
    pub fn new(config: Config) -> Self {
        let llm_client = LlmClient::from_env();
        if llm_client.is_none() {
            tracing::warn!(
                "OPENAI_API_KEY not set, running degraded: no generation, judging or embeddings"
            );
        }

        let generation = Self::build_generation_backend(&config, llm_client.as_ref());
        let (evidence, vector_store) = Self::build_evidence_source(&config, llm_client.as_ref());

        let deliberation = DeliberationService::new(
            InquiryEngine::new(
                Arc::clone(&evidence),
                generation.clone(),
                config.engine.clone(),
            ),
            ContextGenerator::new(Arc::clone(&evidence), generation.clone(), config.engine.top_k),
            ClaimAuditor::new(generation.clone()),
        );

        Self {
            evidence,
            vector_store,
            deliberation,
            auditor: ClaimAuditor::new(generation.clone()),
            llm_available: generation.is_some(),
            config,
        }
    }

    fn build_generation_backend(
        config: &Config,
        llm_client: Option<&LlmClient>,
    ) -> Option<Arc<dyn GenerationBackend>> {
        llm_client.map(|client| {
            Arc::new(OpenAiBackend::new(
                client.clone(),
                &config.llm.generation_model,
                &config.llm.judge_model,
                config.llm.request_timeout_secs,
            )) as Arc<dyn GenerationBackend>
        })
    }

    fn build_evidence_source(
        config: &Config,
        llm_client: Option<&LlmClient>,
    ) -> (Arc<dyn EvidenceSource>, Option<Arc<VectorEvidenceStore>>) {
        match config.store.backend {
            EvidenceBackend::Stub => {
                tracing::info!("Using stub evidence backend");
                (Arc::new(StubEvidenceSource), None)
            }
            EvidenceBackend::Vector => match llm_client {
                Some(client) => {
                    let embedder = Arc::new(OpenAiEmbedder::new(
                        client.clone(),
                        &config.llm.embedding_model,
                    ));
                    let store = Arc::new(VectorEvidenceStore::open(
                        embedder,
                        &config.store.index_dir,
                        config.store.chunk_size,
                        config.store.chunk_overlap,
                    ));
                    (
                        Arc::clone(&store) as Arc<dyn EvidenceSource>,
                        Some(store),
                    )
                }
                None => {
                    tracing::warn!(
                        "Vector evidence backend configured without an embedding credential, \
                         falling back to the stub backend"
                    );
                    (Arc::new(StubEvidenceSource), None)
                }
            },
        }
    }
}
