//! Context generation for a single deliberation node
//!
//! Retrieves evidence, asks the generation backend for a grounded answer,
//! and computes a preliminary validation status from the retrieved excerpt
//! text. Falls back to a clearly labeled general-knowledge answer when the
//! corpus has nothing for the question.

pub mod heuristics;

use std::sync::Arc;

use crate::model::{grounding_block, source_label, EvidenceUnit, ValidationStatus};
use crate::service::evidence::EvidenceSource;
use crate::service::generation::GenerationBackend;

use heuristics::preliminary_status;

/// Source label for answers produced without corpus evidence
pub const UNVERIFIED_SOURCE_LABEL: &str =
    "Conocimiento general (sin verificar contra el corpus)";

/// Mandatory disclaimer appended to every ungrounded answer
pub const UNVERIFIED_DISCLAIMER: &str =
    "\n\n[Aviso: respuesta generada sin respaldo documental; no verificada contra el corpus.]";

/// Placeholder answer when the generation backend is missing or failed
pub const GENERATION_UNAVAILABLE_PLACEHOLDER: &str =
    "[Generación no disponible: el servicio de lenguaje no respondió]";

/// A generated, preliminarily validated answer for one node
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub question: String,
    pub answer: String,
    pub source_label: String,
    /// Evidence shown to the generation step; empty for fallback answers
    pub evidence: Vec<EvidenceUnit>,
    /// Concatenated excerpt text the validation was computed against
    pub grounding: String,
    pub status: ValidationStatus,
}

impl NodeContext {
    pub fn evidence_present(&self) -> bool {
        !self.evidence.is_empty()
    }
}

/// Generates grounded (or fallback) context per node
pub struct ContextGenerator {
    evidence: Arc<dyn EvidenceSource>,
    generation: Option<Arc<dyn GenerationBackend>>,
    top_k: usize,
}

impl ContextGenerator {
    pub fn new(
        evidence: Arc<dyn EvidenceSource>,
        generation: Option<Arc<dyn GenerationBackend>>,
        top_k: usize,
    ) -> Self {
        Self {
            evidence,
            generation,
            top_k: top_k.max(1),
        }
    }

    /// Generate context for one node question
    pub async fn generate(&self, question: &str) -> NodeContext {
        let evidence = self.evidence.retrieve(question, self.top_k).await;

        if evidence.is_empty() {
            return self.generate_fallback(question).await;
        }

        self.generate_grounded(question, evidence).await
    }

    async fn generate_grounded(&self, question: &str, evidence: Vec<EvidenceUnit>) -> NodeContext {
        let prompt_block = grounding_block(&evidence);
        // Validation is computed against the retrieved excerpts, never
        // against the model's own prose, so a claim cannot validate itself
        let grounding: String = evidence
            .iter()
            .map(|u| u.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let answer = match self.generation.as_ref() {
            Some(generation) => match generation
                .generate_grounded_answer(question, &prompt_block)
                .await
            {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!(error = %e, "Grounded answer generation failed");
                    GENERATION_UNAVAILABLE_PLACEHOLDER.to_string()
                }
            },
            None => {
                tracing::warn!("No generation backend configured for grounded answer");
                GENERATION_UNAVAILABLE_PLACEHOLDER.to_string()
            }
        };

        let status = if answer == GENERATION_UNAVAILABLE_PLACEHOLDER {
            // No claim was produced, so there is nothing to validate
            ValidationStatus::NotValidated
        } else {
            preliminary_status(&grounding)
        };

        tracing::debug!(
            evidence_count = evidence.len(),
            status = %status,
            "Generated grounded context"
        );

        NodeContext {
            question: question.to_string(),
            answer,
            source_label: source_label(&evidence),
            evidence,
            grounding,
            status,
        }
    }

    async fn generate_fallback(&self, question: &str) -> NodeContext {
        let answer = match self.generation.as_ref() {
            Some(generation) => match generation.generate_general_answer(question).await {
                Ok(answer) => format!("{answer}{UNVERIFIED_DISCLAIMER}"),
                Err(e) => {
                    tracing::warn!(error = %e, "Fallback answer generation failed");
                    GENERATION_UNAVAILABLE_PLACEHOLDER.to_string()
                }
            },
            None => {
                tracing::warn!("No generation backend configured for fallback answer");
                GENERATION_UNAVAILABLE_PLACEHOLDER.to_string()
            }
        };

        tracing::debug!("Generated ungrounded fallback context");

        // No evidence: the status is forced, regardless of answer content
        NodeContext {
            question: question.to_string(),
            answer,
            source_label: UNVERIFIED_SOURCE_LABEL.to_string(),
            evidence: Vec::new(),
            grounding: String::new(),
            status: ValidationStatus::NotValidated,
        }
    }
}
