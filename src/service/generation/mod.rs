//! Text-generation and judging backend
//!
//! Single seam to the external language service. The deliberation services
//! depend on the [`GenerationBackend`] trait, not on a provider, so tests
//! can script deterministic backends and a missing credential degrades to a
//! flagged placeholder instead of a crash.

use async_trait::async_trait;
use std::time::Duration;

use crate::model::generation::{GroundedAnswer, SubquestionList};
use crate::model::RawVerdict;
use crate::service::llm::LlmClient;

pub mod prompts;

use prompts::{
    build_decomposition_prompt, build_fallback_prompt, build_grounded_answer_prompt,
    build_judge_prompt, DECOMPOSITION_SYSTEM_PROMPT, FALLBACK_ANSWER_SYSTEM_PROMPT,
    GROUNDED_ANSWER_SYSTEM_PROMPT, JUDGE_SYSTEM_PROMPT,
};

/// Environment variable overriding the decomposition/answer model
const ENV_GENERATION_MODEL: &str = "DELIB_GENERATION_MODEL";

/// Environment variable overriding the judge model
const ENV_JUDGE_MODEL: &str = "DELIB_JUDGE_MODEL";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("Generation call failed: {0}")]
    Backend(String),

    #[error("Generation call timed out after {0}s")]
    Timeout(u64),
}

/// External language capability consumed by the deliberation core
///
/// All methods are blocking network requests from the caller's point of
/// view; failures are returned, never panicked, and callers degrade per
/// their own rules (empty child list, flagged placeholder, fail-closed
/// verdict).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Decompose `question` into sub-questions grounded in `grounding`.
    /// `concepts` are extracted domain terms used as decomposition hints.
    async fn generate_subquestions(
        &self,
        question: &str,
        grounding: &str,
        width: usize,
        concepts: &[String],
    ) -> Result<Vec<String>, GenerationError>;

    /// Answer `question` using only `grounding`
    async fn generate_grounded_answer(
        &self,
        question: &str,
        grounding: &str,
    ) -> Result<String, GenerationError>;

    /// Answer `question` from general domain knowledge (no corpus)
    async fn generate_general_answer(&self, question: &str) -> Result<String, GenerationError>;

    /// Judge a (claim, evidence) pair; the label is returned raw and the
    /// auditor coerces it
    async fn judge_claim(&self, claim: &str, evidence: &str)
        -> Result<RawVerdict, GenerationError>;
}

/// OpenAI-backed implementation over the shared [`LlmClient`]
pub struct OpenAiBackend {
    llm_client: LlmClient,
    generation_model: String,
    judge_model: String,
    request_timeout: Duration,
}

impl OpenAiBackend {
    /// Create a backend with the configured models
    ///
    /// `DELIB_GENERATION_MODEL` and `DELIB_JUDGE_MODEL` override the
    /// configured model names.
    pub fn new(
        llm_client: LlmClient,
        generation_model: &str,
        judge_model: &str,
        request_timeout_secs: u64,
    ) -> Self {
        let generation_model = std::env::var(ENV_GENERATION_MODEL)
            .unwrap_or_else(|_| generation_model.to_string());
        let judge_model =
            std::env::var(ENV_JUDGE_MODEL).unwrap_or_else(|_| judge_model.to_string());

        tracing::info!(
            generation_model = %generation_model,
            judge_model = %judge_model,
            timeout_secs = request_timeout_secs,
            "Generation backend initialized"
        );

        Self {
            llm_client,
            generation_model,
            judge_model,
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }

    /// Run one structured extraction with the per-call timeout applied
    async fn extract<T>(
        &self,
        model: &str,
        preamble: &str,
        prompt: &str,
        operation: &str,
    ) -> Result<T, GenerationError>
    where
        T: schemars::JsonSchema + for<'a> serde::Deserialize<'a> + serde::Serialize + Send + Sync,
    {
        let start_time = std::time::Instant::now();

        // Use temperature=0.0 and seed for deterministic, reproducible outputs
        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<T>(model)
            .preamble(preamble)
            .additional_params(serde_json::json!({
                "temperature": 0.0,
                "seed": 42
            }))
            .build();

        let extracted = tokio::time::timeout(self.request_timeout, extractor.extract(prompt))
            .await
            .map_err(|_| {
                tracing::warn!(
                    operation = operation,
                    model = %model,
                    timeout_secs = self.request_timeout.as_secs(),
                    "OpenAI API call timed out"
                );
                GenerationError::Timeout(self.request_timeout.as_secs())
            })?;

        match extracted {
            Ok(result) => {
                let elapsed = start_time.elapsed();
                tracing::debug!(
                    operation = operation,
                    model = %model,
                    elapsed_ms = elapsed.as_millis(),
                    "OpenAI API call completed successfully"
                );
                Ok(result)
            }
            Err(e) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    operation = operation,
                    model = %model,
                    elapsed_ms = elapsed.as_millis(),
                    error = %e,
                    "OpenAI API call failed"
                );
                Err(GenerationError::Backend(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate_subquestions(
        &self,
        question: &str,
        grounding: &str,
        width: usize,
        concepts: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        let prompt = build_decomposition_prompt(question, grounding, width, concepts);

        let list: SubquestionList = self
            .extract(
                &self.generation_model,
                DECOMPOSITION_SYSTEM_PROMPT,
                &prompt,
                "decomposition",
            )
            .await?;

        Ok(list.questions)
    }

    async fn generate_grounded_answer(
        &self,
        question: &str,
        grounding: &str,
    ) -> Result<String, GenerationError> {
        let prompt = build_grounded_answer_prompt(question, grounding);

        let answer: GroundedAnswer = self
            .extract(
                &self.generation_model,
                GROUNDED_ANSWER_SYSTEM_PROMPT,
                &prompt,
                "grounded_answer",
            )
            .await?;

        Ok(answer.answer)
    }

    async fn generate_general_answer(&self, question: &str) -> Result<String, GenerationError> {
        let prompt = build_fallback_prompt(question);

        let answer: GroundedAnswer = self
            .extract(
                &self.generation_model,
                FALLBACK_ANSWER_SYSTEM_PROMPT,
                &prompt,
                "fallback_answer",
            )
            .await?;

        Ok(answer.answer)
    }

    async fn judge_claim(
        &self,
        claim: &str,
        evidence: &str,
    ) -> Result<RawVerdict, GenerationError> {
        let prompt = build_judge_prompt(claim, evidence);

        self.extract(&self.judge_model, JUDGE_SYSTEM_PROMPT, &prompt, "judge")
            .await
    }
}
