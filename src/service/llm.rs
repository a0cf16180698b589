//! Shared LLM client and interaction utilities
//!
//! Provides a common interface for OpenAI API interactions used across
//! the generation, judging and embedding services.

use rig::providers::openai;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::new(api_key);

        Ok(Self { client })
    }

    /// Create a client from `OPENAI_API_KEY`, if set
    ///
    /// Returns `None` when the key is absent so the caller can run in
    /// degraded mode instead of aborting startup.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var(ENV_OPENAI_API_KEY).ok()?;
        match Self::new(&key) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "OPENAI_API_KEY is set but the client could not be created");
                None
            }
        }
    }

    /// Get a reference to the underlying OpenAI client
    /// Use this to create extractors or embedding models with custom configuration
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}
