//! LLM — adapter for the generative-AI collaborator.
//!
//! DESIGN
//! ======
//! Everything that talks to the model goes through the [`LlmChat`] trait so
//! the tutor, the review, and the gateway services can be exercised against a
//! mock. [`LlmClient`] is the production implementation backed by Gemini and
//! configured from environment variables.

pub mod config;
pub mod gemini;
pub mod schema;
pub mod types;

#[cfg(test)]
pub mod mock;

use config::LlmConfig;
pub use types::LlmChat;
use types::{GenerateRequest, GenerateResponse, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client bound to one model.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: gemini::GeminiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model name (e.g. `"gemini-2.0-flash"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let response = self.inner.generate(&self.model, request).await?;
        tracing::debug!(
            model = %response.model,
            finish_reason = %response.finish_reason,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "llm: response"
        );
        Ok(response)
    }
}
