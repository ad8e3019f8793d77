//! Shared gateway state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! immutable after startup: handlers share the optional model client and the
//! TTS URL builder and keep nothing between requests.

use std::sync::Arc;

use crate::error::ApiError;
use crate::llm::LlmChat;
use crate::tts::TtsUrlBuilder;

/// Shared application state. Clone is required by Axum; every field is
/// `Arc`-wrapped or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Optional model client. `None` if no API key is configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub tts: TtsUrlBuilder,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, tts: TtsUrlBuilder) -> Self {
        Self { llm, tts }
    }

    /// The model client, or a generic 500 naming `failure` when AI is off.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] if no client is configured.
    pub fn require_llm(&self, failure: &'static str) -> Result<&dyn LlmChat, ApiError> {
        match &self.llm {
            Some(llm) => Ok(llm.as_ref()),
            None => {
                tracing::warn!("{failure}: AI features are not configured");
                Err(ApiError::Upstream(failure))
            }
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
