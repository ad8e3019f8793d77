//! LLM configuration parsed from environment variables.

use super::types::LlmError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Accepted API key variables, checked in order. First non-empty value wins.
pub const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "VITE_GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Required (first non-empty wins):
    /// - `GEMINI_API_KEY`, `VITE_GEMINI_API_KEY`, `API_KEY`
    ///
    /// Optional:
    /// - `GEMINI_MODEL`: default `gemini-2.0-flash`
    /// - `GEMINI_BASE_URL`: default Generative Language API v1beta
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when no key variable is set, or
    /// [`LlmError::ConfigParse`] for an unparsable timeout.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmConfig::from_env`] but reads through `lookup`, so tests
    /// never touch process-global environment.
    ///
    /// # Errors
    ///
    /// See [`LlmConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| non_empty(*var))
            .ok_or_else(|| LlmError::MissingApiKey { vars: API_KEY_VARS.join(", ") })?;

        let model = non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url = non_empty("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = LlmTimeouts {
            request_secs: parse_secs(non_empty("LLM_REQUEST_TIMEOUT_SECS"), "LLM_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_secs(non_empty("LLM_CONNECT_TIMEOUT_SECS"), "LLM_CONNECT_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, model, base_url, timeouts })
    }
}

fn parse_secs(raw: Option<String>, key: &str) -> Result<Option<u64>, LlmError> {
    raw.map(|v| {
        v.trim()
            .parse::<u64>()
            .map_err(|_| LlmError::ConfigParse(format!("{key} must be a whole number of seconds, got '{v}'")))
    })
    .transpose()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
