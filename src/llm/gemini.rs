//! Gemini `generateContent` API client.
//!
//! Thin HTTP wrapper for `/models/{model}:generateContent`. Pure parsing in
//! `parse_response` for testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::LlmTimeouts;
use super::types::{Content, GenerateRequest, GenerateResponse, GenerationConfig, LlmError, Part};

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let body = build_request(request);
        let url = format!("{}/models/{model}:generateContent", self.base_url);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text, model)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: &'a [Content],
    #[serde(skip_serializing_if = "is_default_config")]
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

fn is_default_config(config: &&GenerationConfig) -> bool {
    **config == GenerationConfig::default()
}

fn build_request(request: &GenerateRequest) -> ApiRequest<'_> {
    let system_instruction = request
        .system
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| SystemInstruction { parts: vec![Part::text(s)] });
    ApiRequest { system_instruction, contents: &request.contents, generation_config: &request.config }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<Usage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Usage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a `generateContent` body. Text parts of the first candidate are
/// concatenated; non-text parts are ignored. A body with no candidates is
/// not an error (safety blocks return none) and yields empty text.
pub(crate) fn parse_response(json: &str, requested_model: &str) -> Result<GenerateResponse, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let (text, finish_reason) = match api.candidates.into_iter().next() {
        Some(candidate) => {
            let text: String = candidate
                .content
                .map(|c| c.parts)
                .unwrap_or_default()
                .iter()
                .filter_map(|p| p.get("text").and_then(serde_json::Value::as_str))
                .collect();
            (text, candidate.finish_reason.unwrap_or_else(|| "STOP".into()))
        }
        None => (String::new(), "NO_CANDIDATES".into()),
    };

    let (input_tokens, output_tokens) = api
        .usage_metadata
        .map_or((0, 0), |u| (u.prompt_token_count, u.candidates_token_count));

    Ok(GenerateResponse {
        text,
        model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
        finish_reason,
        input_tokens,
        output_tokens,
    })
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
