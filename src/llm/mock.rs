//! Scripted `LlmChat` for tests.

use std::sync::Mutex;

use super::types::{GenerateRequest, GenerateResponse, LlmChat, LlmError};

/// Replays queued results in order and records every request it sees.
/// Once the queue is empty it answers with an empty reply.
#[derive(Default)]
pub struct MockLlm {
    responses: Mutex<Vec<Result<GenerateResponse, LlmError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockLlm {
    pub fn new(responses: Vec<Result<GenerateResponse, LlmError>>) -> Self {
        Self { responses: Mutex::new(responses), requests: Mutex::default() }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(text_response(t))).collect())
    }

    pub fn failing() -> Self {
        Self::new(vec![Err(LlmError::ApiResponse { status: 503, body: "overloaded".into() })])
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> GenerateRequest {
        self.requests().pop().expect("no request recorded")
    }
}

pub fn text_response(text: &str) -> GenerateResponse {
    GenerateResponse {
        text: text.into(),
        model: "mock".into(),
        finish_reason: "STOP".into(),
        input_tokens: 0,
        output_tokens: 0,
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() { Ok(text_response("")) } else { responses.remove(0) }
    }
}
