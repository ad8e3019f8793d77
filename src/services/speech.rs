//! Speech-to-text through the multimodal model.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{Content, GenerateRequest, InlineData, LlmError, Part, Role};

const TRANSCRIBE_PROMPT: &str = "Transcribe this audio exactly. Return ONLY the text.";

/// The model reports no per-word confidence; every transcript gets this.
pub const TRANSCRIPT_CONFIDENCE: f32 = 0.95;

pub const DEFAULT_AUDIO_MIME: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("transcription failed: {0}")]
    Llm(#[from] LlmError),
}

impl ErrorCode for SpeechError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Llm(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub transcript: String,
    pub confidence: f32,
}

pub(crate) fn transcribe_request(audio: &[u8], mime_type: &str) -> GenerateRequest {
    let audio_part = Part::InlineData {
        inline_data: InlineData { mime_type: mime_type.to_string(), data: STANDARD.encode(audio) },
    };
    GenerateRequest {
        contents: vec![Content { role: Role::User, parts: vec![audio_part, Part::text(TRANSCRIBE_PROMPT)] }],
        ..GenerateRequest::default()
    }
}

/// Transcribe `audio`. A reply with no text is an empty transcript.
///
/// # Errors
///
/// Returns [`SpeechError::Llm`] if the model call fails.
pub async fn transcribe(llm: &dyn LlmChat, audio: &[u8], mime_type: &str) -> Result<Transcript, SpeechError> {
    let response = llm.generate(&transcribe_request(audio, mime_type)).await?;
    let transcript = response.text.trim().to_string();
    tracing::info!(bytes = audio.len(), mime_type, chars = transcript.len(), "stt: transcribed");
    Ok(Transcript { transcript, confidence: TRANSCRIPT_CONFIDENCE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockLlm;

    #[tokio::test]
    async fn transcribe_trims_model_text() {
        let llm = MockLlm::replying(&["  hola mundo \n"]);
        let result = transcribe(&llm, b"RIFF....", "audio/wav").await.unwrap();
        assert_eq!(result.transcript, "hola mundo");
        assert!((result.confidence - 0.95).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn transcribe_sends_inline_base64_audio_then_prompt() {
        let llm = MockLlm::replying(&["x"]);
        transcribe(&llm, b"abc", "audio/webm").await.unwrap();
        let request = llm.last_request();
        let parts = &request.contents[0].parts;
        assert_eq!(
            parts[0],
            Part::InlineData { inline_data: InlineData { mime_type: "audio/webm".into(), data: "YWJj".into() } }
        );
        assert_eq!(parts[1], Part::text(TRANSCRIBE_PROMPT));
    }

    #[tokio::test]
    async fn empty_reply_is_empty_transcript() {
        let llm = MockLlm::replying(&[""]);
        assert_eq!(transcribe(&llm, b"a", "audio/wav").await.unwrap().transcript, "");
    }

    #[tokio::test]
    async fn provider_error_propagates() {
        let err = transcribe(&MockLlm::failing(), b"a", "audio/wav").await.unwrap_err();
        assert_eq!(err.error_code(), "E_API_RESPONSE");
        assert!(err.retryable());
    }
}
