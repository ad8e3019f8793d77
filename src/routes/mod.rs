//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway is a thin translation layer: each `/api` route decodes one
//! request body, makes one collaborator call (model or TTS URL builder), and
//! answers with a `{type, ...payload}` envelope. Bodies are decoded leniently
//! (an empty body reads as `{}`) so missing fields surface as the route's own
//! 400 message rather than an extractor rejection.

pub mod chat;
pub mod exercise;
pub mod speech;

use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::services::exercise::{Evaluation, MatchPairsExercise};
use crate::state::AppState;

pub const BANNER: &str = "VaaniAI Backend is running!";

/// Full gateway router with CORS, request tracing, and a body limit.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(banner))
        .route("/healthz", get(healthz))
        .route("/api/stt", post(speech::stt))
        .route("/api/tts", post(speech::tts))
        .route("/api/chat", post(chat::chat))
        .route("/api/exercise/match-pairs", post(exercise::match_pairs))
        .route("/api/exercise/evaluate", post(exercise::evaluate))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn banner() -> &'static str {
    BANNER
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Every successful response: `{"type": "<kind>", ...payload}`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    SttResult { transcript: String, confidence: f32 },
    TtsResult { text: String, audio_url: String },
    ChatResponse { reply: String },
    MatchPairsExercise(MatchPairsExercise),
    ExerciseResult(Evaluation),
}

/// Decode a JSON body; an empty body reads as `T::default()`.
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
