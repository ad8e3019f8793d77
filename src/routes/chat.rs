//! `/api/chat` — general tutor chat.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;

use super::{Envelope, parse_body};
use crate::error::ApiError;
use crate::services::tutor::{self, ChatTurn};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Model failures degrade to a canned reply; only a missing model is a 500.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope>, ApiError> {
    let request: ChatRequest = parse_body(&body)?;
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".into()))?;

    let llm = state.require_llm("Chat failed")?;
    let reply = tutor::chat_reply(llm, &message, &request.history).await;
    Ok(Json(Envelope::ChatResponse { reply }))
}
