//! Services — learner-side orchestration and the gateway's collaborator calls.
//!
//! `tutor`, `conversation` and `community` drive the terminal client against
//! the local repository. `speech` and `exercise` (plus `tutor::chat_reply`)
//! back the HTTP gateway and hold no state between calls.

pub mod community;
pub mod conversation;
pub mod exercise;
pub mod speech;
pub mod tutor;

use serde::de::DeserializeOwned;

/// Decode a JSON reply from the model, tolerating a surrounding markdown
/// code fence.
pub(crate) fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(text))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}
