//! Tutor — conversation replies and post-session review.
//!
//! DESIGN
//! ======
//! Neither operation ever fails. Tutor replies degrade to a canned line when
//! the model errors or says nothing; reviews degrade to an empty review with
//! zero confidence when the reply is missing or does not match the declared
//! schema. Failures are logged with their error code and swallowed here so
//! the chat screen and the gateway stay simple.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::schema::review_schema;
use crate::llm::types::{Content, GenerateRequest, GenerationConfig, Role};
use crate::store::models::{Goal, Language, LearningMode, Message, MessageRole, Persona};

pub const TUTOR_EMPTY_FALLBACK: &str = "Let's try that again!";
pub const TUTOR_ERROR_FALLBACK: &str = "I'm having a small connection hiccup. Can you repeat that?";
pub const CHAT_EMPTY_FALLBACK: &str = "I didn't catch that, could you say it again?";
pub const CHAT_ERROR_FALLBACK: &str = "I'm having a little trouble thinking right now.";

const TUTOR_TEMPERATURE: f32 = 0.8;

// =============================================================================
// TUTOR REPLY
// =============================================================================

/// Who the tutor is talking to and how.
#[derive(Debug, Clone, Copy)]
pub struct TutorProfile<'a> {
    pub language: &'a Language,
    pub mode: LearningMode,
    pub persona: Persona,
    pub goal: Goal,
}

pub(crate) fn build_system_prompt(profile: &TutorProfile<'_>) -> String {
    let name = &profile.language.name;
    let register = match profile.persona {
        Persona::Child => "Use simple words, emojis and an excited tone.",
        Persona::Elder => "Be very patient and respectful; use clear, classic phrasing.",
        Persona::Professional => "Use business vocabulary and a formal tone.",
        Persona::Student => "Be friendly and clear.",
    };
    format!(
        "You are a friendly language tutor.\n\
         Target language: {name}.\n\
         Learner persona: {persona}. {register}\n\
         Learner goal: {goal}.\n\
         Practice mode: {mode:?}.\n\
         Encourage, never shame. Let the learner mix languages. Reply mainly in {name} \
         with an English translation in brackets, and keep the conversation moving.",
        persona = profile.persona,
        goal = profile.goal,
        mode = profile.mode,
    )
}

/// Replay user/model turns in order; peer messages are dropped.
pub(crate) fn dialogue_contents(history: &[Message]) -> Vec<Content> {
    history
        .iter()
        .filter_map(|msg| {
            let role = match msg.role {
                MessageRole::User => Role::User,
                MessageRole::Model => Role::Model,
                MessageRole::Peer => return None,
            };
            Some(Content::text(role, msg.content.clone()))
        })
        .collect()
}

/// Ask the tutor for its next turn. Always returns displayable text.
pub async fn generate_tutor_response(
    llm: &dyn LlmChat,
    profile: &TutorProfile<'_>,
    message: &str,
    history: &[Message],
) -> String {
    let mut contents = dialogue_contents(history);
    contents.push(Content::text(Role::User, message));
    let request = GenerateRequest {
        system: Some(build_system_prompt(profile)),
        contents,
        config: GenerationConfig { temperature: Some(TUTOR_TEMPERATURE), ..GenerationConfig::default() },
    };

    match llm.generate(&request).await {
        Ok(response) => response.text().map_or_else(|| TUTOR_EMPTY_FALLBACK.to_string(), str::to_string),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "tutor: reply failed");
            TUTOR_ERROR_FALLBACK.to_string()
        }
    }
}

// =============================================================================
// REVIEW
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub improved: String,
    #[serde(default)]
    pub why: String,
}

/// Structured feedback on a finished conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub corrections: Vec<Correction>,
    /// 0–100.
    pub confidence_score: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReview {
    corrections: Vec<Correction>,
    confidence_score: f64,
}

pub(crate) fn decode_review(text: &str) -> Result<Review, serde_json::Error> {
    let raw: RawReview = super::parse_json_reply(text)?;
    let score = if raw.confidence_score.is_finite() { raw.confidence_score.round().clamp(0.0, 100.0) } else { 0.0 };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let confidence_score = score as u8;
    Ok(Review { corrections: raw.corrections, confidence_score })
}

fn review_prompt(language: &Language, history: &[Message]) -> String {
    let transcript: Vec<String> = history
        .iter()
        .filter(|msg| msg.is_dialogue())
        .map(|msg| {
            let who = if msg.role == MessageRole::User { "Learner" } else { "Tutor" };
            format!("{who}: {}", msg.content)
        })
        .collect();
    format!(
        "Review the learner's {name} in this conversation and give 2-3 constructive corrections \
         (original, improved, why) plus a confidence score from 0 to 100.\n\n{transcript}",
        name = language.name,
        transcript = transcript.join("\n"),
    )
}

/// Review a conversation. Any failure yields an empty review scored 0.
pub async fn generate_review(llm: &dyn LlmChat, language: &Language, history: &[Message]) -> Review {
    let request = GenerateRequest {
        system: None,
        contents: vec![Content::text(Role::User, review_prompt(language, history))],
        config: GenerationConfig::json(Some(review_schema())),
    };

    let response = match llm.generate(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "tutor: review request failed");
            return Review::default();
        }
    };
    let Some(text) = response.text() else {
        warn!("tutor: review reply was empty");
        return Review::default();
    };
    decode_review(text).unwrap_or_else(|e| {
        warn!(error = %e, "tutor: review reply did not match schema");
        Review::default()
    })
}

// =============================================================================
// GATEWAY CHAT
// =============================================================================

/// One prior turn as sent by gateway clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

const GATEWAY_SYSTEM_PROMPT: &str = "You are a friendly language tutor. Be helpful, encouraging and clear. \
Keep replies short and conversational. Correct mistakes gently but put communication first.";

/// General tutor chat for the HTTP gateway. Always returns displayable text.
pub async fn chat_reply(llm: &dyn LlmChat, message: &str, history: &[ChatTurn]) -> String {
    let mut contents: Vec<Content> = history.iter().map(|t| Content::text(t.role, t.content.clone())).collect();
    contents.push(Content::text(Role::User, message));
    let request = GenerateRequest {
        system: Some(GATEWAY_SYSTEM_PROMPT.to_string()),
        contents,
        config: GenerationConfig::default(),
    };

    match llm.generate(&request).await {
        Ok(response) => response.text().map_or_else(|| CHAT_EMPTY_FALLBACK.to_string(), str::to_string),
        Err(e) => {
            warn!(code = e.error_code(), retryable = e.retryable(), error = %e, "chat: reply failed");
            CHAT_ERROR_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
#[path = "tutor_test.rs"]
mod tests;
