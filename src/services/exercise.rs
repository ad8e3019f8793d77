//! Listening exercises — match-the-pairs generation and scoring.
//!
//! DESIGN
//! ======
//! The model proposes `{exercise_id, instructions, pairs}` under a declared
//! schema. Each pair becomes one audio item (a TTS URL for its spoken text)
//! and one text item; text items are shuffled so position gives nothing
//! away. Scoring is deterministic; only the encouragement text comes from
//! the model.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog;
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::schema::{feedback_schema, match_pairs_schema};
use crate::llm::types::{Content, GenerateRequest, GenerationConfig, LlmError, Role};
use crate::tts::{DEFAULT_TTS_LANG, TtsUrlBuilder};

const DEFAULT_INSTRUCTIONS: &str = "Listen to the audio and select the correct matching text.";
const PAIR_COUNT: usize = 4;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExerciseError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model returned an empty reply")]
    EmptyReply,
    #[error("model reply did not match the schema: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("model returned no usable pairs")]
    NoPairs,
}

impl ErrorCode for ExerciseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Llm(e) => e.error_code(),
            Self::EmptyReply => "E_EXERCISE_EMPTY",
            Self::Malformed(_) => "E_EXERCISE_MALFORMED",
            Self::NoPairs => "E_EXERCISE_NO_PAIRS",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
        }
    }
}

/// One word or phrase as the model proposed it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pair {
    pub id: String,
    pub text: String,
    pub audio_text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeneratedExercise {
    #[serde(default)]
    exercise_id: String,
    #[serde(default)]
    instructions: String,
    pairs: Vec<Pair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioItem {
    pub id: String,
    pub audio_url: String,
    pub correct_text_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchPairsExercise {
    pub exercise_id: String,
    pub instructions: String,
    pub audio_items: Vec<AudioItem>,
    pub text_items: Vec<TextItem>,
}

// =============================================================================
// GENERATION
// =============================================================================

fn match_pairs_prompt(level: Level, lang: &str, exercise_id: &str) -> String {
    let language = catalog::language(lang).map_or_else(|| lang.to_string(), |l| l.name);
    format!(
        "Create a \"match the pairs\" listening exercise for a {level} learner of {language}. \
         Give {PAIR_COUNT} pairs of simple words or short phrases. Each pair has an id (p1, p2, ...), \
         the text shown on screen, and audio_text, the words that will be spoken. \
         Use type \"match_pairs_exercise\", exercise_id \"{exercise_id}\" and one line of instructions.",
        level = level.as_str(),
    )
}

pub(crate) fn decode_exercise(text: &str) -> Result<GeneratedExercise, ExerciseError> {
    let mut exercise: GeneratedExercise = super::parse_json_reply(text)?;
    let mut seen = std::collections::HashSet::new();
    exercise
        .pairs
        .retain(|p| !p.id.trim().is_empty() && !p.audio_text.trim().is_empty() && seen.insert(p.id.clone()));
    if exercise.pairs.is_empty() {
        return Err(ExerciseError::NoPairs);
    }
    Ok(exercise)
}

/// Turn model pairs into audio and text items, shuffling the text side.
/// A pair whose TTS URL cannot be built keeps an empty `audio_url`.
pub(crate) fn build_exercise<R: Rng + ?Sized>(
    generated: GeneratedExercise,
    fallback_id: &str,
    tts: &TtsUrlBuilder,
    lang: &str,
    rng: &mut R,
) -> MatchPairsExercise {
    let audio_items = generated
        .pairs
        .iter()
        .map(|pair| AudioItem {
            id: format!("a_{}", pair.id),
            audio_url: tts.audio_url(&pair.audio_text, lang).unwrap_or_else(|e| {
                warn!(pair = %pair.id, code = e.error_code(), error = %e, "exercise: no audio for pair");
                String::new()
            }),
            correct_text_id: pair.id.clone(),
        })
        .collect();

    let mut text_items: Vec<TextItem> = generated
        .pairs
        .into_iter()
        .map(|pair| TextItem { id: pair.id, text: pair.text })
        .collect();
    text_items.shuffle(rng);

    let exercise_id = non_blank_or(generated.exercise_id, fallback_id);
    let instructions = non_blank_or(generated.instructions, DEFAULT_INSTRUCTIONS);
    MatchPairsExercise { exercise_id, instructions, audio_items, text_items }
}

fn non_blank_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() { fallback.to_string() } else { value }
}

/// Ask the model for a match-the-pairs exercise in `lang` (default `en`).
///
/// # Errors
///
/// Fails if the model call fails or its reply is empty, malformed, or has
/// no usable pairs.
pub async fn generate_match_pairs(
    llm: &dyn LlmChat,
    tts: &TtsUrlBuilder,
    level: Level,
    lang: Option<&str>,
) -> Result<MatchPairsExercise, ExerciseError> {
    let lang = lang.map(str::trim).filter(|l| !l.is_empty()).unwrap_or(DEFAULT_TTS_LANG);
    let fallback_id = format!("mp_{}", crate::store::models::now_millis().unix_timestamp_nanos() / 1_000_000);
    let request = GenerateRequest {
        system: None,
        contents: vec![Content::text(Role::User, match_pairs_prompt(level, lang, &fallback_id))],
        config: GenerationConfig::json(Some(match_pairs_schema())),
    };

    let response = llm.generate(&request).await?;
    let text = response.text().ok_or(ExerciseError::EmptyReply)?;
    let generated = decode_exercise(text)?;
    let exercise = build_exercise(generated, &fallback_id, tts, lang, &mut rand::rng());
    tracing::info!(exercise_id = %exercise.exercise_id, pairs = exercise.audio_items.len(), lang, "exercise: generated");
    Ok(exercise)
}

// =============================================================================
// EVALUATION
// =============================================================================

/// One graded attempt; only correctness matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub score: usize,
    pub total: usize,
    pub feedback: String,
}

#[derive(Deserialize)]
struct FeedbackReply {
    feedback: String,
}

/// Count correct answers and ask the model for an encouraging remark.
///
/// # Errors
///
/// Fails if the model call fails or its reply carries no feedback.
pub async fn evaluate(llm: &dyn LlmChat, answers: &[Answer]) -> Result<Evaluation, ExerciseError> {
    let score = answers.iter().filter(|a| a.correct).count();
    let total = answers.len();
    let prompt = format!(
        "A learner just finished a matching exercise and got {score} out of {total} correct. \
         Write one short, friendly, encouraging feedback message for that score."
    );
    let request = GenerateRequest {
        system: None,
        contents: vec![Content::text(Role::User, prompt)],
        config: GenerationConfig::json(Some(feedback_schema())),
    };

    let response = llm.generate(&request).await?;
    let text = response.text().ok_or(ExerciseError::EmptyReply)?;
    let FeedbackReply { feedback } = super::parse_json_reply(text)?;
    Ok(Evaluation { score, total, feedback })
}

#[cfg(test)]
#[path = "exercise_test.rs"]
mod tests;
