//! Exercise routes — generation and scoring of match-the-pairs drills.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;

use super::{Envelope, parse_body};
use crate::error::ApiError;
use crate::services::exercise::{self, Answer, Level};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MatchPairsRequest {
    #[serde(default)]
    pub level: Level,
    pub lang: Option<String>,
}

/// `POST /api/exercise/match-pairs` — `{level?, lang?}`.
pub async fn match_pairs(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope>, ApiError> {
    let request: MatchPairsRequest = parse_body(&body)?;
    let llm = state.require_llm("Exercise generation failed")?;
    let generated = exercise::generate_match_pairs(llm, &state.tts, request.level, request.lang.as_deref())
        .await
        .map_err(|e| ApiError::upstream("Exercise generation failed", &e))?;
    Ok(Json(Envelope::MatchPairsExercise(generated)))
}

/// A client-sent `total` is ignored; the reported total is `answers.len()`.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateRequest {
    pub answers: Option<Vec<Answer>>,
}

/// `POST /api/exercise/evaluate` — `{answers: [{correct}], total?}`.
pub async fn evaluate(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope>, ApiError> {
    let request: EvaluateRequest = parse_body(&body)?;
    let answers = request
        .answers
        .ok_or_else(|| ApiError::BadRequest("Answers are required".into()))?;

    let llm = state.require_llm("Evaluation failed")?;
    let result = exercise::evaluate(llm, &answers)
        .await
        .map_err(|e| ApiError::upstream("Evaluation failed", &e))?;
    Ok(Json(Envelope::ExerciseResult(result)))
}
