//! Speech routes — `/api/stt` and `/api/tts`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use serde::Deserialize;

use super::{Envelope, parse_body};
use crate::error::{ApiError, ErrorCode};
use crate::services::speech::{self, DEFAULT_AUDIO_MIME};
use crate::state::AppState;
use crate::tts::{DEFAULT_TTS_LANG, TtsError};

const AUDIO_FIELD: &str = "audio";
const NO_AUDIO: &str = "No audio file provided";

/// `POST /api/stt` — multipart upload with an `audio` file field.
pub async fn stt(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::BadRequest(NO_AUDIO.into()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let mime_type = field.content_type().unwrap_or(DEFAULT_AUDIO_MIME).to_string();
        let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
        upload = Some((bytes, mime_type));
        break;
    }
    let Some((audio, mime_type)) = upload.filter(|(bytes, _)| !bytes.is_empty()) else {
        return Err(ApiError::BadRequest(NO_AUDIO.into()));
    };

    let llm = state.require_llm("STT failed")?;
    let result = speech::transcribe(llm, &audio, &mime_type)
        .await
        .map_err(|e| ApiError::upstream("STT failed", &e))?;
    Ok(Json(Envelope::SttResult { transcript: result.transcript, confidence: result.confidence }))
}

#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    pub text: Option<String>,
    pub lang: Option<String>,
}

/// `POST /api/tts` — `{text, lang?}` to a playable audio URL.
pub async fn tts(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope>, ApiError> {
    let request: TtsRequest = parse_body(&body)?;
    let text = request
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Text is required".into()))?;
    let lang = request.lang.filter(|l| !l.trim().is_empty());
    let lang = lang.as_deref().unwrap_or(DEFAULT_TTS_LANG);

    let audio_url = state.tts.audio_url(&text, lang).map_err(|e| match e {
        TtsError::InvalidHost(_) => ApiError::upstream("TTS failed", &e),
        _ => {
            tracing::debug!(code = e.error_code(), error = %e, "tts: rejected request");
            ApiError::BadRequest(e.to_string())
        }
    })?;
    Ok(Json(Envelope::TtsResult { text, audio_url }))
}
