//! TTS — builds playable text-to-speech URLs for the translate service.
//!
//! No request is made here; clients fetch the audio themselves.

use reqwest::Url;

pub const DEFAULT_TTS_HOST: &str = "https://translate.google.com";
pub const DEFAULT_TTS_LANG: &str = "en";

/// The service rejects longer text (measured in UTF-16 code units).
pub const MAX_TTS_TEXT_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TtsError {
    #[error("text is empty")]
    EmptyText,
    #[error("text is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("language code is empty")]
    EmptyLang,
    #[error("invalid TTS host: {0}")]
    InvalidHost(String),
}

impl crate::error::ErrorCode for TtsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyText => "E_TTS_EMPTY_TEXT",
            Self::TooLong { .. } => "E_TTS_TOO_LONG",
            Self::EmptyLang => "E_TTS_EMPTY_LANG",
            Self::InvalidHost(_) => "E_TTS_HOST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsUrlBuilder {
    host: String,
    slow: bool,
}

impl Default for TtsUrlBuilder {
    fn default() -> Self {
        Self { host: DEFAULT_TTS_HOST.to_string(), slow: false }
    }
}

impl TtsUrlBuilder {
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into().trim_end_matches('/').to_string(), slow: false }
    }

    #[must_use]
    pub fn slow(mut self, slow: bool) -> Self {
        self.slow = slow;
        self
    }

    /// URL that speaks `text` in `lang`.
    ///
    /// # Errors
    ///
    /// Fails for empty text or language, text over [`MAX_TTS_TEXT_LEN`]
    /// UTF-16 units, or an unparseable host.
    pub fn audio_url(&self, text: &str, lang: &str) -> Result<String, TtsError> {
        if text.is_empty() {
            return Err(TtsError::EmptyText);
        }
        if lang.trim().is_empty() {
            return Err(TtsError::EmptyLang);
        }
        let len = text.encode_utf16().count();
        if len > MAX_TTS_TEXT_LEN {
            return Err(TtsError::TooLong { len, max: MAX_TTS_TEXT_LEN });
        }

        let textlen = len.to_string();
        let speed = if self.slow { "0.24" } else { "1" };
        let url = Url::parse_with_params(
            &format!("{}/translate_tts", self.host),
            [
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", lang.trim()),
                ("total", "1"),
                ("idx", "0"),
                ("textlen", textlen.as_str()),
                ("client", "tw-ob"),
                ("prev", "input"),
                ("ttsspeed", speed),
            ],
        )
        .map_err(|e| TtsError::InvalidHost(format!("{}: {e}", self.host)))?;
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn query(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn url_targets_translate_tts_with_fixed_params() {
        let url = TtsUrlBuilder::default().audio_url("Hello", "en").unwrap();
        assert!(url.starts_with("https://translate.google.com/translate_tts?"));
        let q = query(&url);
        assert_eq!(q["ie"], "UTF-8");
        assert_eq!(q["q"], "Hello");
        assert_eq!(q["tl"], "en");
        assert_eq!(q["total"], "1");
        assert_eq!(q["idx"], "0");
        assert_eq!(q["textlen"], "5");
        assert_eq!(q["client"], "tw-ob");
        assert_eq!(q["prev"], "input");
        assert_eq!(q["ttsspeed"], "1");
    }

    #[test]
    fn text_is_escaped_and_round_trips() {
        let text = "¿Dónde está la estación? & más";
        let url = TtsUrlBuilder::default().audio_url(text, "es").unwrap();
        assert!(!url.contains(' '));
        assert_eq!(query(&url)["q"], text);
    }

    #[test]
    fn textlen_counts_utf16_units() {
        let url = TtsUrlBuilder::default().audio_url("नमस्ते", "hi").unwrap();
        assert_eq!(query(&url)["textlen"], "6");
    }

    #[test]
    fn rejects_empty_text_and_lang() {
        let tts = TtsUrlBuilder::default();
        assert_eq!(tts.audio_url("", "en"), Err(TtsError::EmptyText));
        assert_eq!(tts.audio_url("hi", " "), Err(TtsError::EmptyLang));
    }

    #[test]
    fn length_limit_is_inclusive() {
        let tts = TtsUrlBuilder::default();
        assert!(tts.audio_url(&"a".repeat(200), "en").is_ok());
        assert_eq!(tts.audio_url(&"a".repeat(201), "en"), Err(TtsError::TooLong { len: 201, max: 200 }));
    }

    #[test]
    fn custom_host_and_slow_speed() {
        let url = TtsUrlBuilder::new("http://localhost:9000/").slow(true).audio_url("hi", "en").unwrap();
        assert!(url.starts_with("http://localhost:9000/translate_tts?"));
        assert_eq!(query(&url)["ttsspeed"], "0.24");
    }

    #[test]
    fn bad_host_is_reported() {
        let err = TtsUrlBuilder::new("not a host").audio_url("hi", "en").unwrap_err();
        assert!(matches!(err, TtsError::InvalidHost(_)));
    }
}
