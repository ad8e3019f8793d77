//! Process configuration from environment variables.
//!
//! `.env.local` is read first, then `.env`; neither overrides variables that
//! are already set in the environment. Model settings live in
//! [`crate::llm::config`].

use crate::tts::DEFAULT_TTS_HOST;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = ".vaani";
/// Audio uploads arrive as multipart bodies.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid { key: &'static str, expected: &'static str, value: String },
}

/// Load `.env.local` and `.env` from the working directory, if present.
pub fn load_dotenv() {
    for file in [".env.local", ".env"] {
        match dotenvy::from_filename(file) {
            Ok(path) => tracing::debug!(path = %path.display(), "config: loaded env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(file, error = %e, "config: ignoring unreadable env file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub tts_host: String,
    /// Slowed-down speech in generated TTS URLs.
    pub tts_slow: bool,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tts_host: DEFAULT_TTS_HOST.to_string(),
            tts_slow: false,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `TTS_HOST`, `TTS_SLOW` and `BODY_LIMIT_BYTES`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unparsable number or flag.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match non_empty("PORT") {
            Some(raw) => parse(&raw, "PORT", "a port number")?,
            None => defaults.port,
        };
        let body_limit_bytes = match non_empty("BODY_LIMIT_BYTES") {
            Some(raw) => parse(&raw, "BODY_LIMIT_BYTES", "a byte count")?,
            None => defaults.body_limit_bytes,
        };
        let tts_slow = match non_empty("TTS_SLOW") {
            Some(raw) => parse(&raw.to_ascii_lowercase(), "TTS_SLOW", "true or false")?,
            None => defaults.tts_slow,
        };
        let tts_host = non_empty("TTS_HOST").unwrap_or(defaults.tts_host);

        Ok(Self { port, tts_host, tts_slow, body_limit_bytes })
    }
}

fn parse<T: std::str::FromStr>(raw: &str, key: &'static str, expected: &'static str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, expected, value: raw.to_string() })
}
