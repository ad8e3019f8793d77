//! Persisted record types.
//!
//! Field names and enum spellings match the JSON the web client wrote to
//! browser storage, so existing records load unchanged. Stats counters were
//! stored as plain JS numbers and may be fractional; they are rounded on
//! load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog;

// =============================================================================
// LANGUAGE / PERSONA / GOAL / THEME
// =============================================================================

/// A language the learner can study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
    pub flag: String,
}

/// Who the learner is; the tutor adapts tone and vocabulary to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persona {
    Child,
    #[default]
    Student,
    Professional,
    Elder,
}

/// What the learner wants the language for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[default]
    #[serde(rename = "Daily Conversation")]
    DailyConversation,
    Travel,
    Office,
    Academic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Practice mode passed to the tutor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LearningMode {
    #[default]
    Conversation,
    Quiz,
    Writing,
    Lessons,
}

impl Persona {
    pub const ALL: [Self; 4] = [Self::Child, Self::Student, Self::Professional, Self::Elder];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Child => "Child",
            Self::Student => "Student",
            Self::Professional => "Professional",
            Self::Elder => "Elder",
        }
    }
}

impl Goal {
    pub const ALL: [Self; 4] = [Self::DailyConversation, Self::Travel, Self::Office, Self::Academic];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DailyConversation => "Daily Conversation",
            Self::Travel => "Travel",
            Self::Office => "Office",
            Self::Academic => "Academic",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// Unrecognized enum spelling on the command line.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl FromStr for Persona {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "persona",
                value: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

impl FromStr for Goal {
    type Err = ParseEnumError;

    /// Accepts the display spelling or a compact one (`daily-conversation`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|g| normalize(g.as_str()) == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "goal",
                value: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Learner preferences. One instance, overwritten wholesale on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: Language,
    pub persona: Persona,
    pub goal: Goal,
    pub has_completed_onboarding: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: catalog::default_language(),
            persona: Persona::default(),
            goal: Goal::default(),
            has_completed_onboarding: false,
            theme: Theme::default(),
        }
    }
}

// =============================================================================
// STATS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Improving,
    Confident,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub original: String,
    pub corrected: String,
    pub topic: String,
}

/// Learning-progress metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(deserialize_with = "lenient::count")]
    pub sessions_completed: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub accuracy: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub words_learned: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub streak: u32,
    /// 0–100.
    #[serde(deserialize_with = "lenient::percent")]
    pub confidence: u8,
    pub level: Level,
    pub mistakes_history: Vec<Mistake>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            sessions_completed: 12,
            accuracy: 85,
            words_learned: 450,
            streak: 5,
            confidence: 45,
            level: Level::Improving,
            mistakes_history: Vec::new(),
        }
    }
}

/// Partial stats update. `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdate {
    pub sessions_completed: Option<u32>,
    pub accuracy: Option<u32>,
    pub words_learned: Option<u32>,
    pub streak: Option<u32>,
    pub confidence: Option<u8>,
    pub level: Option<Level>,
    pub mistakes_history: Option<Vec<Mistake>>,
}

impl StatsUpdate {
    #[must_use]
    pub fn confidence(score: u8) -> Self {
        Self { confidence: Some(score), ..Self::default() }
    }
}

/// Number fields that accept any JSON number, rounded and clamped.
mod lenient {
    use serde::{Deserialize, Deserializer};

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(value.round().clamp(0.0, f64::from(u32::MAX)) as u32)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(value.round().clamp(0.0, 100.0) as u8)
    }
}

impl Stats {
    /// Shallow merge: every field present in `update` replaces the stored one.
    pub fn merge(&mut self, update: StatsUpdate) {
        let StatsUpdate { sessions_completed, accuracy, words_learned, streak, confidence, level, mistakes_history } =
            update;
        if let Some(v) = sessions_completed {
            self.sessions_completed = v;
        }
        if let Some(v) = accuracy {
            self.accuracy = v;
        }
        if let Some(v) = words_learned {
            self.words_learned = v;
        }
        if let Some(v) = streak {
            self.streak = v;
        }
        if let Some(v) = confidence {
            self.confidence = v.min(100);
        }
        if let Some(v) = level {
            self.level = v;
        }
        if let Some(v) = mistakes_history {
            self.mistakes_history = v;
        }
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
    Peer,
}

/// Which log a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Tutor,
    Community,
}

/// One entry in a chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Message {
    /// New message stamped with the current time.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            author: None,
            correction: None,
            explanation: None,
            timestamp: now_millis(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn at(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// User and model turns take part in tutor conversations; peers don't.
    #[must_use]
    pub fn is_dialogue(&self) -> bool {
        matches!(self.role, MessageRole::User | MessageRole::Model)
    }
}

/// Current UTC time truncated to whole milliseconds.
#[must_use]
pub fn now_millis() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond()).unwrap_or(now)
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
