//! Conversation practice — one tutor chat session for the active language.
//!
//! The log is loaded from the repository on open (or seeded with a greeting
//! from the tutor) and saved after every change. Ending the session reviews
//! the transcript and feeds the confidence score into stats.

use crate::llm::LlmChat;
use crate::store::models::{Goal, Language, LearningMode, Message, MessageRole, Persona, Settings, Stats, StatsUpdate};
use crate::store::{Repository, StoreError};

use super::tutor::{self, Review, TutorProfile};

pub const GREETING_ID: &str = "init";

/// Opening line when a language has no stored tutor log.
#[must_use]
pub fn greeting(persona: Persona, language: &Language, goal: Goal) -> Message {
    Message::new(
        MessageRole::Model,
        format!(
            "Hello there! I'm so excited to be your {persona} coach for {name}. We'll work on your {goal} skills together. What would you like to talk about today?",
            name = language.name,
        ),
    )
    .with_id(GREETING_ID)
}

pub struct ConversationPractice {
    repo: Repository,
    language: Language,
    persona: Persona,
    goal: Goal,
    mode: LearningMode,
    messages: Vec<Message>,
}

impl ConversationPractice {
    /// Open the tutor log for the settings' language, seeding and saving a
    /// greeting when it is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a seeded log cannot be saved.
    pub fn open(repo: Repository, settings: &Settings) -> Result<Self, StoreError> {
        let language = settings.language.clone();
        let mut messages = repo.chat_history(&language.code);
        if messages.is_empty() {
            messages.push(greeting(settings.persona, &language, settings.goal));
            repo.save_chat_history(&language.code, &messages)?;
        }
        Ok(Self {
            repo,
            language,
            persona: settings.persona,
            goal: settings.goal,
            mode: LearningMode::Conversation,
            messages,
        })
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Append the learner's message and the tutor's reply, then save.
    /// Blank input is ignored and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated log cannot be saved.
    pub async fn send(&mut self, llm: &dyn LlmChat, text: &str) -> Result<Option<&Message>, StoreError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let prior = self.messages.clone();
        self.messages.push(Message::new(MessageRole::User, text));
        self.repo.save_chat_history(&self.language.code, &self.messages)?;

        let profile = TutorProfile { language: &self.language, mode: self.mode, persona: self.persona, goal: self.goal };
        let reply = tutor::generate_tutor_response(llm, &profile, text, &prior).await;
        self.messages.push(Message::new(MessageRole::Model, reply));
        self.repo.save_chat_history(&self.language.code, &self.messages)?;
        tracing::info!(lang = %self.language.code, turns = self.messages.len(), "conversation: turn saved");
        Ok(self.messages.last())
    }

    /// Review the session and merge its confidence score into stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged stats cannot be saved.
    pub async fn end(&self, llm: &dyn LlmChat) -> Result<(Review, Stats), StoreError> {
        let review = tutor::generate_review(llm, &self.language, &self.messages).await;
        let stats = self.repo.update_stats(StatsUpdate::confidence(review.confidence_score))?;
        Ok((review, stats))
    }
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
