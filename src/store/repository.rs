//! Repository — typed accessors for every persisted record.
//!
//! DESIGN
//! ======
//! One get/save pair per record kind over an injected `KeyValueStore`.
//! Reads never fail: a missing record yields the default, and a record that
//! cannot be read or decoded yields the default with a warning. Writes
//! propagate errors and stamp `vaani_last_sync` after the record lands.
//! Reads do not write defaults back; the first save of each kind creates it.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use super::models::{ChatKind, Message, Settings, Stats, StatsUpdate, now_millis};
use super::{
    CHATS_KEY, COMMUNITY_CHATS_KEY, KeyValueStore, LAST_SYNC_KEY, SETTINGS_KEY, STATS_KEY,
    StoreError,
};

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // SETTINGS
    // =========================================================================

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.load(SETTINGS_KEY)
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.save(SETTINGS_KEY, settings)
    }

    // =========================================================================
    // STATS
    // =========================================================================

    #[must_use]
    pub fn stats(&self) -> Stats {
        self.load(STATS_KEY)
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn save_stats(&self, stats: &Stats) -> Result<(), StoreError> {
        self.save(STATS_KEY, stats)
    }

    /// Merge `update` into the stored stats and save the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged record cannot be written.
    pub fn update_stats(&self, update: StatsUpdate) -> Result<Stats, StoreError> {
        let mut stats = self.stats();
        stats.merge(update);
        self.save_stats(&stats)?;
        Ok(stats)
    }

    // =========================================================================
    // CHAT LOGS
    // =========================================================================

    #[must_use]
    pub fn chat_history(&self, lang: &str) -> Vec<Message> {
        self.history(ChatKind::Tutor, lang)
    }

    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn save_chat_history(&self, lang: &str, messages: &[Message]) -> Result<(), StoreError> {
        self.save_history(ChatKind::Tutor, lang, messages)
    }

    #[must_use]
    pub fn community_chat(&self, lang: &str) -> Vec<Message> {
        self.history(ChatKind::Community, lang)
    }

    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn save_community_chat(&self, lang: &str, messages: &[Message]) -> Result<(), StoreError> {
        self.save_history(ChatKind::Community, lang, messages)
    }

    /// Ordered log for `(kind, lang)`; empty when nothing is stored.
    #[must_use]
    pub fn history(&self, kind: ChatKind, lang: &str) -> Vec<Message> {
        self.load(&history_key(kind, lang))
    }

    /// Replace the whole log for `(kind, lang)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `lang` cannot form a key or the write fails.
    pub fn save_history(&self, kind: ChatKind, lang: &str, messages: &[Message]) -> Result<(), StoreError> {
        self.save(&history_key(kind, lang), messages)
    }

    // =========================================================================
    // SYNC / RESET
    // =========================================================================

    /// Time of the most recent successful save, if any.
    #[must_use]
    pub fn last_sync(&self) -> Option<OffsetDateTime> {
        let raw = self.read_raw(LAST_SYNC_KEY)?;
        match OffsetDateTime::parse(raw.trim(), &Rfc3339) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(key = LAST_SYNC_KEY, error = %e, "repository: unparseable last-sync stamp");
                None
            }
        }
    }

    /// Erase every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be cleared.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        tracing::info!("repository: all records cleared");
        Ok(())
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "repository: read failed, using default");
                None
            }
        }
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.read_raw(key) else {
            return T::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "repository: malformed record, using default");
            T::default()
        })
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)?;
        self.touch_last_sync()
    }

    fn touch_last_sync(&self) -> Result<(), StoreError> {
        let stamp = now_millis().format(&Rfc3339)?;
        self.store.set(LAST_SYNC_KEY, &stamp)
    }
}

fn history_key(kind: ChatKind, lang: &str) -> String {
    let prefix = match kind {
        ChatKind::Tutor => CHATS_KEY,
        ChatKind::Community => COMMUNITY_CHATS_KEY,
    };
    format!("{prefix}_{lang}")
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
