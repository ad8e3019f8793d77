use super::*;
use crate::store::MemoryStore;
use crate::store::models::{Goal, Level, MessageRole, Persona, Theme};
use time::Duration;

fn repo() -> (Repository, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Repository::new(store.clone()), store)
}

/// Store whose writes always fail; reads see nothing.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("read-only")))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// =============================================================================
// Defaults and malformed records
// =============================================================================

#[test]
fn empty_store_yields_default_settings() {
    let (repo, _) = repo();
    assert_eq!(repo.settings(), Settings::default());
}

#[test]
fn empty_store_yields_default_stats_and_empty_logs() {
    let (repo, _) = repo();
    assert_eq!(repo.stats(), Stats::default());
    assert!(repo.chat_history("es").is_empty());
    assert!(repo.community_chat("es").is_empty());
    assert_eq!(repo.last_sync(), None);
}

#[test]
fn reads_do_not_write_defaults() {
    let (repo, store) = repo();
    let _ = repo.settings();
    let _ = repo.stats();
    assert_eq!(store.get(SETTINGS_KEY).unwrap(), None);
    assert_eq!(store.get(STATS_KEY).unwrap(), None);
    assert_eq!(repo.last_sync(), None);
}

#[test]
fn malformed_json_falls_back_to_default() {
    let (repo, store) = repo();
    store.set(SETTINGS_KEY, "{not json").unwrap();
    store.set(STATS_KEY, r#"{"accuracy":"high"}"#).unwrap();
    store.set("vaani_chats_v1_es", r#"{"oops":true}"#).unwrap();
    assert_eq!(repo.settings(), Settings::default());
    assert_eq!(repo.stats(), Stats::default());
    assert!(repo.chat_history("es").is_empty());
}

#[test]
fn stored_fractional_confidence_keeps_progress() {
    let (repo, store) = repo();
    store
        .set(
            STATS_KEY,
            r#"{"sessionsCompleted":30,"accuracy":88,"wordsLearned":900,"streak":20,"confidence":72.5,"level":"Improving","mistakesHistory":[]}"#,
        )
        .unwrap();
    let stats = repo.stats();
    assert_eq!(stats.words_learned, 900);
    assert_eq!(stats.streak, 20);
    assert_eq!(stats.confidence, 73);

    let merged = repo.update_stats(StatsUpdate { streak: Some(21), ..StatsUpdate::default() }).unwrap();
    assert_eq!(merged.words_learned, 900);
    assert_eq!(repo.stats().streak, 21);
}

#[test]
fn garbage_last_sync_reads_as_never() {
    let (repo, store) = repo();
    store.set(LAST_SYNC_KEY, "yesterday").unwrap();
    assert_eq!(repo.last_sync(), None);
}

#[test]
fn unusable_language_code_reads_empty_and_rejects_write() {
    let (repo, _) = repo();
    assert!(repo.chat_history("../es").is_empty());
    let err = repo.save_chat_history("../es", &[]).unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(_)));
}

// =============================================================================
// Settings and stats
// =============================================================================

#[test]
fn settings_overwrite_wholesale() {
    let (repo, _) = repo();
    let settings = Settings {
        language: crate::catalog::language("fr").unwrap(),
        persona: Persona::Elder,
        goal: Goal::Academic,
        has_completed_onboarding: true,
        theme: Theme::Dark,
    };
    repo.save_settings(&settings).unwrap();
    assert_eq!(repo.settings(), settings);

    repo.save_settings(&Settings::default()).unwrap();
    assert_eq!(repo.settings(), Settings::default());
}

#[test]
fn update_stats_merges_instead_of_replacing() {
    let (repo, _) = repo();
    let merged = repo.update_stats(StatsUpdate::confidence(80)).unwrap();
    assert_eq!(merged.confidence, 80);
    assert_eq!(merged.accuracy, 85);
    assert_eq!(merged.sessions_completed, 12);
    assert_eq!(repo.stats(), merged);
}

#[test]
fn update_stats_builds_on_previous_save() {
    let (repo, _) = repo();
    repo.save_stats(&Stats { streak: 9, level: Level::Confident, ..Stats::default() }).unwrap();
    let merged = repo.update_stats(StatsUpdate { accuracy: Some(90), ..StatsUpdate::default() }).unwrap();
    assert_eq!(merged.streak, 9);
    assert_eq!(merged.level, Level::Confident);
    assert_eq!(merged.accuracy, 90);
}

// =============================================================================
// Chat logs
// =============================================================================

#[test]
fn chat_history_round_trips_with_millisecond_timestamps() {
    let (repo, _) = repo();
    let base = now_millis();
    let messages: Vec<Message> = (0..25i64)
        .map(|i| {
            let role = if i % 2 == 0 { MessageRole::User } else { MessageRole::Model };
            Message::new(role, format!("mensaje {i}")).at(base + Duration::milliseconds(i * 37))
        })
        .collect();

    repo.save_chat_history("es", &messages).unwrap();
    let loaded = repo.chat_history("es");

    assert_eq!(loaded.len(), 25);
    assert_eq!(loaded, messages);
    for (a, b) in loaded.iter().zip(&messages) {
        assert_eq!(a.timestamp.unix_timestamp_nanos() / 1_000_000, b.timestamp.unix_timestamp_nanos() / 1_000_000);
    }
}

#[test]
fn logs_are_isolated_by_language_and_kind() {
    let (repo, _) = repo();
    repo.save_chat_history("es", &[Message::new(MessageRole::User, "hola")]).unwrap();
    repo.save_community_chat("es", &[Message::new(MessageRole::Peer, "hey").with_author("Rahul")]).unwrap();

    assert!(repo.chat_history("fr").is_empty());
    assert_eq!(repo.chat_history("es")[0].content, "hola");
    assert_eq!(repo.community_chat("es")[0].author.as_deref(), Some("Rahul"));
    assert_eq!(repo.history(ChatKind::Tutor, "es"), repo.chat_history("es"));
}

#[test]
fn logs_live_under_language_suffixed_keys() {
    let (repo, store) = repo();
    repo.save_history(ChatKind::Community, "de", &[]).unwrap();
    assert_eq!(store.get("vaani_community_v1_de").unwrap().as_deref(), Some("[]"));
}

// =============================================================================
// Last sync and reset
// =============================================================================

#[test]
fn every_save_stamps_last_sync() {
    let (repo, store) = repo();
    let before = now_millis();
    repo.save_stats(&Stats::default()).unwrap();
    let first = repo.last_sync().unwrap();
    assert!(first >= before);

    store.set(LAST_SYNC_KEY, "2000-01-01T00:00:00Z").unwrap();
    repo.save_chat_history("hi", &[]).unwrap();
    assert!(repo.last_sync().unwrap() >= first);
}

#[test]
fn reset_wipes_every_record() {
    let (repo, _) = repo();
    repo.save_settings(&Settings { has_completed_onboarding: true, ..Settings::default() }).unwrap();
    repo.update_stats(StatsUpdate::confidence(99)).unwrap();
    repo.save_chat_history("es", &[Message::new(MessageRole::User, "hola")]).unwrap();

    repo.reset().unwrap();

    assert_eq!(repo.settings(), Settings::default());
    assert_eq!(repo.stats(), Stats::default());
    assert!(repo.chat_history("es").is_empty());
    assert_eq!(repo.last_sync(), None);
}

#[test]
fn write_failure_propagates() {
    let repo = Repository::new(Arc::new(ReadOnlyStore));
    assert!(matches!(repo.save_settings(&Settings::default()), Err(StoreError::Io(_))));
    assert!(repo.update_stats(StatsUpdate::confidence(10)).is_err());
}
