use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::*;
use crate::catalog;
use crate::llm::mock::MockLlm;
use crate::services::conversation::ConversationPractice;
use crate::store::models::{Message, MessageRole, Theme};
use crate::store::{KeyValueStore, MemoryStore};

fn controller() -> ViewController {
    ViewController::load(Repository::new(Arc::new(MemoryStore::new())))
}

/// Memory store whose writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear()
    }
}

fn onboarded() -> ViewController {
    let mut view = controller();
    view.start_learning().unwrap();
    view.complete_onboarding(Persona::Student, Goal::Office, catalog::language("de").unwrap())
        .unwrap();
    view
}

// =============================================================================
// Startup
// =============================================================================

#[test]
fn first_run_starts_on_landing() {
    let view = controller();
    assert_eq!(view.screen(), Screen::Landing);
    assert!(!view.settings().has_completed_onboarding);
}

#[test]
fn load_does_not_write() {
    let view = controller();
    assert!(view.repository().last_sync().is_none());
}

#[test]
fn returning_learner_resumes_on_lessons() {
    let view = onboarded();
    let resumed = ViewController::load(view.repository().clone());
    assert_eq!(resumed.screen(), Screen::Lessons);
    assert_eq!(resumed.language().code, "de");
}

// =============================================================================
// Onboarding flag
// =============================================================================

#[test]
fn onboarding_flag_false_before_first_navigable_screen() {
    let mut view = controller();
    view.start_learning().unwrap();
    assert_eq!(view.screen(), Screen::Onboarding);
    assert!(!view.repository().settings().has_completed_onboarding);
}

#[test]
fn onboarding_flag_true_on_every_navigable_screen() {
    let mut view = onboarded();
    for screen in Screen::NAVIGABLE {
        view.navigate(screen).unwrap();
        assert_eq!(view.screen(), screen);
        assert!(view.repository().settings().has_completed_onboarding, "{screen}");
    }
}

#[test]
fn returning_to_landing_clears_flag() {
    let mut view = onboarded();
    view.navigate(Screen::Landing).unwrap();
    assert!(!view.repository().settings().has_completed_onboarding);
    assert_eq!(ViewController::load(view.repository().clone()).screen(), Screen::Landing);
}

#[test]
fn child_travel_onboarding_persists_choices() {
    let mut view = controller();
    let picked = catalog::language("hi").unwrap();
    view.start_learning().unwrap();
    view.complete_onboarding(Persona::Child, Goal::Travel, picked.clone()).unwrap();

    let saved = view.repository().settings();
    assert_eq!(saved.persona, Persona::Child);
    assert_eq!(saved.goal, Goal::Travel);
    assert_eq!(saved.language, picked);
    assert!(saved.has_completed_onboarding);
    assert_eq!(saved.theme, Theme::Light);
    assert_eq!(view.screen(), Screen::Lessons);
}

// =============================================================================
// Transitions
// =============================================================================

#[test]
fn navigable_screens_unreachable_from_landing() {
    let mut view = controller();
    let err = view.navigate(Screen::Quiz).unwrap_err();
    assert!(matches!(err, ViewError::InvalidTransition { from: Screen::Landing, to: Screen::Quiz }));
    assert_eq!(view.screen(), Screen::Landing);
}

#[test]
fn complete_onboarding_requires_onboarding_screen() {
    let mut view = controller();
    let err = view
        .complete_onboarding(Persona::Elder, Goal::Academic, catalog::default_language())
        .unwrap_err();
    assert!(matches!(err, ViewError::InvalidTransition { .. }));
    assert_eq!(view.settings().persona, Persona::Student);
}

#[test]
fn onboarding_reachable_only_from_landing_by_navigation() {
    let mut view = onboarded();
    assert!(view.navigate(Screen::Onboarding).is_err());
    view.navigate(Screen::Landing).unwrap();
    view.navigate(Screen::Onboarding).unwrap();
    assert_eq!(view.screen(), Screen::Onboarding);
}

#[test]
fn theme_and_language_changes_persist() {
    let mut view = onboarded();
    view.toggle_theme().unwrap();
    view.select_language(catalog::language("fr").unwrap()).unwrap();
    let saved = view.repository().settings();
    assert_eq!(saved.theme, Theme::Dark);
    assert_eq!(saved.language.code, "fr");
    assert!(saved.has_completed_onboarding);
}

#[test]
fn update_stats_merges_and_saves() {
    let mut view = onboarded();
    let stats = view.update_stats(StatsUpdate::confidence(72)).unwrap().clone();
    assert_eq!(stats.confidence, 72);
    assert_eq!(stats.words_learned, 450);
    assert_eq!(view.repository().stats(), stats);
}

#[tokio::test]
async fn update_stats_keeps_confidence_from_review() {
    let mut view = onboarded();
    let llm = MockLlm::replying(&["Gut!", r#"{"corrections":[],"confidenceScore":91}"#]);
    let mut practice = ConversationPractice::open(view.repository().clone(), view.settings()).unwrap();
    practice.send(&llm, "Hallo").await.unwrap();
    practice.end(&llm).await.unwrap();

    let stats = view.update_stats(StatsUpdate { streak: Some(6), ..StatsUpdate::default() }).unwrap();
    assert_eq!(stats.confidence, 91);
    assert_eq!(stats.streak, 6);
    assert_eq!(view.repository().stats().confidence, 91);
}

#[test]
fn reload_wipes_and_returns_to_landing() {
    let mut view = onboarded();
    view.update_stats(StatsUpdate::confidence(5)).unwrap();
    view.reload().unwrap();
    assert_eq!(view.screen(), Screen::Landing);
    assert_eq!(view.settings(), &Settings::default());
    assert_eq!(view.stats(), &Stats::default());
}

#[test]
fn failed_settings_write_leaves_state_unchanged() {
    let store = Arc::new(FlakyStore::default());
    let mut view = ViewController::load(Repository::new(store.clone()));
    view.start_learning().unwrap();
    view.complete_onboarding(Persona::Elder, Goal::Academic, catalog::language("hi").unwrap())
        .unwrap();
    let before = view.settings().clone();

    store.fail_writes.store(true, Ordering::SeqCst);
    assert!(matches!(view.navigate(Screen::Landing), Err(ViewError::Store(_))));
    assert_eq!(view.screen(), Screen::Lessons);
    assert!(view.settings().has_completed_onboarding);

    assert!(view.start_learning().is_err());
    assert_eq!(view.screen(), Screen::Lessons);
    assert!(view.toggle_theme().is_err());
    assert!(view.select_language(catalog::language("fr").unwrap()).is_err());
    assert_eq!(view.settings(), &before);
    assert_eq!(view.repository().settings(), before);
}

#[test]
fn screen_parses_from_str() {
    assert_eq!("Converse".parse::<Screen>().unwrap(), Screen::Converse);
    assert_eq!("landing".parse::<Screen>().unwrap(), Screen::Landing);
    assert!("settings".parse::<Screen>().is_err());
}

// =============================================================================
// Sync indicator
// =============================================================================

#[test]
fn sync_indicator_lit_for_window_only() {
    let mut indicator = SyncIndicator::default();
    let start = Instant::now();
    assert!(!indicator.is_syncing(start));

    indicator.mark(start);
    assert!(indicator.is_syncing(start));
    assert!(indicator.is_syncing(start + Duration::from_millis(799)));
    assert!(!indicator.is_syncing(start + SYNC_WINDOW));
}

#[test]
fn only_settings_writes_stamp_the_indicator() {
    let mut view = controller();
    assert!(view.settings_written_at().is_none());

    let repo = view.repository().clone();
    repo.save_chat_history("en", &[Message::new(MessageRole::User, "hi")]).unwrap();
    repo.save_community_chat("en", &[Message::new(MessageRole::Peer, "hey")]).unwrap();
    assert!(repo.last_sync().is_some());
    assert!(view.settings_written_at().is_none());

    view.start_learning().unwrap();
    let written = view.settings_written_at().unwrap();
    let mut indicator = SyncIndicator::default();
    indicator.mark(written);
    assert!(indicator.is_syncing(written + Duration::from_millis(100)));
}

#[test]
fn sync_indicator_restarts_on_new_write() {
    let mut indicator = SyncIndicator::default();
    let start = Instant::now();
    indicator.mark(start);
    indicator.mark(start + Duration::from_millis(600));
    assert!(indicator.is_syncing(start + Duration::from_millis(1000)));
}
