//! View controller — the top-level screen state machine.
//!
//! DESIGN
//! ======
//! The controller owns the current screen plus the learner's settings and
//! stats, and writes the settings record after every settings-affecting
//! transition. The onboarding-complete flag is never set directly: it is
//! derived from the current screen at write time, so it is false exactly
//! while the learner sits on Landing or Onboarding.
//!
//! The "syncing" indicator is presentation only. [`SyncIndicator`] is fed
//! instants by its caller and never gates a write.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::store::models::{Goal, Language, Persona, Settings, Stats, StatsUpdate};
use crate::store::{Repository, StoreError};

// =============================================================================
// SCREENS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Landing,
    Onboarding,
    Lessons,
    Converse,
    Quiz,
    Profile,
    Community,
}

impl Screen {
    /// Screens reachable from the navigation bar once onboarding is done.
    pub const NAVIGABLE: [Self; 5] = [Self::Lessons, Self::Converse, Self::Quiz, Self::Profile, Self::Community];

    #[must_use]
    pub fn is_navigable(self) -> bool {
        !matches!(self, Self::Landing | Self::Onboarding)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Onboarding => "onboarding",
            Self::Lessons => "lessons",
            Self::Converse => "converse",
            Self::Quiz => "quiz",
            Self::Profile => "profile",
            Self::Community => "community",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown screen '{0}'")]
pub struct UnknownScreen(String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [Self::Landing, Self::Onboarding].into_iter().chain(Self::NAVIGABLE);
        all.into_iter()
            .find(|screen| screen.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: Screen, to: Screen },
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct ViewController {
    repo: Repository,
    screen: Screen,
    settings: Settings,
    stats: Stats,
    settings_written: Option<Instant>,
}

impl ViewController {
    /// Read settings and stats; resume on Lessons if onboarding was finished.
    /// Loading does not write anything.
    #[must_use]
    pub fn load(repo: Repository) -> Self {
        let settings = repo.settings();
        let stats = repo.stats();
        let screen = if settings.has_completed_onboarding { Screen::Lessons } else { Screen::Landing };
        tracing::debug!(%screen, language = %settings.language.code, "view: loaded");
        Self { repo, screen, settings, stats, settings_written: None }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.settings.language
    }

    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// When this controller last wrote the settings record. Feeds a
    /// [`SyncIndicator`]; other records never touch it.
    #[must_use]
    pub fn settings_written_at(&self) -> Option<Instant> {
        self.settings_written
    }

    /// Enter onboarding. Allowed from any screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings record cannot be written.
    pub fn start_learning(&mut self) -> Result<(), ViewError> {
        self.commit(Screen::Onboarding, self.settings.clone())
    }

    /// Record the onboarding choices and move to Lessons.
    ///
    /// # Errors
    ///
    /// Fails unless the controller is on the Onboarding screen, or if the
    /// settings record cannot be written.
    pub fn complete_onboarding(&mut self, persona: Persona, goal: Goal, language: Language) -> Result<(), ViewError> {
        if self.screen != Screen::Onboarding {
            return Err(ViewError::InvalidTransition { from: self.screen, to: Screen::Lessons });
        }
        let settings = Settings { persona, goal, language, ..self.settings.clone() };
        self.commit(Screen::Lessons, settings)
    }

    /// Move to `to`. Landing is always reachable; Onboarding only from
    /// Landing; the five navigable screens only from each other.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidTransition`] for any other move, or a
    /// store error if the settings record cannot be written.
    pub fn navigate(&mut self, to: Screen) -> Result<(), ViewError> {
        let allowed = match to {
            Screen::Landing => true,
            Screen::Onboarding => self.screen == Screen::Landing,
            _ => self.screen.is_navigable(),
        };
        if !allowed {
            return Err(ViewError::InvalidTransition { from: self.screen, to });
        }
        self.commit(to, self.settings.clone())
    }

    /// # Errors
    ///
    /// Returns an error if the settings record cannot be written.
    pub fn select_language(&mut self, language: Language) -> Result<(), ViewError> {
        let settings = Settings { language, ..self.settings.clone() };
        self.commit(self.screen, settings)
    }

    /// # Errors
    ///
    /// Returns an error if the settings record cannot be written.
    pub fn toggle_theme(&mut self) -> Result<(), ViewError> {
        let settings = Settings { theme: self.settings.theme.toggled(), ..self.settings.clone() };
        self.commit(self.screen, settings)
    }

    /// Shallow-merge `update` into the stored stats record (not the copy
    /// read at `load`) and keep the merged result.
    ///
    /// # Errors
    ///
    /// Returns an error if the stats record cannot be written.
    pub fn update_stats(&mut self, update: StatsUpdate) -> Result<&Stats, ViewError> {
        self.stats = self.repo.update_stats(update)?;
        Ok(&self.stats)
    }

    /// Wipe every record and start over as a first-time learner.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub fn reload(&mut self) -> Result<(), ViewError> {
        self.repo.reset()?;
        let repo = self.repo.clone();
        *self = Self::load(repo);
        Ok(())
    }

    /// Save `settings` for `screen`, then adopt both. A failed write leaves
    /// the controller untouched.
    fn commit(&mut self, screen: Screen, mut settings: Settings) -> Result<(), ViewError> {
        settings.has_completed_onboarding = screen.is_navigable();
        self.repo.save_settings(&settings)?;
        self.screen = screen;
        self.settings = settings;
        self.settings_written = Some(Instant::now());
        tracing::debug!(screen = %self.screen, onboarded = self.settings.has_completed_onboarding, "view: settings saved");
        Ok(())
    }
}

// =============================================================================
// SYNC INDICATOR
// =============================================================================

pub const SYNC_WINDOW: Duration = Duration::from_millis(800);

/// Cosmetic "syncing" flag, lit for [`SYNC_WINDOW`] after each settings write.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncIndicator {
    last_write: Option<Instant>,
}

impl SyncIndicator {
    pub fn mark(&mut self, at: Instant) {
        self.last_write = Some(at);
    }

    #[must_use]
    pub fn is_syncing(&self, now: Instant) -> bool {
        self.last_write
            .is_some_and(|at| now.saturating_duration_since(at) < SYNC_WINDOW)
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
