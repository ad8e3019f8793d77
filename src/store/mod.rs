//! Local key-value store and the typed repository on top of it.
//!
//! DESIGN
//! ======
//! `KeyValueStore` is the storage seam: string keys, string (JSON) values,
//! synchronous and atomic per key. [`FileStore`] keeps one file per key
//! under a data directory; tests use an in-memory map instead.
//! Nothing above this layer knows which one it is talking to; consumers
//! receive a [`Repository`] that owns an `Arc<dyn KeyValueStore>`.

pub mod file;
pub mod models;
pub mod repository;

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use file::FileStore;
pub use repository::Repository;

// =============================================================================
// KEYS
// =============================================================================

pub const STATS_KEY: &str = "vaani_user_stats";
pub const SETTINGS_KEY: &str = "vaani_user_settings";
pub const CHATS_KEY: &str = "vaani_chats_v1";
pub const COMMUNITY_CHATS_KEY: &str = "vaani_community_v1";
pub const LAST_SYNC_KEY: &str = "vaani_last_sync";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store key '{0}'")]
    InvalidKey(String),
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl crate::error::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "E_STORE_KEY",
            Self::Io(_) => "E_STORE_IO",
            Self::Serialize(_) => "E_STORE_SERIALIZE",
            Self::Timestamp(_) => "E_STORE_TIMESTAMP",
        }
    }
}

/// Keys may only contain ASCII alphanumerics, `_`, `-` and `.`, and may not
/// start with a dot. This keeps a caller-supplied language suffix from
/// addressing anything outside the store.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] for any other key.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if ok { Ok(()) } else { Err(StoreError::InvalidKey(key.to_string())) }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Synchronous string key-value storage. Writes are atomic per key.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be cleared.
    fn clear(&self) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store for tests. Contents vanish with the value.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries().clear();
        Ok(())
    }
}
