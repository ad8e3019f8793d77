//! Directory-backed store: one `<key>.json` file per key.
//!
//! Writes go to a temp file in the same directory and are renamed into
//! place, so a crash mid-write leaves either the old or the new record.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use super::{KeyValueStore, StoreError, validate_key};

const EXTENSION: &str = "json";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[cfg(test)]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.{EXTENSION}.tmp"));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_record = path
                .extension()
                .is_some_and(|ext| ext == EXTENSION || ext == "tmp");
            if path.is_file() && is_record {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("vaani_user_stats").unwrap(), None);
    }

    #[test]
    fn set_then_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("vaani_user_settings", r#"{"a":1}"#).unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("vaani_user_settings").unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert!(dir.path().join("vaani_user_settings.json").is_file());
    }

    #[test]
    fn set_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["k.json"]);
    }

    #[test]
    fn clear_removes_records_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
        assert!(dir.path().join("notes.txt").is_file());
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x").join("y");
        let store = FileStore::open(&nested).unwrap();
        assert_eq!(store.dir(), nested.as_path());
        assert!(nested.is_dir());
    }

    #[test]
    fn traversal_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(store.set("../escape", "x"), Err(StoreError::InvalidKey(_))));
    }
}
