//! Durable key/value storage for the session.
//!
//! The session keeps its tokens here so that a restarted client can
//! restore the previous login. Preferences (region, theme) live in the
//! same store under their own keys.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::SessionError;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// String values under string keys that outlive the process.
///
/// Reads never fail: a value that can't be read is simply absent.
/// Writes report failures so the caller can decide whether they matter.
///
/// ## Trait bounds
///
/// - `Send + Sync` → one store is shared by the session and any other
///   component that persists client-side state.
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `SessionError::Store` if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns `SessionError::Store` if the removal could not be persisted.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

fn lock(map: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A store that forgets everything when dropped. Used in tests and for
/// one-off sessions that must not touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        lock(&self.values).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// A store backed by a single JSON object on disk.
///
/// The whole file is loaded on open and rewritten on every change. The
/// file holds a handful of short strings, so this stays cheap.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; it
    /// is created on the first write.
    ///
    /// # Errors
    /// Returns `SessionError::Store` if the file exists but cannot be
    /// read or does not hold a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| SessionError::Store(std::io::Error::other(e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SessionError::Store(e)),
        };

        tracing::debug!(path = %path.display(), entries = values.len(), "session store opened");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(SessionError::Store)?;
        }
        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| SessionError::Store(std::io::Error::other(e)))?;

        // Write then rename, so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(SessionError::Store)?;
        fs::rename(&tmp, &self.path).map_err(SessionError::Store)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = lock(&self.values);
        let mut next = values.clone();
        next.insert(key.to_owned(), value.to_owned());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = lock(&self.values);
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // MemoryStore
    // =====================================================================

    #[test]
    fn test_memory_set_then_get() {
        let store = MemoryStore::new();
        store.set(ACCESS_TOKEN_KEY, "A").unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY), None);
    }

    #[test]
    fn test_memory_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("nothing").expect("removing a missing key succeeds");
    }

    // =====================================================================
    // FileStore
    // =====================================================================

    #[test]
    fn test_file_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("session.json")).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
        assert!(!store.path().exists(), "nothing written until first set");
    }

    #[test]
    fn test_file_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set(ACCESS_TOKEN_KEY, "A").unwrap();
            store.set(REFRESH_TOKEN_KEY, "R").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("A"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("R"));
    }

    #[test]
    fn test_file_remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set(ACCESS_TOKEN_KEY, "A").unwrap();
        store.remove(ACCESS_TOKEN_KEY).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY), None);
    }

    #[test]
    fn test_file_failed_write_leaves_values_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("sub");
        let store = FileStore::open(parent.join("session.json")).unwrap();
        store.set(ACCESS_TOKEN_KEY, "A").unwrap();

        // A file where the directory should be makes every write fail.
        fs::remove_dir_all(&parent).unwrap();
        fs::write(&parent, "blocker").unwrap();

        assert!(matches!(store.set(ACCESS_TOKEN_KEY, "B"), Err(SessionError::Store(_))));
        assert!(matches!(store.remove(ACCESS_TOKEN_KEY), Err(SessionError::Store(_))));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A"));
    }

    #[test]
    fn test_file_open_corrupt_file_returns_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let result = FileStore::open(&path);
        assert!(matches!(result, Err(SessionError::Store(_))));
    }
}
