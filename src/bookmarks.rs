//! Locally persisted article bookmarks.
//!
//! [`BookmarkStore`] keeps an ordered, duplicate-free list of article ids and
//! writes it back through a [`KeyValueStore`] on every toggle.  The store is
//! injected rather than global so tests can hand in an in-memory fake.
//!
//! Persistence is best-effort in both directions: unreadable or corrupt data
//! loads as an empty set, and a failed write is logged and otherwise ignored.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Key under which the bookmark list is stored.
pub const BOOKMARKS_KEY: &str = "bookmarks";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A persistent string-to-string store.
pub trait KeyValueStore: Send {
    /// Read the value for `key`, or `None` when nothing has been stored yet.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        write_atomically(&path, value.as_bytes())
    }
}

/// Write to a sibling temp file, sync, then rename over `path` so a crash
/// never leaves a half-written file behind.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let temp_path = path.with_extension(format!("tmp.{}", std::process::id()));

    let result = (|| -> std::io::Result<()> {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    Ok(result?)
}

// ---------------------------------------------------------------------------
// Bookmark set
// ---------------------------------------------------------------------------

/// The user's bookmarked article ids.
pub struct BookmarkStore {
    store: Box<dyn KeyValueStore>,
    ids: Vec<String>,
}

impl BookmarkStore {
    /// Rehydrate from `store`.  Missing or corrupt data yields an empty set.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let ids = match store.get(BOOKMARKS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => dedup_preserving_order(ids),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored bookmarks are corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored bookmarks, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = ids.len(), "Loaded bookmarks");
        Self { store, ids }
    }

    /// Flip membership of `id` and persist.  Returns whether `id` is now
    /// bookmarked.
    pub fn toggle(&mut self, id: &str) -> bool {
        let bookmarked = match self.ids.iter().position(|b| b == id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(id.to_string());
                true
            }
        };

        self.persist();
        bookmarked
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|b| b == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.ids) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize bookmarks");
                return;
            }
        };

        if let Err(e) = self.store.set(BOOKMARKS_KEY, &serialized) {
            tracing::warn!(error = %e, "Could not save bookmarks");
        }
    }
}

fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
