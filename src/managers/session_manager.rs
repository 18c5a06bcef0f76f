//! Session storage for Relaybrowser.
//!
//! Persists the transient tab list and the pinned-tab bookmark list as two
//! flat JSON documents, `tabs.json` and `bookmarks.json`. A missing document
//! reads as an empty list; a malformed one is an error the caller recovers from.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::platform;
use crate::types::errors::SessionError;
use crate::types::session::{BookmarkRecord, PersistedTab};

pub const TABS_FILE: &str = "tabs.json";
pub const BOOKMARKS_FILE: &str = "bookmarks.json";

/// Trait defining session storage operations.
pub trait SessionStore: Send + Sync {
    fn read_tabs(&self) -> Result<Vec<PersistedTab>, SessionError>;
    fn write_tabs(&self, tabs: &[PersistedTab]) -> Result<(), SessionError>;
    /// `None` when no bookmark list was ever written.
    fn read_bookmarks(&self) -> Result<Option<Vec<BookmarkRecord>>, SessionError>;
    fn write_bookmarks(&self, bookmarks: &[BookmarkRecord]) -> Result<(), SessionError>;
}

/// Session store writing JSON documents into one directory.
pub struct JsonSessionStore {
    dir: PathBuf,
}

impl JsonSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform data directory.
    pub fn default_location() -> Self {
        Self::new(platform::get_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Vec<T>>, SessionError> {
        let path = self.dir.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SessionError::IoError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        serde_json::from_str(&content).map(Some).map_err(|e| {
            SessionError::SerializationError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn write<T: Serialize>(&self, name: &str, items: &[T]) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SessionError::IoError(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| SessionError::SerializationError(e.to_string()))?;
        let path = self.dir.join(name);
        fs::write(&path, json)
            .map_err(|e| SessionError::IoError(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl SessionStore for JsonSessionStore {
    fn read_tabs(&self) -> Result<Vec<PersistedTab>, SessionError> {
        Ok(self.read(TABS_FILE)?.unwrap_or_default())
    }

    fn write_tabs(&self, tabs: &[PersistedTab]) -> Result<(), SessionError> {
        self.write(TABS_FILE, tabs)
    }

    fn read_bookmarks(&self) -> Result<Option<Vec<BookmarkRecord>>, SessionError> {
        self.read(BOOKMARKS_FILE)
    }

    fn write_bookmarks(&self, bookmarks: &[BookmarkRecord]) -> Result<(), SessionError> {
        self.write(BOOKMARKS_FILE, bookmarks)
    }
}

/// Session store kept in memory; nothing outlives the process.
#[derive(Default)]
pub struct MemorySessionStore {
    tabs: Mutex<Vec<PersistedTab>>,
    bookmarks: Mutex<Option<Vec<BookmarkRecord>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(tabs: Vec<PersistedTab>, bookmarks: Vec<BookmarkRecord>) -> Self {
        Self {
            tabs: Mutex::new(tabs),
            bookmarks: Mutex::new(Some(bookmarks)),
        }
    }
}

fn poisoned<T>(_: T) -> SessionError {
    SessionError::IoError("session store lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn read_tabs(&self) -> Result<Vec<PersistedTab>, SessionError> {
        Ok(self.tabs.lock().map_err(poisoned)?.clone())
    }

    fn write_tabs(&self, tabs: &[PersistedTab]) -> Result<(), SessionError> {
        *self.tabs.lock().map_err(poisoned)? = tabs.to_vec();
        Ok(())
    }

    fn read_bookmarks(&self) -> Result<Option<Vec<BookmarkRecord>>, SessionError> {
        Ok(self.bookmarks.lock().map_err(poisoned)?.clone())
    }

    fn write_bookmarks(&self, bookmarks: &[BookmarkRecord]) -> Result<(), SessionError> {
        *self.bookmarks.lock().map_err(poisoned)? = Some(bookmarks.to_vec());
        Ok(())
    }
}
