//! Bookmark Manager for Relaybrowser.
//!
//! Pinned tabs are mirrored into this list so they survive a lost or
//! corrupted transient session.

use crate::types::errors::SessionError;
use crate::types::session::BookmarkRecord;

use super::session_manager::SessionStore;

/// Trait defining bookmark operations.
pub trait BookmarkManagerTrait {
    fn add(&mut self, title: &str, url: &str, favicon: &str);
    fn remove(&mut self, url: &str) -> bool;
    fn all(&self) -> &[BookmarkRecord];
    fn contains(&self, url: &str) -> bool;
}

/// Ordered in-memory bookmark list.
#[derive(Debug, Clone, Default)]
pub struct BookmarkManager {
    bookmarks: Vec<BookmarkRecord>,
}

impl BookmarkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list with what `store` holds.
    ///
    /// Falls back to `defaults` when the document is missing or unreadable.
    pub fn load(&mut self, store: &dyn SessionStore, defaults: &[BookmarkRecord]) {
        self.bookmarks = match store.read_bookmarks() {
            Ok(Some(list)) => list,
            Ok(None) => defaults.to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, "bookmarks unreadable, using defaults");
                defaults.to_vec()
            }
        };
    }

    pub fn save(&self, store: &dyn SessionStore) -> Result<(), SessionError> {
        store.write_bookmarks(&self.bookmarks)
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    /// Adds a bookmark unless one with the same URL exists.
    fn add(&mut self, title: &str, url: &str, favicon: &str) {
        if self.contains(url) {
            return;
        }
        self.bookmarks.push(BookmarkRecord {
            title: title.to_string(),
            url: url.to_string(),
            favicon: favicon.to_string(),
        });
    }

    fn remove(&mut self, url: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.url != url);
        self.bookmarks.len() != before
    }

    fn all(&self) -> &[BookmarkRecord] {
        &self.bookmarks
    }

    fn contains(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|b| b.url == url)
    }
}
