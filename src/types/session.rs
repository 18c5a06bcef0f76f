use serde::{Deserialize, Serialize};

use super::tab::TabState;

/// A tab's state as written to the transient session file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedTab {
    pub title: String,
    pub url: String,
    pub favicon: String,
    pub pinned: bool,
    pub active: bool,
}

impl From<&TabState> for PersistedTab {
    fn from(tab: &TabState) -> Self {
        Self {
            title: tab.title.clone(),
            url: tab.url.clone(),
            favicon: tab.favicon.clone(),
            pinned: tab.pinned,
            active: tab.active,
        }
    }
}

/// A pinned tab mirrored into the bookmark list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkRecord {
    pub title: String,
    pub url: String,
    pub favicon: String,
}
