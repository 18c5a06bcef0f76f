use std::fmt;

use serde::{Deserialize, Serialize};

/// Engine-assigned tab identifier. Unique among currently open tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title shown until the remote page reports its own.
pub const PLACEHOLDER_TITLE: &str = "New Tab";

/// Presentation and navigation state of one open tab.
///
/// Every field except `id` is the last value reported by the remote engine
/// (or set by the registry for `active` and `pinned`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabState {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub favicon: String,
    pub active: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub is_loading: bool,
    pub pinned: bool,
    pub hovered_url: String,
}

impl TabState {
    pub fn new(id: TabId) -> Self {
        Self {
            id,
            title: PLACEHOLDER_TITLE.to_string(),
            url: String::new(),
            favicon: String::new(),
            active: false,
            can_go_back: false,
            can_go_forward: false,
            is_loading: false,
            pinned: false,
            hovered_url: String::new(),
        }
    }
}

/// Initial values for a tab being created from a remembered record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabSeed {
    pub title: Option<String>,
    pub url: Option<String>,
    pub favicon: Option<String>,
    pub pinned: bool,
}

/// Page load status reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Loading,
    Loaded,
    LoadError,
}

/// Load-state notification: drives the loading spinner and back/forward buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadState {
    pub status: LoadStatus,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}
