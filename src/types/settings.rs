use serde::{Deserialize, Serialize};

use super::session::BookmarkRecord;

/// Top-level configuration for a browser session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub mode: ModeSettings,
    pub navigation: NavigationSettings,
    pub display: DisplaySettings,
    pub timing: TimingSettings,
    #[serde(default)]
    pub default_bookmarks: Vec<BookmarkRecord>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::browser()
    }
}

impl AppConfig {
    /// Interactive browser: owns its tabs, remembers them, renders at the local size.
    pub fn browser() -> Self {
        Self {
            mode: ModeSettings::browser(),
            navigation: NavigationSettings::default(),
            display: DisplaySettings::default(),
            timing: TimingSettings::default(),
            default_bookmarks: Vec::new(),
        }
    }

    /// Read-only observer of a remote browser driven from elsewhere.
    pub fn observer() -> Self {
        Self {
            mode: ModeSettings::observer(),
            ..Self::browser()
        }
    }
}

/// Behaviour switches that distinguish the browser and observer presets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeSettings {
    pub should_restore: bool,
    pub should_save: bool,
    pub should_fetch: bool,
    pub download_allowed: bool,
    pub upload_allowed: bool,
    pub external_links_allowed: bool,
    pub use_server_size: bool,
}

impl ModeSettings {
    pub fn browser() -> Self {
        Self {
            should_restore: true,
            should_save: true,
            should_fetch: false,
            download_allowed: true,
            upload_allowed: true,
            external_links_allowed: true,
            use_server_size: false,
        }
    }

    pub fn observer() -> Self {
        Self {
            should_restore: false,
            should_save: false,
            should_fetch: true,
            download_allowed: false,
            upload_allowed: false,
            external_links_allowed: false,
            use_server_size: true,
        }
    }
}

/// Address-bar resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationSettings {
    /// Search URL template; `{}` is replaced by the encoded query.
    pub search_url: String,
    /// URL opened for a tab created without input. Empty means the engine's blank page.
    pub default_url: String,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search?q={}".to_string(),
            default_url: String::new(),
        }
    }
}

/// Display surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    pub device_pixel_ratio: f64,
    /// RGBA fill used when no tab is active.
    pub background: [u8; 4],
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            background: [0xff, 0xff, 0xff, 0xff],
        }
    }
}

/// Intervals driving the session loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingSettings {
    pub reconcile_interval_secs: u64,
    pub resize_debounce_ms: u64,
    #[serde(default)]
    pub autosave_interval_secs: Option<u64>,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            reconcile_interval_secs: 5,
            resize_debounce_ms: 100,
            autosave_interval_secs: None,
        }
    }
}
