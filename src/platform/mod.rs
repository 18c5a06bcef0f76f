// Relaybrowser platform paths
// Where settings and the saved session live on Windows, macOS, and Linux.
//
// The implementation is picked with `cfg(target_os)` at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
use linux as imp;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
use windows as imp;

/// Directory holding `settings.json`.
///
/// - **Linux**: `$XDG_CONFIG_HOME/relaybrowser` or `~/.config/relaybrowser`
/// - **macOS**: `~/Library/Application Support/Relaybrowser`
/// - **Windows**: `%APPDATA%/Relaybrowser`
pub fn get_config_dir() -> PathBuf {
    imp::get_config_dir()
}

/// Directory holding `tabs.json` and `bookmarks.json`.
///
/// - **Linux**: `$XDG_DATA_HOME/relaybrowser` or `~/.local/share/relaybrowser`
/// - **macOS**: `~/Library/Application Support/Relaybrowser`
/// - **Windows**: `%APPDATA%/Relaybrowser`
pub fn get_data_dir() -> PathBuf {
    imp::get_data_dir()
}

/// Scratch directory for anything that can be regenerated.
pub fn get_cache_dir() -> PathBuf {
    imp::get_cache_dir()
}
