// Relaybrowser state managers
// Managers own mutable session state: tabs, bookmarks, downloads, shortcuts and storage.

pub mod bookmark_manager;
pub mod download_manager;
pub mod session_manager;
pub mod shortcut_manager;
pub mod tab_registry;
