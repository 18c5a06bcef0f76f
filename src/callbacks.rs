//! UI-side collaborators notified by the session layer.

use async_trait::async_trait;

use crate::types::download::DownloadProgress;
use crate::types::events::{FileDialog, FileDialogResponse};
use crate::types::input::Cursor;
use crate::types::tab::TabId;

/// Hooks the surrounding UI implements to react to registry activity.
///
/// Every method has a no-op default so implementors only override what they show.
#[async_trait]
pub trait TabCallbacks: Send + Sync {
    /// A new tab was opened and the address bar should take focus.
    fn on_focus_address_bar(&self) {}

    fn on_cursor_changed(&self, _cursor: Cursor) {}

    fn on_download_update(&self, _tab: TabId, _progress: &DownloadProgress) {}

    /// Shows a file picker and returns the user's selection.
    async fn on_file_dialog(&self, _dialog: FileDialog) -> FileDialogResponse {
        FileDialogResponse::Cancelled
    }

    /// Asks the user whether to open `url` in the system browser.
    async fn on_external_link(&self, _url: &str) {}
}

/// Callbacks that ignore everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

#[async_trait]
impl TabCallbacks for NoopCallbacks {}
