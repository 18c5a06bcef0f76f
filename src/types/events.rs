use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::download::DownloadProgress;
use super::frame::Frame;
use super::input::Cursor;
use super::tab::LoadState;

/// Notifications emitted on a tab's event stream by the remote engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    Title(String),
    Url(String),
    Favicon(String),
    UrlHovered(String),
    LoadState(LoadState),
    NewTab(String),
    DownloadProgress(DownloadProgress),
    FileDialog(FileDialog),
    ExternalLink(String),
    Frame(Frame),
    Cursor(Cursor),
}

impl TabEvent {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            TabEvent::Title(_) => "Title",
            TabEvent::Url(_) => "Url",
            TabEvent::Favicon(_) => "Favicon",
            TabEvent::UrlHovered(_) => "UrlHovered",
            TabEvent::LoadState(_) => "LoadState",
            TabEvent::NewTab(_) => "NewTab",
            TabEvent::DownloadProgress(_) => "DownloadProgress",
            TabEvent::FileDialog(_) => "FileDialog",
            TabEvent::ExternalLink(_) => "ExternalLink",
            TabEvent::Frame(_) => "Frame",
            TabEvent::Cursor(_) => "Cursor",
        }
    }
}

/// Kind of file chooser the remote page asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileDialogMode {
    Open,
    OpenMultiple,
    OpenFolder,
    Save,
}

/// A file chooser request raised by the remote page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDialog {
    pub mode: FileDialogMode,
    pub title: String,
    pub default_path: String,
    pub accept_types: Vec<String>,
}

/// Answer relayed back to the remote page after a file dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileDialogResponse {
    Cancelled,
    Selected(Vec<PathBuf>),
}

impl FileDialogResponse {
    /// An empty selection is reported to the page as a cancellation.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        if paths.is_empty() {
            FileDialogResponse::Cancelled
        } else {
            FileDialogResponse::Selected(paths)
        }
    }
}
