//! Download Manager for Relaybrowser.
//!
//! Tracks downloads running inside the remote engine from their progress events.

use crate::types::download::{DownloadItem, DownloadProgress};
use crate::types::tab::TabId;

/// Trait defining download tracking operations.
pub trait DownloadManagerTrait {
    fn update(&mut self, tab: TabId, progress: DownloadProgress);
    fn list(&self) -> &[DownloadItem];
    fn get(&self, id: u32) -> Option<&DownloadItem>;
}

/// In-memory download list in arrival order.
#[derive(Debug, Clone, Default)]
pub struct DownloadManager {
    downloads: Vec<DownloadItem>,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloads still transferring.
    pub fn active(&self) -> impl Iterator<Item = &DownloadItem> {
        self.downloads.iter().filter(|d| !d.progress.is_complete)
    }
}

impl DownloadManagerTrait for DownloadManager {
    /// Aborted downloads are dropped, known ids replaced, new ids appended.
    fn update(&mut self, tab: TabId, progress: DownloadProgress) {
        if progress.is_aborted {
            self.downloads.retain(|d| d.progress.id != progress.id);
            return;
        }

        match self.downloads.iter_mut().find(|d| d.progress.id == progress.id) {
            Some(existing) => {
                existing.tab = tab;
                existing.progress = progress;
            }
            None => self.downloads.push(DownloadItem { tab, progress }),
        }
    }

    fn list(&self) -> &[DownloadItem] {
        &self.downloads
    }

    fn get(&self, id: u32) -> Option<&DownloadItem> {
        self.downloads.iter().find(|d| d.progress.id == id)
    }
}
