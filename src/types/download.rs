use serde::{Deserialize, Serialize};

/// Progress notification for a download running inside the remote engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub id: u32,
    pub path: String,
    pub received: u64,
    pub total: u64,
    pub is_complete: bool,
    pub is_aborted: bool,
}

/// A tracked download together with the tab that started it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    pub tab: super::tab::TabId,
    pub progress: DownloadProgress,
}

impl DownloadItem {
    /// Completion ratio in `0.0..=1.0`; `0.0` while the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.progress.total == 0 {
            return 0.0;
        }
        (self.progress.received as f64 / self.progress.total as f64).min(1.0)
    }
}
