use std::time::{Duration, Instant};

use crate::types::frame::Size;

/// Coalesces a burst of display resizes into one, delivered after a quiet period.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<(Size, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Records a resize at `now`, restarting the quiet period.
    pub fn push(&mut self, size: Size, now: Instant) {
        self.pending = Some((size, now + self.window));
    }

    /// Returns the latest size once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        match self.pending {
            Some((size, deadline)) if now >= deadline => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    /// When the pending resize becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }
}
