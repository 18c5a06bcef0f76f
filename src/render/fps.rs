use std::time::{Duration, Instant};

/// Counts rendered frames and reports a rate once per second.
#[derive(Debug, Clone)]
pub struct FpsTracker {
    frames: u32,
    since: Instant,
    fps: u32,
}

impl FpsTracker {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            since: now,
            fps: 0,
        }
    }

    /// Records one frame. Returns the new rate when a full window has elapsed.
    pub fn record(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.since);
        if elapsed < Self::WINDOW {
            return None;
        }
        self.fps = (self.frames as f64 / elapsed.as_secs_f64()).round() as u32;
        self.frames = 0;
        self.since = now;
        Some(self.fps)
    }

    /// Last reported rate.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}
