//! Frame renderers.
//!
//! [`ScaledRenderer`] letterboxes remote frames of any size into the local
//! display. [`DirectRenderer`] expects the remote surface to already match the
//! local display in device pixels and draws frames 1:1. Which one a session
//! uses is decided once, from [`ModeSettings::use_server_size`].
//!
//! [`ModeSettings::use_server_size`]: crate::types::settings::ModeSettings

use tracing::{debug, warn};

use crate::types::errors::FrameError;
use crate::types::frame::{Frame, FrameBuffer, Size};
use crate::types::settings::AppConfig;

use super::mapper::{CoordinateMapping, DrawParams};
use super::surface::DisplaySurface;

/// Presents frames of the active tab on a display surface.
pub trait FrameRenderer: CoordinateMapping + Send {
    /// Draws one frame. Invalid frames are dropped and the previous image stays.
    fn render(&mut self, frame: &Frame) -> Result<(), FrameError>;

    /// Adapts to a new local display size, in CSS pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Fills the surface with the background colour.
    fn clear(&mut self);

    /// Announces the remote surface size ahead of the first frame.
    fn set_remote_size(&mut self, _size: Size) {}

    fn draw_params(&self) -> DrawParams;

    /// Size of the off-screen buffer, i.e. of the last accepted frame.
    fn remote_size(&self) -> Size;

    /// Size of the display surface in device pixels.
    fn local_size(&self) -> Size;

    /// How often the off-screen buffer changed dimensions.
    fn reallocations(&self) -> u64;
}

/// Picks the renderer matching the session mode.
pub fn build_renderer<S>(config: &AppConfig, surface: S) -> Box<dyn FrameRenderer>
where
    S: DisplaySurface + 'static,
{
    let dpr = config.display.device_pixel_ratio;
    let background = config.display.background;
    if config.mode.use_server_size {
        Box::new(ScaledRenderer::new(surface, dpr, background))
    } else {
        Box::new(DirectRenderer::new(surface, dpr, background))
    }
}

fn sanitize_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}

// === ScaledRenderer ===

/// Renders remote frames of any size, scaled to fit and centred.
pub struct ScaledRenderer<S: DisplaySurface> {
    surface: S,
    buffer: FrameBuffer,
    params: DrawParams,
    dpr: f64,
    background: [u8; 4],
    reallocations: u64,
}

impl<S: DisplaySurface> ScaledRenderer<S> {
    pub fn new(surface: S, dpr: f64, background: [u8; 4]) -> Self {
        Self {
            surface,
            buffer: FrameBuffer::empty(),
            params: DrawParams::default(),
            dpr: sanitize_ratio(dpr),
            background,
            reallocations: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn reallocate(&mut self, size: Size) {
        let previous = self.buffer.size();
        if previous == size {
            return;
        }
        if !self.buffer.is_empty() {
            self.reallocations += 1;
            debug!(
                from = ?previous,
                to = ?size,
                "remote surface resized, reallocating frame buffer"
            );
        }
        self.buffer.reallocate(size);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.params = DrawParams::fit(self.buffer.size(), self.surface.size());
    }
}

impl<S: DisplaySurface> CoordinateMapping for ScaledRenderer<S> {
    fn convert_local_to_remote(&self, x: f64, y: f64) -> (f64, f64) {
        self.params.to_remote(x * self.dpr, y * self.dpr)
    }
}

impl<S: DisplaySurface> FrameRenderer for ScaledRenderer<S> {
    fn render(&mut self, frame: &Frame) -> Result<(), FrameError> {
        if let Err(e) = frame.validate() {
            warn!(error = %e, "dropping frame");
            return Err(e);
        }

        self.surface.fill(self.background);
        self.reallocate(frame.size());
        self.buffer.copy_from(&frame.data);
        self.surface.blit(&self.buffer, &self.params);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(Size::new(width, height).scaled(self.dpr));
        self.recompute();
        self.surface.fill(self.background);
        if !self.buffer.is_empty() {
            self.surface.blit(&self.buffer, &self.params);
        }
    }

    fn clear(&mut self) {
        self.surface.fill(self.background);
    }

    fn set_remote_size(&mut self, size: Size) {
        if !size.is_empty() {
            self.reallocate(size);
        }
    }

    fn draw_params(&self) -> DrawParams {
        self.params
    }

    fn remote_size(&self) -> Size {
        self.buffer.size()
    }

    fn local_size(&self) -> Size {
        self.surface.size()
    }

    fn reallocations(&self) -> u64 {
        self.reallocations
    }
}

// === DirectRenderer ===

/// Renders frames that already match the display's device-pixel size.
pub struct DirectRenderer<S: DisplaySurface> {
    surface: S,
    buffer: FrameBuffer,
    dpr: f64,
    background: [u8; 4],
    reallocations: u64,
}

impl<S: DisplaySurface> DirectRenderer<S> {
    pub fn new(surface: S, dpr: f64, background: [u8; 4]) -> Self {
        let buffer = FrameBuffer::with_size(surface.size());
        Self {
            surface,
            buffer,
            dpr: sanitize_ratio(dpr),
            background,
            reallocations: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: DisplaySurface> CoordinateMapping for DirectRenderer<S> {
    fn convert_local_to_remote(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.dpr, y * self.dpr)
    }
}

impl<S: DisplaySurface> FrameRenderer for DirectRenderer<S> {
    fn render(&mut self, frame: &Frame) -> Result<(), FrameError> {
        if let Err(e) = frame.validate() {
            warn!(error = %e, "dropping frame");
            return Err(e);
        }

        self.surface.fill(self.background);
        let expected = self.buffer.size();
        if frame.size() != expected {
            warn!(
                buffer = ?expected,
                frame = ?frame.size(),
                "frame size mismatch, dropping frame"
            );
            return Err(FrameError::SizeMismatch {
                expected,
                actual: frame.size(),
            });
        }

        self.buffer.copy_from(&frame.data);
        self.surface
            .blit(&self.buffer, &DrawParams::identity(self.buffer.size()));
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        let size = Size::new(width, height).scaled(self.dpr);
        self.surface.resize(size);
        if self.buffer.size() != size {
            if !self.buffer.is_empty() {
                self.reallocations += 1;
            }
            debug!(size = ?size, "display resized, reallocating frame buffer");
            self.buffer.reallocate(size);
        }
        self.surface.fill(self.background);
    }

    fn clear(&mut self) {
        self.surface.fill(self.background);
    }

    fn draw_params(&self) -> DrawParams {
        DrawParams::identity(self.buffer.size())
    }

    fn remote_size(&self) -> Size {
        self.buffer.size()
    }

    fn local_size(&self) -> Size {
        self.surface.size()
    }

    fn reallocations(&self) -> u64 {
        self.reallocations
    }
}
