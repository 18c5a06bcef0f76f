//! Uniform scale-to-fit transform between the remote surface and the local display.

use crate::types::frame::Size;

/// Converts local display coordinates into remote surface coordinates.
pub trait CoordinateMapping {
    fn convert_local_to_remote(&self, x: f64, y: f64) -> (f64, f64);
}

/// Placement of the remote image inside the local display.
///
/// `scale = min(local_w / remote_w, local_h / remote_h)`; the offsets centre
/// the scaled image, leaving letterbox or pillarbox bars on the other axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub draw_width: f64,
    pub draw_height: f64,
}

impl DrawParams {
    /// 1:1 placement of an image of `size` at the origin.
    pub fn identity(size: Size) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            draw_width: size.width as f64,
            draw_height: size.height as f64,
        }
    }

    /// Fits `remote` inside `local`. Degenerate sizes fall back to identity.
    pub fn fit(remote: Size, local: Size) -> Self {
        if remote.is_empty() || local.is_empty() {
            return Self::identity(remote);
        }

        let (rw, rh) = (remote.width as f64, remote.height as f64);
        let (lw, lh) = (local.width as f64, local.height as f64);
        let scale = (lw / rw).min(lh / rh);
        let draw_width = rw * scale;
        let draw_height = rh * scale;

        Self {
            scale,
            offset_x: (lw - draw_width) / 2.0,
            offset_y: (lh - draw_height) / 2.0,
            draw_width,
            draw_height,
        }
    }

    pub fn to_remote(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale)
    }

    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }
}

impl Default for DrawParams {
    fn default() -> Self {
        Self::identity(Size::default())
    }
}

impl CoordinateMapping for DrawParams {
    fn convert_local_to_remote(&self, x: f64, y: f64) -> (f64, f64) {
        self.to_remote(x, y)
    }
}
