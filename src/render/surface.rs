//! Display surfaces frames are blitted onto.

use crate::types::frame::{FrameBuffer, Size, BYTES_PER_PIXEL};

use super::mapper::DrawParams;

/// A pixel target owned by a renderer.
pub trait DisplaySurface: Send {
    /// Sets the surface's size in device pixels.
    fn resize(&mut self, size: Size);
    fn size(&self) -> Size;
    /// Fills the whole surface with one RGBA colour.
    fn fill(&mut self, rgba: [u8; 4]);
    /// Draws `buffer` scaled and positioned by `params`.
    fn blit(&mut self, buffer: &FrameBuffer, params: &DrawParams);
}

/// Software RGBA surface.
///
/// Blits use nearest-neighbour sampling; anything outside the surface is clipped.
#[derive(Debug, Clone, Default)]
pub struct PixelSurface {
    size: Size,
    data: Vec<u8>,
}

impl PixelSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            data: vec![0; size.byte_len()],
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = self.index(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

impl DisplaySurface for PixelSurface {
    fn resize(&mut self, size: Size) {
        if size != self.size {
            self.size = size;
            self.data = vec![0; size.byte_len()];
        }
    }

    fn size(&self) -> Size {
        self.size
    }

    fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    fn blit(&mut self, buffer: &FrameBuffer, params: &DrawParams) {
        let src = buffer.size();
        if src.is_empty() || self.size.is_empty() || params.scale <= 0.0 {
            return;
        }

        let x0 = params.offset_x.max(0.0).floor() as u32;
        let y0 = params.offset_y.max(0.0).floor() as u32;
        let x1 = ((params.offset_x + params.draw_width).ceil().max(0.0) as u32).min(self.size.width);
        let y1 =
            ((params.offset_y + params.draw_height).ceil().max(0.0) as u32).min(self.size.height);

        let pixels = buffer.pixels();
        for dy in y0..y1 {
            let sy = ((dy as f64 + 0.5 - params.offset_y) / params.scale).floor();
            if sy < 0.0 || sy >= src.height as f64 {
                continue;
            }
            for dx in x0..x1 {
                let sx = ((dx as f64 + 0.5 - params.offset_x) / params.scale).floor();
                if sx < 0.0 || sx >= src.width as f64 {
                    continue;
                }
                let s = (sy as usize * src.width as usize + sx as usize) * BYTES_PER_PIXEL;
                let d = self.index(dx, dy);
                self.data[d..d + BYTES_PER_PIXEL].copy_from_slice(&pixels[s..s + BYTES_PER_PIXEL]);
            }
        }
    }
}
