use serde::{Deserialize, Serialize};

use super::errors::FrameError;

/// Bytes per pixel of every frame and buffer (RGBA, tightly packed).
pub const BYTES_PER_PIXEL: usize = 4;

/// Pixel dimensions of a surface or frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of bytes an RGBA image of this size occupies.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    /// Scales a CSS-pixel size by a device pixel ratio, rounding to whole pixels.
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            width: (self.width as f64 * ratio).round() as u32,
            height: (self.height as f64 * ratio).round() as u32,
        }
    }
}

/// One decoded video frame as delivered by the remote engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Checks that the declared dimensions match the payload length.
    pub fn validate(&self) -> Result<(), FrameError> {
        let size = self.size();
        if size.is_empty() {
            return Err(FrameError::EmptyFrame);
        }
        let expected = size.byte_len();
        if self.data.len() != expected {
            return Err(FrameError::PayloadMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// Off-screen RGBA buffer holding the most recent accepted frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    size: Size,
    data: Vec<u8>,
}

impl FrameBuffer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_size(size: Size) -> Self {
        Self {
            size,
            data: vec![0; size.byte_len()],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Replaces the storage with a zeroed buffer of the new size.
    pub fn reallocate(&mut self, size: Size) {
        self.size = size;
        self.data = vec![0; size.byte_len()];
    }

    /// Copies a validated frame payload into the buffer.
    ///
    /// The caller guarantees `data.len()` equals the buffer's byte length.
    pub fn copy_from(&mut self, data: &[u8]) {
        self.data.copy_from_slice(data);
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}
