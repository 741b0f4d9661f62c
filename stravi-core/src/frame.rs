//! Decoded frame types shared by the decoder and the muxer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels in one frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of a packed 24-bit RGB raster for this geometry.
    pub fn rgb_len(&self) -> usize {
        self.pixel_count() * 3
    }
}

impl Default for Geometry {
    /// 320×240, the most common STR movie size.
    fn default() -> Self {
        Self::new(320, 240)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decoded frame: packed RGB, 8 bits per channel, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    geometry: Geometry,
    data: Vec<u8>,
}

impl RgbFrame {
    /// Create a black frame of the given size.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            data: vec![0; geometry.rgb_len()],
        }
    }

    /// Wrap an existing raster. Returns `None` if the length does not match.
    pub fn from_raw(geometry: Geometry, data: Vec<u8>) -> Option<Self> {
        (data.len() == geometry.rgb_len()).then_some(Self { geometry, data })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// One row of packed RGB bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.geometry.width as usize * 3;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }
}

#[cfg(test)]
#[path = "tests/frame_tests.rs"]
mod tests;
