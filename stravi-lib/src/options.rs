use stravi_core::Geometry;

use crate::settings::{DEFAULT_FPS, Settings};

/// Options for one STR→AVI conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Output frame rate.
    pub fps: u32,
    /// Geometry for frames whose chunk headers declare none, and for
    /// outputs with no frames at all.
    pub fallback_geometry: Geometry,
    /// Decode every frame at this size, ignoring the stream's own.
    pub geometry_override: Option<Geometry>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            fallback_geometry: Geometry::default(),
            geometry_override: None,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let c = &settings.conversion;
        Self::new()
            .fps(c.fps)
            .fallback_geometry(c.default_geometry)
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn fallback_geometry(mut self, geometry: Geometry) -> Self {
        self.fallback_geometry = geometry;
        self
    }

    pub fn geometry_override(mut self, geometry: Option<Geometry>) -> Self {
        self.geometry_override = geometry;
        self
    }

    /// Size to decode a frame at, given what its chunk headers declare.
    pub fn decode_geometry(&self, declared: Geometry) -> Geometry {
        match self.geometry_override {
            Some(g) => g,
            None if declared.is_empty() => self.fallback_geometry,
            None => declared,
        }
    }
}

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod tests;
