//! Persistent settings.
//!
//! The settings file lives at `~/.config/stravi/settings.toml`. Every key
//! is optional; anything missing takes its built-in default.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stravi_core::Geometry;

use crate::error::ConvertError;

pub const DEFAULT_FPS: u32 = 15;

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub conversion: ConversionSettings,
}

/// `[conversion]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Output frame rate.
    pub fps: u32,
    /// Geometry used when the stream does not declare one, written as a
    /// `[conversion.default_geometry]` table.
    pub default_geometry: Geometry,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            default_geometry: Geometry::default(),
        }
    }
}

/// Canonical path to the settings file: `~/.config/stravi/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("stravi").join("settings.toml")
}

/// Load settings from the default location.
///
/// A missing file gives the defaults. A file that cannot be read or parsed
/// is reported with a warning and also gives the defaults.
pub fn load_settings() -> Settings {
    let path = settings_path();
    match load_settings_from(&path) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Ignoring settings file {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

/// Load settings from `path`, failing on unreadable or malformed files.
/// A missing file gives the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConvertError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(ConvertError::file(path, e)),
    };
    parse_settings(&contents)
}

pub fn parse_settings(contents: &str) -> Result<Settings, ConvertError> {
    toml::from_str(contents).map_err(|e| ConvertError::settings(e.to_string()))
}

/// Save settings to the default location.
pub fn save_settings(settings: &Settings) -> Result<(), ConvertError> {
    save_settings_to(&settings_path(), settings)
}

/// Write settings to `path` atomically (temp file, then rename).
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConvertError::file(parent, e))?;
    }
    let serialized =
        toml::to_string_pretty(settings).map_err(|e| ConvertError::settings(e.to_string()))?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized).map_err(|e| ConvertError::file(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| ConvertError::file(path, e))?;
    Ok(())
}

/// The effective settings as pretty-printed TOML, for display.
pub fn settings_string(settings: &Settings) -> String {
    toml::to_string_pretty(settings).unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
