// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tool settings and configuration.
//!
//! Settings cover:
//! - Animation pass mode (block or spline)
//! - Splice solver and single-key handling
//! - Interpolation used for newly inserted keys
//! - Keys that start transform gestures

use animease_curves::{Interpolation, SingleKeyPolicy, SolveMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "animease.ron";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the file failed
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid settings RON
    #[error("Invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing settings failed
    #[error("Failed to write settings: {0}")]
    Serialize(#[from] ron::Error),

    /// The file was written by a newer version
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}

/// How a committed transform gesture treats existing keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnimMode {
    /// Blocking pass: gestures leave keys alone
    #[default]
    Block,
    /// Spline pass: a committed gesture splices the current frame
    Spline,
}

impl AnimMode {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            AnimMode::Block => "Block",
            AnimMode::Spline => "Spline",
        }
    }
}

/// Keys that start transform gestures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keymap {
    /// Translate (grab) key
    pub translate: String,
    /// Rotate key
    pub rotate: String,
    /// Scale key
    pub scale: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            translate: "G".to_string(),
            rotate: "R".to_string(),
            scale: "S".to_string(),
        }
    }
}

/// Complete tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Format version
    pub version: u32,
    /// Animation pass mode
    pub anim_mode: AnimMode,
    /// Splice solver
    pub solve_mode: SolveMode,
    /// Splice behaviour on single-key curves
    pub single_key_policy: SingleKeyPolicy,
    /// Interpolation for keys inserted from now on
    pub new_key_interpolation: Interpolation,
    /// Gesture keys
    pub keymap: Keymap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            anim_mode: AnimMode::Block,
            solve_mode: SolveMode::Auto,
            single_key_policy: SingleKeyPolicy::Keep,
            new_key_interpolation: Interpolation::Bezier,
            keymap: Keymap::default(),
        }
    }
}

impl Settings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.anim_mode, AnimMode::Block);
        assert_eq!(settings.solve_mode, SolveMode::Auto);
        assert_eq!(settings.keymap.translate, "G");
    }

    #[test]
    fn test_serialization() {
        let settings = Settings {
            anim_mode: AnimMode::Spline,
            solve_mode: SolveMode::Free,
            ..Settings::default()
        };
        let ron_str =
            ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: Settings = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let loaded: Settings = ron::from_str("(anim_mode: Spline)").unwrap();
        assert_eq!(loaded.anim_mode, AnimMode::Spline);
        assert_eq!(loaded.keymap, Keymap::default());
    }

    #[test]
    fn test_save_and_load() {
        let name = format!("animease-settings-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(name);
        let settings = Settings {
            single_key_policy: SingleKeyPolicy::RemoveAtTime,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_rejects_newer_version() {
        let name = format!("animease-newer-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "(version: 99)").unwrap();
        let result = Settings::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            result,
            Err(SettingsError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("animease-does-not-exist.ron");
        assert_eq!(Settings::load_or_default(&path).unwrap(), Settings::default());
    }
}
