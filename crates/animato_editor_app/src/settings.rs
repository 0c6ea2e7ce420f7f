// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings, persisted as RON in the user config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of recent files to remember
const MAX_RECENT_FILES: usize = 10;

/// Settings persistence errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON encoding failed
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] ron::Error),

    /// No config directory on this platform
    #[error("No config directory available")]
    NoConfigDir,
}

/// Persisted editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Last window width
    pub window_width: u32,
    /// Last window height
    pub window_height: u32,
    /// Recently opened project files, most recent first
    pub recent_files: Vec<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            window_width: 1600,
            window_height: 900,
            recent_files: Vec::new(),
        }
    }
}

impl EditorSettings {
    /// Settings file location
    pub fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("animato").join("settings.ron"))
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Failed to parse settings, using defaults: {e}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Write settings to disk
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::path().ok_or(SettingsError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Record a recently opened file, most recent first, deduplicated
    pub fn add_recent(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_path_buf());
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ron_round_trip() {
        let mut settings = EditorSettings::default();
        settings.add_recent(Path::new("/tmp/a.anim"));
        let text = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: EditorSettings = ron::from_str(&text).unwrap();
        assert_eq!(loaded.recent_files, settings.recent_files);
        assert_eq!(loaded.window_width, 1600);
    }

    #[test]
    fn test_recent_files_dedupe_and_cap() {
        let mut settings = EditorSettings::default();
        for i in 0..15 {
            settings.add_recent(Path::new(&format!("/tmp/{i}.anim")));
        }
        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);

        settings.add_recent(Path::new("/tmp/14.anim"));
        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(settings.recent_files[0], PathBuf::from("/tmp/14.anim"));
    }
}
