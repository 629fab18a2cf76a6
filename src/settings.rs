//! Render settings and preferences
//!
//! Persisted separately from scene files as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::TRAIL_COLOR;
use crate::renderer::vertex::colors;

/// Render settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Trails on at startup (overrides the scene file)
    pub draw_trails: Option<bool>,
    /// Overlay the animated flare on every body
    pub show_flares: bool,
    /// Trail line colour, RGBA 0-1
    pub trail_color: [f32; 4],
    /// Clear colour, RGBA 0-1
    pub background: [f32; 4],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            draw_trails: None,
            show_flares: true,
            trail_color: TRAIL_COLOR,
            background: colors::BACKGROUND,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write settings {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene_colors() {
        let settings = Settings::default();
        assert!(settings.show_flares);
        assert_eq!(settings.draw_trails, None);
        assert_eq!(settings.trail_color, [100.0 / 255.0, 100.0 / 255.0, 1.0, 1.0]);
        assert_eq!(settings.background, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "show_flares": false }"#).unwrap();
        assert!(!settings.show_flares);
        assert_eq!(settings.trail_color, TRAIL_COLOR);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("gc-orbits-settings-{}.json", std::process::id()));
        let settings = Settings {
            draw_trails: Some(true),
            show_flares: false,
            trail_color: [1.0, 0.0, 0.0, 1.0],
            background: [0.0, 0.0, 0.25, 1.0],
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Settings::load("/nonexistent/gc-orbits/settings.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read settings"));
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let settings = Settings::load_or_default(None::<&str>).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
