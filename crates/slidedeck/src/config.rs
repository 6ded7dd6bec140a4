use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::transition::{Axis, Easing, Timing};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidedeck";

const THEMES: &[&str] = &["dark", "light"];

pub const VALID_KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.windowed",
    "defaults.transition_duration",
    "defaults.transition_easing",
    "defaults.transition_axis",
    "defaults.chrome_height",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,

    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_easing: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_axis: Option<String>,

    /// Height in points of the band kept free under the slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_height: Option<f32>,
}

/// Effective viewer settings: config values with built-in defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: Option<String>,
    pub windowed: bool,
    pub timing: Timing,
    pub axis: Axis,
    pub chrome_height: f32,
}

pub const DEFAULT_CHROME_HEIGHT: f32 = 35.0;

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: None,
            windowed: false,
            timing: Timing::default(),
            axis: Axis::default(),
            chrome_height: DEFAULT_CHROME_HEIGHT,
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `slidedeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Missing or unreadable config falls back to defaults; a broken file is
    /// logged rather than fatal.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents =
            format!("# slidedeck configuration - https://github.com/mklab-se/slidedeck\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.theme" => {
                if !THEMES.contains(&value) {
                    anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'.");
                }
                defaults.theme = Some(value.to_string());
            }
            "defaults.windowed" => {
                let windowed = value.parse::<bool>().map_err(|_| {
                    anyhow::anyhow!("Invalid windowed: {value}. Must be 'true' or 'false'.")
                })?;
                defaults.windowed = Some(windowed);
            }
            "defaults.transition_duration" => {
                let duration = value
                    .parse::<f64>()
                    .ok()
                    .filter(|d| d.is_finite() && *d >= 0.0)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid transition_duration: {value}. Must be a number of seconds >= 0."
                        )
                    })?;
                defaults.transition_duration = Some(duration);
            }
            "defaults.transition_easing" => {
                if Easing::from_name(value).is_none() {
                    anyhow::bail!(
                        "Invalid transition_easing: {value}. Must be one of: {}.",
                        Easing::NAMES.join(", ")
                    );
                }
                defaults.transition_easing = Some(value.to_string());
            }
            "defaults.transition_axis" => {
                if Axis::from_name(value).is_none() {
                    anyhow::bail!(
                        "Invalid transition_axis: {value}. Must be 'horizontal' or 'vertical'."
                    );
                }
                defaults.transition_axis = Some(value.to_string());
            }
            "defaults.chrome_height" => {
                let height = value
                    .parse::<f32>()
                    .ok()
                    .filter(|h| h.is_finite() && *h >= 0.0)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid chrome_height: {value}. Must be a number of points >= 0."
                        )
                    })?;
                defaults.chrome_height = Some(height);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Resolve into viewer settings. Values that no longer parse (for
    /// example a hand-edited easing name) are skipped with a warning.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        let Some(defaults) = &self.defaults else {
            return settings;
        };

        if let Some(name) = &defaults.theme {
            if THEMES.contains(&name.as_str()) {
                settings.theme = Some(name.clone());
            } else {
                tracing::warn!(theme = %name, "ignoring unknown theme");
            }
        }
        if let Some(windowed) = defaults.windowed {
            settings.windowed = windowed;
        }
        if let Some(duration) = defaults.transition_duration {
            if duration.is_finite() && duration >= 0.0 {
                settings.timing.duration = duration;
            } else {
                tracing::warn!(duration, "ignoring invalid transition_duration");
            }
        }
        if let Some(name) = &defaults.transition_easing {
            match Easing::from_name(name) {
                Some(easing) => settings.timing.easing = easing,
                None => tracing::warn!(easing = %name, "ignoring unknown transition_easing"),
            }
        }
        if let Some(name) = &defaults.transition_axis {
            match Axis::from_name(name) {
                Some(axis) => settings.axis = axis,
                None => tracing::warn!(axis = %name, "ignoring unknown transition_axis"),
            }
        }
        if let Some(height) = defaults.chrome_height {
            if height.is_finite() && height >= 0.0 {
                settings.chrome_height = height;
            } else {
                tracing::warn!(height, "ignoring invalid chrome_height");
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Config::default().settings();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.chrome_height, 35.0);
        assert_eq!(settings.timing.duration, 0.3);
        assert_eq!(settings.timing.easing, Easing::OutQuad);
        assert_eq!(settings.axis, Axis::Horizontal);
        assert!(!settings.windowed);
    }

    #[test]
    fn test_set_and_resolve() {
        let mut config = Config::default();
        config.set("defaults.theme", "light").unwrap();
        config.set("defaults.windowed", "true").unwrap();
        config.set("defaults.transition_duration", "0.5").unwrap();
        config.set("defaults.transition_easing", "linear").unwrap();
        config.set("defaults.transition_axis", "vertical").unwrap();
        config.set("defaults.chrome_height", "0").unwrap();

        let settings = config.settings();
        assert_eq!(settings.theme.as_deref(), Some("light"));
        assert!(settings.windowed);
        assert_eq!(settings.timing.duration, 0.5);
        assert_eq!(settings.timing.easing, Easing::Linear);
        assert_eq!(settings.axis, Axis::Vertical);
        assert_eq!(settings.chrome_height, 0.0);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.windowed", "maybe").is_err());
        assert!(config.set("defaults.transition_duration", "-1").is_err());
        assert!(config.set("defaults.transition_duration", "fast").is_err());
        assert!(config.set("defaults.transition_easing", "bounce").is_err());
        assert!(config.set("defaults.transition_axis", "diagonal").is_err());
        assert!(config.set("defaults.chrome_height", "NaN").is_err());
        let err = config.set("defaults.colour", "red").unwrap_err();
        assert!(err.to_string().contains("defaults.chrome_height"));
    }

    #[test]
    fn test_hand_edited_values_fall_back() {
        let config: Config = serde_yaml::from_str(
            "defaults:\n  theme: solarized\n  transition_easing: bounce\n  transition_duration: -2\n  chrome_height: 12\n",
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(settings.theme, None);
        assert_eq!(settings.timing, Timing::default());
        assert_eq!(settings.chrome_height, 12.0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);

        let mut config = Config::default();
        config.set("defaults.transition_axis", "vertical").unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# slidedeck configuration"));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
