//! User settings, persisted as JSON in the OS config directory.
//!
//! Every field carries `#[serde(default)]`, so a partial file is valid and
//! missing keys fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::{EngineSettings, StackLayout, StatusThresholds};
use crate::error::Result;
use crate::model::timeline::DEFAULT_MAX_AGE;
use crate::model::TimelineAxis;

const APP_NAME: &str = "MilestoneTimeline";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub max_age_months: u32,
    pub pixels_per_month: f32,
    /// Month labels shown every N months when collapsed.
    pub label_every_months: u32,
    pub stacking: StackLayout,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            max_age_months: DEFAULT_MAX_AGE,
            pixels_per_month: 14.0,
            label_every_months: 6,
            stacking: StackLayout::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    pub min_write_interval_ms: u64,
    /// Overrides the session file location in the data directory.
    pub session_file: Option<PathBuf>,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            min_write_interval_ms: 1000,
            session_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub status: StatusThresholds,
    pub timeline: TimelineSettings,
    pub persistence: PersistenceSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from the config directory, writing the defaults on first
    /// run so users have a file to edit.
    pub fn load_or_init() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = settings.save(&path) {
                tracing::warn!(path = %path.display(), error = %e, "could not write default settings");
            }
            return settings;
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn engine(&self) -> EngineSettings {
        EngineSettings {
            thresholds: self.status,
            layout: self.timeline.stacking,
            max_age: self.timeline.max_age_months,
            min_write_interval: Duration::from_millis(self.persistence.min_write_interval_ms),
        }
    }

    pub fn axis(&self) -> TimelineAxis {
        TimelineAxis::new(
            self.timeline.max_age_months,
            self.timeline.pixels_per_month,
            self.timeline.label_every_months,
        )
    }
}

pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "status": { "typical_max": 1, "monitor_max": 3 } }"#).unwrap();
        assert_eq!(settings.status, StatusThresholds::STRICT);
        assert_eq!(settings.timeline, TimelineSettings::default());
        assert_eq!(settings.persistence.min_write_interval_ms, 1000);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn engine_settings_follow_file() {
        let mut settings = Settings::default();
        settings.persistence.min_write_interval_ms = 250;
        settings.timeline.max_age_months = 48;
        let engine = settings.engine();
        assert_eq!(engine.min_write_interval, Duration::from_millis(250));
        assert_eq!(engine.max_age, 48);
        assert_eq!(settings.axis().max_age, 48);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let mut settings = Settings::default();
        settings.logging.level = "debug".into();
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
