//! Application settings that persist across sessions.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::layout::LabelFormat;
use crate::{Error, Result};

/// Time zone dates are displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneChoice {
    /// The machine's local zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl TimeZoneChoice {
    /// Formats an instant in this zone.
    ///
    /// The pattern must already be validated (see [`Settings::validate`]).
    #[must_use]
    pub fn format(self, instant: DateTime<Utc>, pattern: &str) -> String {
        match self {
            Self::Local => instant.with_timezone(&Local).format(pattern).to_string(),
            Self::Utc => instant.format(pattern).to_string(),
        }
    }
}

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of date labels drawn under the axis (at least 2).
    pub label_count: usize,
    /// Characters of mail body shown in tooltips.
    pub preview_chars: usize,
    /// `strftime` pattern for axis labels.
    pub label_date_format: String,
    /// Zone used for axis labels.
    pub time_zone: TimeZoneChoice,
    /// Width of the terminal timeline track, in columns. Unset means fit
    /// the terminal.
    pub track_width: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label_count: 5,
            preview_chars: 200,
            label_date_format: "%Y-%m-%d".to_string(),
            time_zone: TimeZoneChoice::Local,
            track_width: None,
        }
    }
}

impl Settings {
    /// Smallest usable track width.
    pub const MIN_TRACK_WIDTH: usize = 10;

    /// `<config dir>/timeledger/settings.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("timeledger")
            .join("settings.json")
    }

    /// Loads settings from `path`, or from [`Settings::default_path`].
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::unreadable(&path, e))?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;

        info!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Saves settings as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, contents).await?;

        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Checks value ranges and the date pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.label_count < 2 {
            return Err(Error::Config(format!(
                "label_count must be at least 2, got {}",
                self.label_count
            )));
        }
        if let Some(width) = self.track_width.filter(|&w| w < Self::MIN_TRACK_WIDTH) {
            return Err(Error::Config(format!(
                "track_width must be at least {}, got {width}",
                Self::MIN_TRACK_WIDTH,
            )));
        }
        if self.label_date_format.is_empty()
            || StrftimeItems::new(&self.label_date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(Error::Config(format!(
                "invalid label_date_format {:?}",
                self.label_date_format
            )));
        }
        Ok(())
    }

    /// The label format described by these settings.
    #[must_use]
    pub fn label_format(&self) -> LabelFormat {
        LabelFormat {
            pattern: self.label_date_format.clone(),
            zone: self.time_zone,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.label_count, 5);
        assert_eq!(settings.preview_chars, 200);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            label_count: 1,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));

        let settings = Settings {
            label_date_format: "%Q".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            track_width: Some(3),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_utc_format() {
        let instant = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(TimeZoneChoice::Utc.format(instant, "%d/%m/%Y"), "01/06/2023");
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("nope.json")))
            .await
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_save_then_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            time_zone: TimeZoneChoice::Utc,
            track_width: Some(40),
            ..Settings::default()
        };
        settings.save(Some(&path)).await.unwrap();
        assert_eq!(Settings::load(Some(&path)).await.unwrap(), settings);

        // Missing fields fall back to defaults
        std::fs::write(&path, r#"{"label_count": 3}"#).unwrap();
        let loaded = Settings::load(Some(&path)).await.unwrap();
        assert_eq!(loaded.label_count, 3);
        assert_eq!(loaded.track_width, None);
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"label_count": 1}"#).unwrap();
        assert!(Settings::load(Some(&path)).await.is_err());
    }
}
