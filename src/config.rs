//! Editor configuration
//!
//! Default parameters for the one-click edits and generators. Values can be
//! overridden from a JSON file; missing keys keep their defaults.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SfxError};

/// Tunable defaults for an editor session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Fade in / fade out length in ms
    pub fade_ms: u64,
    /// Echo delay in ms
    pub echo_delay_ms: u64,
    /// Reverberance for the reverb button (0-100)
    pub reverberance: u32,
    /// Semitones per pitch up / pitch down step
    pub pitch_step: u32,
    /// Lowest accepted volume change in dB
    pub volume_min_db: f64,
    /// Highest accepted volume change in dB
    pub volume_max_db: f64,
    /// Volume (0-100 %) used by the sound generators
    pub synth_volume: f64,
    /// Maximum undo snapshots to keep; `None` keeps everything
    pub history_depth: Option<usize>,
    /// Columns in the waveform overview
    pub waveform_columns: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fade_ms: 2000,
            echo_delay_ms: 500,
            reverberance: 70,
            pitch_step: 1,
            volume_min_db: -30.0,
            volume_max_db: 30.0,
            synth_volume: 50.0,
            history_depth: None,
            waveform_columns: 80,
        }
    }
}

impl EditorConfig {
    /// Load a config file, filling unspecified keys with defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SfxError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        config.validate()?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check that all values are usable
    pub fn validate(&self) -> Result<()> {
        if self.reverberance > 100 {
            return Err(SfxError::invalid_param(
                "reverberance",
                self.reverberance,
                "0 to 100",
            ));
        }
        if !(self.volume_min_db <= 0.0 && self.volume_max_db >= 0.0) {
            return Err(SfxError::invalid_param(
                "volume_min_db..volume_max_db",
                format!("{}..{}", self.volume_min_db, self.volume_max_db),
                "a range containing 0 dB",
            ));
        }
        if !(0.0..=100.0).contains(&self.synth_volume) {
            return Err(SfxError::invalid_param(
                "synth_volume",
                self.synth_volume,
                "0 to 100",
            ));
        }
        if self.waveform_columns == 0 {
            return Err(SfxError::invalid_param(
                "waveform_columns",
                self.waveform_columns,
                "at least 1",
            ));
        }
        if self.history_depth == Some(0) {
            return Err(SfxError::invalid_param(
                "history_depth",
                0,
                "at least 1, or null for unlimited",
            ));
        }
        Ok(())
    }

    /// Check a volume change against the configured range
    pub fn check_volume(&self, gain_db: f64) -> Result<()> {
        if !(self.volume_min_db..=self.volume_max_db).contains(&gain_db) {
            return Err(SfxError::invalid_param(
                "volume_db",
                gain_db,
                format!("{} to {} dB", self.volume_min_db, self.volume_max_db),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.fade_ms, 2000);
        assert_eq!(config.echo_delay_ms, 500);
        assert_eq!(config.reverberance, 70);
        assert_eq!(config.pitch_step, 1);
        assert_eq!(config.volume_min_db, -30.0);
        assert_eq!(config.volume_max_db, 30.0);
        assert_eq!(config.history_depth, None);
        assert_eq!(config.waveform_columns, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "echo_delay_ms": 250, "history_depth": 10 }"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.echo_delay_ms, 250);
        assert_eq!(config.history_depth, Some(10));
        assert_eq!(config.fade_ms, 2000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = EditorConfig {
            reverberance: 40,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            EditorConfig::load(&missing),
            Err(SfxError::FileNotFound { .. })
        ));

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(
            EditorConfig::load(&garbage),
            Err(SfxError::Config(_))
        ));

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, r#"{ "reverberance": 500 }"#).unwrap();
        assert!(matches!(
            EditorConfig::load(&invalid),
            Err(SfxError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_check_volume() {
        let config = EditorConfig::default();
        assert!(config.check_volume(-30.0).is_ok());
        assert!(config.check_volume(12.5).is_ok());
        assert!(config.check_volume(30.5).is_err());
        assert!(config.check_volume(f64::NAN).is_err());
    }
}
