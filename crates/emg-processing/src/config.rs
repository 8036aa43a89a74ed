//! Configuration for a normalization run

use crate::mvc::DEFAULT_WINDOW_SIZE;
use emg_core::{EmgError, EmgResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything one pipeline run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw EMG log to normalize
    pub main_file: PathBuf,
    /// Calibration log recorded at maximum voluntary contraction
    pub calibration_file: PathBuf,
    /// Samples per MVC averaging window
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Sensor bias added to calibration amplitudes before averaging
    #[serde(default)]
    pub calibration_offset: f64,
    /// Directory for exported plots; `None` logs plot summaries instead
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl PipelineConfig {
    pub fn new(main_file: impl Into<PathBuf>, calibration_file: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            main_file: main_file.into(),
            calibration_file: calibration_file.into(),
            window_size: DEFAULT_WINDOW_SIZE,
            calibration_offset: 0.0,
            output_dir: None,
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_calibration_offset(mut self, offset: f64) -> Self {
        self.calibration_offset = offset;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> EmgResult<Self> {
        serde_json::from_str(text).map_err(|e| EmgError::InvalidParameter {
            name: "config",
            reason: e.to_string(),
        })
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> EmgResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EmgError::io(path, &e))?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> EmgResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EmgError::InvalidParameter {
            name: "config",
            reason: e.to_string(),
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> EmgResult<()> {
        if self.window_size == 0 {
            return Err(emg_core::parameter_error!(
                "window_size",
                "must be at least 1, got {}",
                self.window_size
            ));
        }

        if !self.calibration_offset.is_finite() {
            return Err(EmgError::InvalidParameter {
                name: "calibration_offset",
                reason: format!("must be finite, got {}", self.calibration_offset),
            });
        }

        if self.main_file.as_os_str().is_empty() {
            return Err(EmgError::InvalidParameter {
                name: "main_file",
                reason: "path cannot be empty".to_string(),
            });
        }

        if self.calibration_file.as_os_str().is_empty() {
            return Err(EmgError::InvalidParameter {
                name: "calibration_file",
                reason: "path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let config = PipelineConfig::from_json_str(
            r#"{ "main_file": "emg_data.log", "calibration_file": "mvc_data.log" }"#,
        )
        .unwrap();

        assert_eq!(config, PipelineConfig::new("emg_data.log", "mvc_data.log"));
        assert_eq!(config.window_size, 10);
        assert_eq!(config.calibration_offset, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = PipelineConfig::new("a.log", "b.log")
            .with_window_size(25)
            .with_calibration_offset(300.0)
            .with_output_dir("plots");

        let parsed = PipelineConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation() {
        let zero_window = PipelineConfig::new("a.log", "b.log").with_window_size(0);
        assert!(matches!(
            zero_window.validate(),
            Err(EmgError::InvalidParameter { name: "window_size", .. })
        ));

        let bad_offset = PipelineConfig::new("a.log", "b.log").with_calibration_offset(f64::NAN);
        assert!(bad_offset.validate().is_err());

        assert!(PipelineConfig::new("", "b.log").validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PipelineConfig::from_json_str("{ \"window_size\": 3 }"),
            Err(EmgError::InvalidParameter { name: "config", .. })
        ));
    }
}
