//! Recorder configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::capture::{resolve, CaptureConfig, Device, PartialCaptureConfig};
use crate::domain::recording::Duration;

/// Recorder configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<PartialCaptureConfig>,
}

impl RecorderConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            max_duration: Some(Duration::default_max_duration().to_string()),
            device: Some(Device::default().to_string()),
            output_dir: None,
            capture: Some(CaptureConfig::default().as_partial()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            max_duration: other.max_duration.or(self.max_duration),
            device: other.device.or(self.device),
            output_dir: other.output_dir.or(self.output_dir),
            capture: match (self.capture, other.capture) {
                (None, None) => None,
                (Some(b), None) => Some(b),
                (None, Some(o)) => Some(o),
                (Some(b), Some(o)) => Some(b.merge(o)),
            },
        }
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    /// Get device as parsed Device, or front if not set/invalid
    pub fn device_or_default(&self) -> Device {
        self.device
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Directory where takes and stills are written
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("segment-recorder"))
    }

    /// User capture overrides (empty when unset)
    pub fn capture_overrides(&self) -> PartialCaptureConfig {
        self.capture.clone().unwrap_or_default()
    }

    /// Capture config resolved over the defaults
    pub fn resolved_capture(&self) -> CaptureConfig {
        resolve(&self.capture_overrides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::{FlashMode, PartialVideoConfig};

    #[test]
    fn defaults_have_expected_values() {
        let config = RecorderConfig::defaults();
        assert_eq!(config.max_duration, Some("3s".to_string()));
        assert_eq!(config.device, Some("front".to_string()));
        assert!(config.output_dir.is_none());
        assert_eq!(config.resolved_capture(), CaptureConfig::default());
    }

    #[test]
    fn empty_has_all_none() {
        let config = RecorderConfig::empty();
        assert!(config.max_duration.is_none());
        assert!(config.device.is_none());
        assert!(config.capture.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = RecorderConfig {
            max_duration: Some("10s".to_string()),
            device: Some("back".to_string()),
            ..Default::default()
        };
        let other = RecorderConfig {
            max_duration: Some("5s".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.max_duration, Some("5s".to_string()));
        assert_eq!(merged.device, Some("back".to_string()));
    }

    #[test]
    fn merge_capture_sections_deeply() {
        let base = RecorderConfig::defaults();
        let other = RecorderConfig {
            capture: Some(PartialCaptureConfig {
                video: Some(PartialVideoConfig {
                    bitrate: Some(500_000),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let capture = base.merge(other).resolved_capture();
        assert_eq!(capture.video.bitrate, 500_000);
        assert_eq!(capture.video.format, "MPEG4");
        assert_eq!(capture.flash_mode, FlashMode::Off);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = RecorderConfig {
            max_duration: Some("soon".to_string()),
            device: Some("sideways".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_millis(), 3000);
        assert_eq!(config.device_or_default(), Device::Front);
    }

    #[test]
    fn output_dir_defaults_under_temp() {
        let config = RecorderConfig::empty();
        assert!(config
            .output_dir_or_default()
            .to_string_lossy()
            .contains("segment-recorder"));
    }
}
