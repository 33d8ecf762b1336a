//! Capture configuration and the resolver that merges user input over defaults

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FlashMode;

/// Default video bitrate (2 Mbit/s)
pub const DEFAULT_VIDEO_BITRATE: u32 = 2_000_000;

/// Default audio bitrate (128 kbit/s)
pub const DEFAULT_AUDIO_BITRATE: u32 = 128_000;

/// Fields a backend understands that this crate does not model.
/// Carried through resolution untouched.
pub type ExtraFields = BTreeMap<String, Value>;

/// Encoder quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    #[serde(rename = "HighestQuality")]
    Highest,
    #[serde(rename = "MediumQuality")]
    Medium,
    #[serde(rename = "LowQuality")]
    Low,
}

/// Resolved video encoding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub enabled: bool,
    pub format: String,
    pub bitrate: u32,
    pub quality: Quality,
    /// Above 1 gives slow motion, between 0 and 1 a timelapse
    pub timescale: f64,
    /// Backend-specific filter descriptions, applied in order
    pub filters: Vec<Value>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: "MPEG4".to_string(),
            bitrate: DEFAULT_VIDEO_BITRATE,
            quality: Quality::Highest,
            timescale: 1.0,
            filters: Vec::new(),
            extra: ExtraFields::new(),
        }
    }
}

/// Resolved audio encoding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    pub format: String,
    pub bitrate: u32,
    pub channels: u16,
    pub quality: Quality,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: "MPEG4AAC".to_string(),
            bitrate: DEFAULT_AUDIO_BITRATE,
            channels: 1,
            quality: Quality::Highest,
            extra: ExtraFields::new(),
        }
    }
}

/// Fully resolved capture configuration.
///
/// Immutable once built: a change of user options produces a new value via
/// [`resolve`]. `Default` is the documented default document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub flash_mode: FlashMode,
    pub auto_set_orientation: bool,
    pub video: VideoConfig,
    pub audio: AudioConfig,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl CaptureConfig {
    /// Express every resolved field as a user override
    pub fn as_partial(&self) -> PartialCaptureConfig {
        PartialCaptureConfig {
            flash_mode: Some(self.flash_mode),
            auto_set_orientation: Some(self.auto_set_orientation),
            video: Some(PartialVideoConfig {
                enabled: Some(self.video.enabled),
                format: Some(self.video.format.clone()),
                bitrate: Some(self.video.bitrate),
                quality: Some(self.video.quality),
                timescale: Some(self.video.timescale),
                filters: Some(self.video.filters.clone()),
                extra: self.video.extra.clone(),
            }),
            audio: Some(PartialAudioConfig {
                enabled: Some(self.audio.enabled),
                format: Some(self.audio.format.clone()),
                bitrate: Some(self.audio.bitrate),
                channels: Some(self.audio.channels),
                quality: Some(self.audio.quality),
                extra: self.audio.extra.clone(),
            }),
            extra: self.extra.clone(),
        }
    }
}

/// User-supplied video overrides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialVideoConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timescale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl PartialVideoConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            enabled: other.enabled.or(self.enabled),
            format: other.format.or(self.format),
            bitrate: other.bitrate.or(self.bitrate),
            quality: other.quality.or(self.quality),
            timescale: other.timescale.or(self.timescale),
            filters: other.filters.or(self.filters),
            extra: merge_extra(self.extra, other.extra),
        }
    }

    fn apply_to(self, base: VideoConfig) -> VideoConfig {
        VideoConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            format: self.format.unwrap_or(base.format),
            bitrate: self.bitrate.unwrap_or(base.bitrate),
            quality: self.quality.unwrap_or(base.quality),
            timescale: self.timescale.unwrap_or(base.timescale),
            filters: self.filters.unwrap_or(base.filters),
            extra: merge_extra(base.extra, self.extra),
        }
    }
}

/// User-supplied audio overrides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialAudioConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl PartialAudioConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            enabled: other.enabled.or(self.enabled),
            format: other.format.or(self.format),
            bitrate: other.bitrate.or(self.bitrate),
            channels: other.channels.or(self.channels),
            quality: other.quality.or(self.quality),
            extra: merge_extra(self.extra, other.extra),
        }
    }

    fn apply_to(self, base: AudioConfig) -> AudioConfig {
        AudioConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            format: self.format.unwrap_or(base.format),
            bitrate: self.bitrate.unwrap_or(base.bitrate),
            channels: self.channels.unwrap_or(base.channels),
            quality: self.quality.unwrap_or(base.quality),
            extra: merge_extra(base.extra, self.extra),
        }
    }
}

/// User-supplied capture overrides.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialCaptureConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash_mode: Option<FlashMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_set_orientation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<PartialVideoConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<PartialAudioConfig>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl PartialCaptureConfig {
    /// Merge this config with another, where other takes precedence.
    /// Only values present in other override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            flash_mode: other.flash_mode.or(self.flash_mode),
            auto_set_orientation: other.auto_set_orientation.or(self.auto_set_orientation),
            video: merge_section(self.video, other.video, PartialVideoConfig::merge),
            audio: merge_section(self.audio, other.audio, PartialAudioConfig::merge),
            extra: merge_extra(self.extra, other.extra),
        }
    }

    /// Copy with a different flash mode
    pub fn with_flash_mode(mut self, mode: FlashMode) -> Self {
        self.flash_mode = Some(mode);
        self
    }
}

/// Deep-merge user overrides over the default capture document.
///
/// Pure: the same input always gives the same output, and resolving the
/// partial form of a resolved config gives that config back.
pub fn resolve(user: &PartialCaptureConfig) -> CaptureConfig {
    let user = user.clone();
    let base = CaptureConfig::default();

    CaptureConfig {
        flash_mode: user.flash_mode.unwrap_or(base.flash_mode),
        auto_set_orientation: user
            .auto_set_orientation
            .unwrap_or(base.auto_set_orientation),
        video: user.video.unwrap_or_default().apply_to(base.video),
        audio: user.audio.unwrap_or_default().apply_to(base.audio),
        extra: merge_extra(base.extra, user.extra),
    }
}

fn merge_section<T>(base: Option<T>, other: Option<T>, merge: fn(T, T) -> T) -> Option<T> {
    match (base, other) {
        (None, None) => None,
        (Some(b), None) => Some(b),
        (None, Some(o)) => Some(o),
        (Some(b), Some(o)) => Some(merge(b, o)),
    }
}

fn merge_extra(mut base: ExtraFields, other: ExtraFields) -> ExtraFields {
    base.extend(other);
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_input_resolves_to_defaults() {
        let config = resolve(&PartialCaptureConfig::default());
        assert_eq!(config.flash_mode, FlashMode::Off);
        assert!(!config.auto_set_orientation);
        assert!(config.video.enabled);
        assert_eq!(config.video.bitrate, 2_000_000);
        assert_eq!(config.video.timescale, 1.0);
        assert_eq!(config.video.format, "MPEG4");
        assert_eq!(config.video.quality, Quality::Highest);
        assert!(config.video.filters.is_empty());
        assert!(config.audio.enabled);
        assert_eq!(config.audio.bitrate, 128_000);
        assert_eq!(config.audio.channels, 1);
        assert_eq!(config.audio.format, "MPEG4AAC");
        assert_eq!(config.audio.quality, Quality::Highest);
    }

    #[test]
    fn single_nested_override_leaves_everything_else() {
        let user = PartialCaptureConfig {
            video: Some(PartialVideoConfig {
                bitrate: Some(500_000),
                ..Default::default()
            }),
            ..Default::default()
        };

        let resolved = resolve(&user);
        let mut expected = CaptureConfig::default();
        expected.video.bitrate = 500_000;
        assert_eq!(resolved, expected);
    }

    #[test]
    fn resolve_is_idempotent() {
        let user = PartialCaptureConfig {
            flash_mode: Some(FlashMode::Auto),
            audio: Some(PartialAudioConfig {
                channels: Some(2),
                ..Default::default()
            }),
            extra: ExtraFields::from([("mirror".to_string(), json!(true))]),
            ..Default::default()
        };

        let once = resolve(&user);
        let twice = resolve(&once.as_partial());
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let user: PartialCaptureConfig = serde_json::from_value(json!({
            "keep_screen_on": true,
            "video": { "bitrate": 1000, "stabilization": "cinematic" }
        }))
        .unwrap();

        let resolved = resolve(&user);
        assert_eq!(resolved.extra.get("keep_screen_on"), Some(&json!(true)));
        assert_eq!(
            resolved.video.extra.get("stabilization"),
            Some(&json!("cinematic"))
        );
        assert_eq!(resolved.video.bitrate, 1000);
    }

    #[test]
    fn filters_are_replaced_not_appended() {
        let user = PartialCaptureConfig {
            video: Some(PartialVideoConfig {
                filters: Some(vec![json!({"CIfilter": "CIColorControls", "inputSaturation": 0})]),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(resolve(&user).video.filters.len(), 1);
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = PartialCaptureConfig {
            flash_mode: Some(FlashMode::On),
            video: Some(PartialVideoConfig {
                bitrate: Some(1_000),
                format: Some("MOV".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let other = PartialCaptureConfig {
            video: Some(PartialVideoConfig {
                bitrate: Some(2_000),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.flash_mode, Some(FlashMode::On));
        let video = merged.video.unwrap();
        assert_eq!(video.bitrate, Some(2_000));
        assert_eq!(video.format, Some("MOV".to_string()));
    }

    #[test]
    fn quality_uses_native_names() {
        assert_eq!(
            serde_json::to_value(Quality::Medium).unwrap(),
            json!("MediumQuality")
        );
    }
}
