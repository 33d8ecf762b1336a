//! App wiring shared by the binary: config layering and logging setup

use tracing::{debug, Level};
use tracing_subscriber::fmt;

use crate::application::ports::ConfigStore;
use crate::domain::config::RecorderConfig;
use crate::domain::error::{DurationParseError, InvalidDeviceError};

use super::args::RecordOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Install the stderr log subscriber.
///
/// Library diagnostics stay quiet unless `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: RecorderConfig) -> RecorderConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            Presenter::new().warn(&format!("Ignoring config file: {}", e));
            RecorderConfig::empty()
        }
    };

    // Merge: defaults < file < cli
    RecorderConfig::defaults()
        .merge(file_config)
        .merge(cli_config)
}

/// Errors in user-provided session settings
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error(transparent)]
    Duration(#[from] DurationParseError),

    #[error(transparent)]
    Device(#[from] InvalidDeviceError),

    #[error("Invalid video.timescale '{0}'. Must be a number greater than 0")]
    Timescale(f64),
}

/// Turn a merged config into session options, rejecting invalid values
pub fn build_record_options(config: &RecorderConfig) -> Result<RecordOptions, OptionsError> {
    let max_duration = match config.max_duration {
        Some(ref raw) => raw.parse()?,
        None => Default::default(),
    };
    let device = match config.device {
        Some(ref raw) => raw.parse()?,
        None => Default::default(),
    };

    let capture = config.capture_overrides();
    if let Some(scale) = capture.video.as_ref().and_then(|video| video.timescale) {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(OptionsError::Timescale(scale));
        }
    }

    let options = RecordOptions {
        max_duration,
        device,
        capture,
        output_dir: config.output_dir_or_default(),
    };
    debug!(?options, "session options resolved");
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::{Device, FlashMode, PartialCaptureConfig, PartialVideoConfig};
    use crate::domain::recording::Duration;
    use crate::infrastructure::XdgConfigStore;

    #[tokio::test]
    async fn cli_overrides_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        store
            .save(&RecorderConfig {
                max_duration: Some("10s".to_string()),
                device: Some("back".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let cli = RecorderConfig {
            max_duration: Some("5s".to_string()),
            ..Default::default()
        };
        let merged = load_merged_config(&store, cli).await;

        assert_eq!(merged.max_duration, Some("5s".to_string()));
        assert_eq!(merged.device, Some("back".to_string()));
        assert_eq!(merged.resolved_capture().flash_mode, FlashMode::Off);
    }

    #[tokio::test]
    async fn unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_duration = ").unwrap();
        let store = XdgConfigStore::with_path(path);

        let merged = load_merged_config(&store, RecorderConfig::empty()).await;
        assert_eq!(merged, RecorderConfig::defaults());
    }

    #[test]
    fn build_options_from_defaults() {
        let options = build_record_options(&RecorderConfig::defaults()).unwrap();
        assert_eq!(options.max_duration, Duration::from_secs(3));
        assert_eq!(options.device, Device::Front);
    }

    #[test]
    fn build_options_rejects_bad_values() {
        let bad_duration = RecorderConfig {
            max_duration: Some("forever".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_record_options(&bad_duration),
            Err(OptionsError::Duration(_))
        ));

        let bad_device = RecorderConfig {
            device: Some("side".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_record_options(&bad_device),
            Err(OptionsError::Device(_))
        ));
    }

    #[tokio::test]
    async fn build_options_rejects_bad_timescale_from_file() {
        let dir = tempfile::tempdir().unwrap();
        for raw in ["0.0", "-1.5", "nan"] {
            let path = dir.path().join("config.toml");
            std::fs::write(&path, format!("[capture.video]\ntimescale = {}\n", raw)).unwrap();
            let store = XdgConfigStore::with_path(path);

            let merged = load_merged_config(&store, RecorderConfig::empty()).await;
            assert!(
                matches!(build_record_options(&merged), Err(OptionsError::Timescale(_))),
                "timescale {} accepted",
                raw
            );
        }

        let slowed = RecorderConfig {
            capture: Some(PartialCaptureConfig {
                video: Some(PartialVideoConfig {
                    timescale: Some(0.5),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(build_record_options(&slowed).is_ok());
    }
}
