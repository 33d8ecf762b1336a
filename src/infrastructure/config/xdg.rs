//! XDG config store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::RecorderConfig;
use crate::domain::error::ConfigError;

/// XDG-compliant config store
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Create a new XDG config store with default path
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("segment-recorder");

        Self {
            path: config_dir.join("config.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse TOML content into RecorderConfig
    fn parse_toml(content: &str) -> Result<RecorderConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize RecorderConfig to TOML
    fn to_toml(config: &RecorderConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<RecorderConfig, ConfigError> {
        if !self.exists() {
            return Ok(RecorderConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        debug!(path = %self.path.display(), "loaded config file");
        Self::parse_toml(&content)
    }

    async fn save(&self, config: &RecorderConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(config)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&RecorderConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::{FlashMode, Quality};

    #[test]
    fn default_path_is_xdg() {
        let store = XdgConfigStore::new();
        let path = store.path();
        assert!(path.to_string_lossy().contains("segment-recorder"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn parse_nested_capture_section() {
        let content = r#"
max_duration = "10s"
device = "back"

[capture]
flash_mode = "light"
mirror_preview = true

[capture.video]
bitrate = 500000
quality = "MediumQuality"
timescale = 2
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.max_duration, Some("10s".to_string()));
        assert_eq!(config.device, Some("back".to_string()));

        let capture = config.resolved_capture();
        assert_eq!(capture.flash_mode, FlashMode::Light);
        assert_eq!(capture.video.bitrate, 500_000);
        assert_eq!(capture.video.quality, Quality::Medium);
        assert_eq!(capture.video.timescale, 2.0);
        assert_eq!(capture.audio.bitrate, 128_000);
        assert_eq!(
            capture.extra.get("mirror_preview"),
            Some(&serde_json::Value::Bool(true))
        );
    }

    #[test]
    fn parse_rejects_malformed_toml() {
        let err = XdgConfigStore::parse_toml("max_duration = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested").join("config.toml"));

        store.init().await.unwrap();
        assert!(store.exists());
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.max_duration, Some("3s".to_string()));
        assert_eq!(loaded.resolved_capture(), RecorderConfig::defaults().resolved_capture());

        assert!(matches!(store.init().await, Err(ConfigError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        assert_eq!(store.load().await.unwrap(), RecorderConfig::empty());
    }
}
