//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::RecorderConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage.
    ///
    /// # Returns
    /// The loaded config (all fields None if the file doesn't exist)
    async fn load(&self) -> Result<RecorderConfig, ConfigError>;

    /// Save configuration to storage.
    async fn save(&self, config: &RecorderConfig) -> Result<(), ConfigError>;

    /// Get the configuration file path.
    fn path(&self) -> PathBuf;

    /// Check if configuration file exists.
    fn exists(&self) -> bool;

    /// Write the default document. Fails if the file already exists.
    async fn init(&self) -> Result<(), ConfigError>;
}
