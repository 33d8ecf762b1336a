//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>ms, <number>s, <number>m, or <number>m<number>s (e.g., 1500ms, 3s, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown capture device name is provided
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid device: \"{input}\". Valid devices are: front, back")]
pub struct InvalidDeviceError {
    pub input: String,
}

/// Error when an unknown flash mode name is provided
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid flash mode: \"{input}\". Valid modes are: off, on, auto, light")]
pub struct InvalidFlashModeError {
    pub input: String,
}

/// Error when a segment index falls outside the ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Segment index {index} is out of range (take has {count} segments)")]
pub struct SegmentIndexOutOfRange {
    pub index: usize,
    pub count: usize,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
