//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::capture::{
    Device, FlashMode, PartialAudioConfig, PartialCaptureConfig, PartialVideoConfig,
};
use crate::domain::config::RecorderConfig;
use crate::domain::recording::Duration;

/// Segment Recorder - record a take as a series of clips within a time budget
#[derive(Parser, Debug)]
#[command(name = "segment-recorder")]
#[command(version)]
#[command(about = "Record a take as a series of segments within a recording budget")]
#[command(long_about = None)]
pub struct Cli {
    /// Maximum total recording time for the take (e.g., 3s, 1500ms, 1m30s)
    #[arg(short = 'm', long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Camera to start with
    #[arg(short = 'd', long, value_name = "DEVICE")]
    pub device: Option<DeviceArg>,

    /// Initial flash mode
    #[arg(short = 'f', long, value_name = "MODE")]
    pub flash: Option<FlashArg>,

    /// Video bitrate in bits per second
    #[arg(long, value_name = "BPS")]
    pub video_bitrate: Option<u32>,

    /// Audio bitrate in bits per second
    #[arg(long, value_name = "BPS")]
    pub audio_bitrate: Option<u32>,

    /// Directory where takes and stills are written
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Print debug diagnostics to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Config layer built from the command-line flags
    pub fn to_config(&self) -> RecorderConfig {
        let video = self.video_bitrate.map(|bitrate| PartialVideoConfig {
            bitrate: Some(bitrate),
            ..Default::default()
        });
        let audio = self.audio_bitrate.map(|bitrate| PartialAudioConfig {
            bitrate: Some(bitrate),
            ..Default::default()
        });
        let flash_mode = self.flash.map(FlashMode::from);

        let capture = if video.is_some() || audio.is_some() || flash_mode.is_some() {
            Some(PartialCaptureConfig {
                flash_mode,
                video,
                audio,
                ..Default::default()
            })
        } else {
            None
        };

        RecorderConfig {
            max_duration: self.max_duration.clone(),
            device: self.device.map(|d| Device::from(d).to_string()),
            output_dir: self.output_dir.clone(),
            capture,
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Device argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    Front,
    Back,
}

impl From<DeviceArg> for Device {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Front => Device::Front,
            DeviceArg::Back => Device::Back,
        }
    }
}

/// Flash argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlashArg {
    Off,
    On,
    Auto,
    Light,
}

impl From<FlashArg> for FlashMode {
    fn from(arg: FlashArg) -> Self {
        match arg {
            FlashArg::Off => FlashMode::Off,
            FlashArg::On => FlashMode::On,
            FlashArg::Auto => FlashMode::Auto,
            FlashArg::Light => FlashMode::Light,
        }
    }
}

/// Parsed options for an interactive recording session
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub max_duration: Duration,
    pub device: Device,
    pub capture: PartialCaptureConfig,
    pub output_dir: PathBuf,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "max_duration",
    "device",
    "output_dir",
    "flash_mode",
    "auto_set_orientation",
    "video.enabled",
    "video.format",
    "video.bitrate",
    "video.quality",
    "video.timescale",
    "audio.enabled",
    "audio.format",
    "audio.bitrate",
    "audio.channels",
    "audio.quality",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
