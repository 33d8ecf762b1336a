//! Capture settings handed to the backend

mod config;
mod device;
mod media;

pub use config::{
    resolve, AudioConfig, CaptureConfig, ExtraFields, PartialAudioConfig, PartialCaptureConfig,
    PartialVideoConfig, Quality, VideoConfig, DEFAULT_AUDIO_BITRATE, DEFAULT_VIDEO_BITRATE,
};
pub use device::{Device, FlashMode};
pub use media::{ImageRef, MediaRef};
