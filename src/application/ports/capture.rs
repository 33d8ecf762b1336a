//! Capture backend port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::{CaptureConfig, Device, ImageRef, MediaRef};
use crate::domain::recording::Segment;

/// Errors reported by a capture backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Capture device not available: {0}")]
    DeviceUnavailable(String),

    #[error("Failed to start recording: {0}")]
    RecordFailed(String),

    #[error("Failed to pause recording: {0}")]
    PauseFailed(String),

    #[error("Failed to save take: {0}")]
    SaveFailed(String),

    #[error("Failed to capture still: {0}")]
    CaptureFailed(String),

    #[error("Backend has no segment at index {0}")]
    SegmentNotFound(usize),
}

/// Port for the engine that does the actual audio/video capture.
///
/// The coordinator owns exactly one backend and drives it; the backend
/// applies `device` and `config` at the next `record` or on `reconfigure`.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start (or resume) recording a new segment.
    async fn record(&self, device: Device, config: &CaptureConfig) -> Result<(), CaptureError>;

    /// Stop the running segment.
    ///
    /// # Returns
    /// The completed segment, or `None` if nothing was captured
    async fn pause(&self) -> Result<Option<Segment>, CaptureError>;

    /// Assemble every segment of the take into one media file.
    async fn save(&self) -> Result<MediaRef, CaptureError>;

    /// Capture a still picture.
    async fn capture(&self) -> Result<ImageRef, CaptureError>;

    /// Drop the newest segment.
    async fn remove_last_segment(&self) -> Result<(), CaptureError>;

    /// Drop every segment.
    async fn remove_all_segments(&self) -> Result<(), CaptureError>;

    /// Drop the segment at `index`.
    async fn remove_segment_at(&self, index: usize) -> Result<(), CaptureError>;

    /// Apply new settings to the live preview without recording.
    async fn reconfigure(&self, _device: Device, _config: &CaptureConfig) -> Result<(), CaptureError> {
        Ok(())
    }

    /// Whether the backend holds captured content not yet handed back as a segment
    fn has_buffered_content(&self) -> bool {
        false
    }
}
