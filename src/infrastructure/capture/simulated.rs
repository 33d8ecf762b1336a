//! Software capture backend
//!
//! Stands in for a native camera engine: segment durations come from the
//! tokio clock between `record` and `pause`, and `save` writes a JSON
//! manifest describing the take instead of muxing video.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs;
use tokio::time::Instant;
use tracing::debug;

use crate::application::ports::{CaptureBackend, CaptureError};
use crate::domain::capture::{CaptureConfig, Device, ImageRef, MediaRef};
use crate::domain::recording::Segment;

#[derive(Debug, Default)]
struct EngineState {
    recording_since: Option<Instant>,
    segments: Vec<Segment>,
    device: Device,
    config: CaptureConfig,
    next_segment: u64,
    next_still: u64,
    next_take: u64,
}

/// Manifest written by `save`
#[derive(Debug, Serialize)]
struct TakeManifest<'a> {
    take: u64,
    device: Device,
    total_duration_ms: f64,
    segments: &'a [Segment],
    config: &'a CaptureConfig,
}

/// Descriptor written by `capture`
#[derive(Debug, Serialize)]
struct StillDescriptor<'a> {
    still: u64,
    device: Device,
    flash_mode: &'a str,
}

/// Capture backend that records timing only
pub struct SimulatedBackend {
    output_dir: PathBuf,
    state: Mutex<EngineState>,
}

impl SimulatedBackend {
    /// Create a backend writing takes and stills under `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Directory takes are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of segments the engine currently holds
    pub fn segment_count(&self) -> usize {
        self.lock().segments.len()
    }

    /// Device the engine is currently set to
    pub fn device(&self) -> Device {
        self.lock().device
    }

    /// Check if a segment is being recorded
    pub fn is_recording(&self) -> bool {
        self.lock().recording_since.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn file_uri(path: &Path) -> String {
        format!("file://{}", path.display())
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), String> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| e.to_string())?;
        let body = serde_json::to_vec_pretty(value).map_err(|e| e.to_string())?;
        fs::write(path, body).await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CaptureBackend for SimulatedBackend {
    async fn record(&self, device: Device, config: &CaptureConfig) -> Result<(), CaptureError> {
        let mut state = self.lock();
        if !config.video.enabled && !config.audio.enabled {
            return Err(CaptureError::RecordFailed(
                "both video and audio are disabled".to_string(),
            ));
        }
        state.device = device;
        state.config = config.clone();
        if state.recording_since.is_none() {
            state.recording_since = Some(Instant::now());
        }
        debug!(%device, "simulated capture started");
        Ok(())
    }

    async fn pause(&self) -> Result<Option<Segment>, CaptureError> {
        let mut state = self.lock();
        let Some(started) = state.recording_since.take() else {
            return Ok(None);
        };

        let elapsed = started.elapsed();
        if elapsed.is_zero() {
            return Ok(None);
        }

        // Timescale stretches or compresses the recorded span
        let duration_ms = elapsed.as_secs_f64() * 1000.0 * state.config.video.timescale;
        let index = state.next_segment;
        state.next_segment += 1;
        let path = self.output_dir.join(format!("segment-{}.mp4", index));
        let segment = Segment::new(duration_ms, Self::file_uri(&path));
        state.segments.push(segment.clone());
        debug!(%segment, "simulated segment completed");
        Ok(Some(segment))
    }

    async fn save(&self) -> Result<MediaRef, CaptureError> {
        let (take, device, segments, config) = {
            let mut state = self.lock();
            if state.segments.is_empty() {
                return Err(CaptureError::SaveFailed("take has no segments".to_string()));
            }
            let take = state.next_take;
            state.next_take += 1;
            (take, state.device, state.segments.clone(), state.config.clone())
        };

        let manifest = TakeManifest {
            take,
            device,
            total_duration_ms: segments.iter().map(Segment::duration_ms).sum(),
            segments: &segments,
            config: &config,
        };
        let path = self.output_dir.join(format!("take-{}.json", take));
        self.write_json(&path, &manifest)
            .await
            .map_err(CaptureError::SaveFailed)?;

        Ok(MediaRef::new(Self::file_uri(&path)))
    }

    async fn capture(&self) -> Result<ImageRef, CaptureError> {
        let (still, device, flash_mode) = {
            let mut state = self.lock();
            let still = state.next_still;
            state.next_still += 1;
            (still, state.device, state.config.flash_mode)
        };

        let descriptor = StillDescriptor {
            still,
            device,
            flash_mode: flash_mode.as_str(),
        };
        let path = self.output_dir.join(format!("still-{}.json", still));
        self.write_json(&path, &descriptor)
            .await
            .map_err(CaptureError::CaptureFailed)?;

        Ok(ImageRef::new(Self::file_uri(&path)))
    }

    async fn remove_last_segment(&self) -> Result<(), CaptureError> {
        self.lock().segments.pop();
        Ok(())
    }

    async fn remove_all_segments(&self) -> Result<(), CaptureError> {
        self.lock().segments.clear();
        Ok(())
    }

    async fn remove_segment_at(&self, index: usize) -> Result<(), CaptureError> {
        let mut state = self.lock();
        if index >= state.segments.len() {
            return Err(CaptureError::SegmentNotFound(index));
        }
        state.segments.remove(index);
        Ok(())
    }

    async fn reconfigure(&self, device: Device, config: &CaptureConfig) -> Result<(), CaptureError> {
        let mut state = self.lock();
        state.device = device;
        state.config = config.clone();
        Ok(())
    }

    fn has_buffered_content(&self) -> bool {
        self.is_recording()
    }
}
