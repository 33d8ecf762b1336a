//! Recording session coordinator
//!
//! Mediates user commands against the budget tracker, the segment ledger
//! and the capture backend. Every method takes `&mut self` and runs to
//! completion, so the event loop driving a coordinator never interleaves
//! two transitions.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::capture::{
    resolve, CaptureConfig, Device, FlashMode, ImageRef, MediaRef, PartialCaptureConfig,
};
use crate::domain::error::SegmentIndexOutOfRange;
use crate::domain::recording::{Duration, Segment, SegmentLedger};
use crate::domain::session::{IgnoreReason, Outcome, RecordingState, Session};

use super::ports::{CaptureBackend, CaptureError, SessionObserver};
use super::tracker::{BudgetElapsed, BudgetReceiver, DurationTracker};

/// Errors from session commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    OutOfRange(#[from] SegmentIndexOutOfRange),

    #[error("Capture backend failed: {0}")]
    Backend(#[from] CaptureError),
}

/// Settings a session starts with
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Budget for the whole take
    pub max_duration: Duration,
    /// Camera used for the first segment
    pub device: Device,
    /// User capture overrides, resolved over the defaults
    pub capture: PartialCaptureConfig,
}

/// Coordinates one take: recording state, budget, segments and backend.
pub struct SessionCoordinator<B, O>
where
    B: CaptureBackend,
    O: SessionObserver,
{
    backend: B,
    observer: O,
    state: RecordingState,
    device: Device,
    overrides: PartialCaptureConfig,
    config: CaptureConfig,
    ledger: SegmentLedger,
    tracker: DurationTracker,
}

impl<B, O> SessionCoordinator<B, O>
where
    B: CaptureBackend,
    O: SessionObserver,
{
    /// Create a coordinator in the idle state.
    ///
    /// The returned receiver yields budget timer completions; the caller's
    /// event loop must hand each one to [`Self::handle_budget_elapsed`].
    pub fn new(backend: B, observer: O, options: SessionOptions) -> (Self, BudgetReceiver) {
        let (tracker, budget_rx) = DurationTracker::new(options.max_duration);
        let config = resolve(&options.capture);
        let coordinator = Self {
            backend,
            observer,
            state: RecordingState::Idle,
            device: options.device,
            overrides: options.capture,
            config,
            ledger: SegmentLedger::new(),
            tracker,
        };
        (coordinator, budget_rx)
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn ledger(&self) -> &SegmentLedger {
        &self.ledger
    }

    pub fn segment_count(&self) -> usize {
        self.ledger.count()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.tracker.elapsed_ms()
    }

    pub fn max_duration_ms(&self) -> u64 {
        self.tracker.max_ms()
    }

    /// Live progress for the budget indicator
    pub fn progress_ms(&self) -> u64 {
        self.tracker.progress_ms()
    }

    pub fn limit_reached(&self) -> bool {
        self.state == RecordingState::LimitReached
    }

    /// Whether the budget timer is running
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_running()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot handed to the presentation layer
    pub fn snapshot(&self) -> Session {
        Session {
            state: self.state,
            segments: self.ledger.to_vec(),
            elapsed_ms: self.tracker.elapsed_ms(),
            max_duration_ms: self.tracker.max_ms(),
            device: self.device,
            config: self.config.clone(),
        }
    }

    /// Start or resume recording.
    pub async fn record(&mut self) -> Result<Outcome, SessionError> {
        match self.state {
            RecordingState::LimitReached => return Ok(Outcome::Ignored(IgnoreReason::LimitReached)),
            RecordingState::Recording => {
                return Ok(Outcome::Ignored(IgnoreReason::AlreadyRecording))
            }
            RecordingState::Idle | RecordingState::Paused => {}
        }
        if self.tracker.remaining_ms() == 0 {
            return Ok(Outcome::Ignored(IgnoreReason::LimitReached));
        }

        if let Err(err) = self.backend.record(self.device, &self.config).await {
            warn!(error = %err, "backend failed to start recording");
            return Err(err.into());
        }

        self.tracker.start();
        self.set_state(RecordingState::Recording);
        Ok(Outcome::Applied(()))
    }

    /// Stop the running segment and add it to the take.
    ///
    /// On backend failure the session keeps recording so the user can retry.
    pub async fn pause(&mut self) -> Result<Outcome, SessionError> {
        if self.state != RecordingState::Recording {
            return Ok(Outcome::Ignored(IgnoreReason::NotRecording));
        }

        let segment = match self.backend.pause().await {
            Ok(segment) => segment,
            Err(err) => {
                warn!(error = %err, "backend failed to pause");
                return Err(err.into());
            }
        };

        self.commit_segment(segment);
        if self.tracker.is_exhausted() {
            // Covers a pause landing exactly on the budget and a retry after
            // the engine failed to stop at exhaustion
            self.set_state(RecordingState::LimitReached);
        } else {
            self.set_state(RecordingState::Paused);
        }
        Ok(Outcome::Applied(()))
    }

    /// Close the take: stop recording, keep the final segment and lock
    /// further recording until [`Self::reset`].
    pub async fn finish(&mut self) -> Result<Outcome, SessionError> {
        if self.state == RecordingState::LimitReached {
            return Ok(Outcome::Ignored(IgnoreReason::LimitReached));
        }
        self.finish_take(false).await
    }

    /// Route a budget timer completion.
    ///
    /// Completions from a timer that was stopped before they were handled
    /// are ignored.
    pub async fn handle_budget_elapsed(
        &mut self,
        signal: BudgetElapsed,
    ) -> Result<Outcome, SessionError> {
        if !self.tracker.on_elapsed(signal) {
            return Ok(Outcome::Ignored(IgnoreReason::StaleTimer));
        }

        info!(max_ms = self.tracker.max_ms(), "recording budget exhausted");
        self.observer.on_budget_exhausted();
        self.finish_take(true).await
    }

    /// Discard the whole take and return to idle.
    ///
    /// A backend still holding a running segment is stopped first. The local
    /// session is always reset; a backend failure is reported afterwards.
    pub async fn reset(&mut self) -> Result<Outcome, SessionError> {
        let mut failure: Option<CaptureError> = None;

        if self.state == RecordingState::Recording || self.backend.has_buffered_content() {
            if let Err(err) = self.backend.pause().await {
                warn!(error = %err, "backend failed to pause during reset");
                failure.get_or_insert(err);
            }
        }

        self.tracker.reset();

        if let Err(err) = self.backend.remove_all_segments().await {
            warn!(error = %err, "backend failed to drop segments during reset");
            failure.get_or_insert(err);
        }

        if !self.ledger.remove_all().is_empty() {
            self.observer.on_segment_count_changed(0);
        }
        self.set_state(RecordingState::Idle);

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(Outcome::Applied(())),
        }
    }

    /// Switch between front and back cameras. Allowed in any state.
    pub async fn set_device(&mut self) -> Result<Device, SessionError> {
        let device = self.device.toggled();
        self.backend.reconfigure(device, &self.config).await?;

        self.device = device;
        info!(%device, "capture device switched");
        self.notify_state();
        Ok(device)
    }

    /// Flip the flash between off and light. Allowed in any state.
    pub async fn toggle_flash(&mut self) -> Result<FlashMode, SessionError> {
        let flash_mode = self.config.flash_mode.toggled();
        let overrides = self.overrides.clone().with_flash_mode(flash_mode);
        self.apply_overrides(overrides).await?;
        Ok(self.config.flash_mode)
    }

    /// Layer new user capture options over the current ones and re-resolve.
    pub async fn update_capture(&mut self, changes: PartialCaptureConfig) -> Result<(), SessionError> {
        let overrides = self.overrides.clone().merge(changes);
        self.apply_overrides(overrides).await
    }

    /// Assemble the take and hand it to playback.
    pub async fn preview(&mut self) -> Result<Outcome<MediaRef>, SessionError> {
        if self.ledger.is_empty() && !self.backend.has_buffered_content() {
            return Ok(Outcome::Ignored(IgnoreReason::NothingToPreview));
        }

        if self.state == RecordingState::Recording {
            self.pause().await?;
        }

        let media = match self.backend.save().await {
            Ok(media) => media,
            Err(err) => {
                warn!(error = %err, "backend failed to save take");
                return Err(err.into());
            }
        };

        info!(%media, segments = self.ledger.count(), "take ready for preview");
        self.observer.on_preview_ready(&media);
        Ok(Outcome::Applied(media))
    }

    /// Take a still picture. Allowed in any state.
    pub async fn capture(&mut self) -> Result<ImageRef, SessionError> {
        match self.backend.capture().await {
            Ok(image) => Ok(image),
            Err(err) => {
                warn!(error = %err, "backend failed to capture still");
                Err(err.into())
            }
        }
    }

    /// Drop the newest segment and give its time back to the budget.
    pub async fn remove_last_segment(&mut self) -> Result<Outcome<Segment>, SessionError> {
        if self.state == RecordingState::Recording {
            return Ok(Outcome::Ignored(IgnoreReason::RemovalWhileRecording));
        }
        if self.ledger.is_empty() {
            return Ok(Outcome::Ignored(IgnoreReason::NoSegments));
        }

        self.backend.remove_last_segment().await?;
        match self.ledger.remove_last() {
            Some(segment) => {
                self.after_removal(segment.whole_millis());
                Ok(Outcome::Applied(segment))
            }
            None => Ok(Outcome::Ignored(IgnoreReason::NoSegments)),
        }
    }

    /// Drop every segment but keep the session state.
    pub async fn remove_all_segments(&mut self) -> Result<Outcome<usize>, SessionError> {
        if self.state == RecordingState::Recording {
            return Ok(Outcome::Ignored(IgnoreReason::RemovalWhileRecording));
        }
        if self.ledger.is_empty() {
            return Ok(Outcome::Ignored(IgnoreReason::NoSegments));
        }

        self.backend.remove_all_segments().await?;
        let removed = self.ledger.remove_all();
        let freed_ms = removed.iter().map(Segment::whole_millis).sum();
        self.after_removal(freed_ms);
        Ok(Outcome::Applied(removed.len()))
    }

    /// Drop the segment at `index`.
    ///
    /// Out-of-range indices fail before the backend is contacted and leave
    /// the take unchanged.
    pub async fn remove_segment_at(&mut self, index: usize) -> Result<Outcome<Segment>, SessionError> {
        if self.state == RecordingState::Recording {
            return Ok(Outcome::Ignored(IgnoreReason::RemovalWhileRecording));
        }
        self.ledger.check_index(index)?;

        self.backend.remove_segment_at(index).await?;
        let segment = self.ledger.remove_at(index)?;
        self.after_removal(segment.whole_millis());
        Ok(Outcome::Applied(segment))
    }

    async fn finish_take(&mut self, budget_spent: bool) -> Result<Outcome, SessionError> {
        if self.state == RecordingState::Recording {
            match self.backend.pause().await {
                Ok(segment) => {
                    self.commit_segment(segment);
                }
                Err(err) if budget_spent => {
                    // Stay in Recording with the budget spent so a pause or
                    // finish can retry stopping the engine
                    warn!(error = %err, "backend failed to pause at budget exhaustion");
                    self.notify_state();
                    return Err(err.into());
                }
                Err(err) => {
                    warn!(error = %err, "backend failed to pause on finish");
                    return Err(err.into());
                }
            }
        }

        self.set_state(RecordingState::LimitReached);
        Ok(Outcome::Applied(()))
    }

    /// Stop the tracker with the confirmed duration and append the segment.
    fn commit_segment(&mut self, segment: Option<Segment>) {
        let delta_ms = segment.as_ref().map_or(0, Segment::whole_millis);
        if self.tracker.stop(delta_ms) {
            info!(max_ms = self.tracker.max_ms(), "recording budget exhausted");
            self.observer.on_budget_exhausted();
        }

        match segment {
            Some(segment) => {
                debug!(%segment, "segment completed");
                self.ledger.append(segment);
                self.observer.on_segment_count_changed(self.ledger.count());
            }
            None => debug!("pause produced no content"),
        }
    }

    async fn apply_overrides(&mut self, overrides: PartialCaptureConfig) -> Result<(), SessionError> {
        let config = resolve(&overrides);
        self.backend.reconfigure(self.device, &config).await?;

        self.overrides = overrides;
        self.config = config;
        debug!(flash = %self.config.flash_mode, "capture config re-resolved");
        self.notify_state();
        Ok(())
    }

    fn after_removal(&mut self, freed_ms: u64) {
        self.tracker.rewind(freed_ms);
        self.observer.on_segment_count_changed(self.ledger.count());
        self.notify_state();
    }

    fn set_state(&mut self, state: RecordingState) {
        if self.state != state {
            info!(from = %self.state, to = %state, "session state changed");
        }
        self.state = state;
        self.notify_state();
    }

    fn notify_state(&self) {
        self.observer.on_state_changed(&self.snapshot());
    }
}
