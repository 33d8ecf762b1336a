//! Domain layer - Core recording logic
//!
//! Contains value objects, the segment ledger, session state and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod recording;
pub mod session;

// Re-export common types
pub use capture::{resolve, CaptureConfig, Device, FlashMode, ImageRef, MediaRef, PartialCaptureConfig};
pub use config::RecorderConfig;
pub use error::*;
pub use recording::{Duration, Segment, SegmentLedger};
pub use session::{IgnoreReason, Outcome, RecordingState, Session};
