//! Recording session state and snapshot

use std::fmt;

use serde::Serialize;

use crate::domain::capture::{CaptureConfig, Device};
use crate::domain::recording::Segment;

/// Recording session states
///
/// State machine:
///   IDLE -> RECORDING (record)
///   RECORDING -> PAUSED (pause)
///   PAUSED -> RECORDING (record)
///   RECORDING -> LIMIT_REACHED (budget exhausted, finish)
///   any -> IDLE (reset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    Paused,
    LimitReached,
}

impl RecordingState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::LimitReached => "limit reached",
        }
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a command was accepted without doing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// `record` while a segment is already being recorded
    AlreadyRecording,
    /// `pause` outside of a recording
    NotRecording,
    /// `record` or `finish` after the budget was used up
    LimitReached,
    /// Segment removal while the camera is rolling
    RemovalWhileRecording,
    /// Removal from an empty take
    NoSegments,
    /// `preview` with nothing recorded
    NothingToPreview,
    /// Budget timer completion that arrived after the tracker was stopped
    StaleTimer,
}

impl IgnoreReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyRecording => "already recording",
            Self::NotRecording => "not recording",
            Self::LimitReached => "recording limit reached",
            Self::RemovalWhileRecording => "cannot remove segments while recording",
            Self::NoSegments => "no segments recorded",
            Self::NothingToPreview => "nothing to preview",
            Self::StaleTimer => "stale budget timer",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a session command that did not fail.
///
/// Commands issued in a state where they are documented no-ops are not
/// errors; they come back as `Ignored` so callers can observe them.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T = ()> {
    Applied(T),
    Ignored(IgnoreReason),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    /// The applied value, if any
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Ignored(_) => None,
        }
    }

    /// The ignore reason, if any
    pub fn ignored_reason(&self) -> Option<IgnoreReason> {
        match self {
            Self::Applied(_) => None,
            Self::Ignored(reason) => Some(*reason),
        }
    }
}

/// Point-in-time view of a recording session, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub state: RecordingState,
    pub segments: Vec<Segment>,
    pub elapsed_ms: u64,
    pub max_duration_ms: u64,
    pub device: Device,
    pub config: CaptureConfig,
}

impl Session {
    /// Number of segments in the take
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Check if the budget lock is active
    pub fn limit_reached(&self) -> bool {
        self.state == RecordingState::LimitReached
    }

    /// Unused part of the budget
    pub fn remaining_ms(&self) -> u64 {
        self.max_duration_ms.saturating_sub(self.elapsed_ms)
    }
}
