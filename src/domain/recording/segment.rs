//! Recorded segment value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// One contiguous clip recorded between `record` and the next pause.
/// Created by the capture backend and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    duration_ms: f64,
    uri: String,
}

impl Segment {
    /// Create a segment from a backend-reported duration and handle
    pub fn new(duration_ms: f64, uri: impl Into<String>) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            uri: uri.into(),
        }
    }

    /// Duration reported by the backend
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Duration rounded to whole milliseconds, as committed to the budget
    pub fn whole_millis(&self) -> u64 {
        self.duration_ms.round() as u64
    }

    /// Opaque backend handle
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}ms ({})", self.duration_ms, self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_durations_clamp_to_zero() {
        let seg = Segment::new(-4.0, "file:///tmp/a.mp4");
        assert_eq!(seg.duration_ms(), 0.0);
    }

    #[test]
    fn whole_millis_rounds() {
        assert_eq!(Segment::new(1199.6, "a").whole_millis(), 1200);
        assert_eq!(Segment::new(1200.4, "a").whole_millis(), 1200);
    }
}
