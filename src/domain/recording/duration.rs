//! Duration value object used for the recording budget

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording budget for one take (3 seconds)
pub const DEFAULT_MAX_DURATION_MS: u64 = 3_000;

/// Value object representing a time span with millisecond precision.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default budget for a take
    pub const fn default_max_duration() -> Self {
        Self::from_millis(DEFAULT_MAX_DURATION_MS)
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Get duration in fractional seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.milliseconds as f64 / 1000.0
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Subtract, clamping at zero
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self::from_millis(self.milliseconds.saturating_sub(other.milliseconds))
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse strings like "1500ms", "3s", "1m", "1m30s".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let invalid = || DurationParseError { input: s.to_string() };

        let mut total_ms: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;
        let mut chars = input.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
                continue;
            }
            if current_num.is_empty() {
                return Err(invalid());
            }
            let value: u64 = current_num.parse().map_err(|_| invalid())?;
            let unit_ms = match ch {
                // "m" followed by "s" is milliseconds, a bare "m" is minutes
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    1
                }
                'm' => 60_000,
                's' => 1_000,
                _ => return Err(invalid()),
            };
            total_ms = value
                .checked_mul(unit_ms)
                .and_then(|v| total_ms.checked_add(v))
                .ok_or_else(invalid)?;
            current_num.clear();
            found_any = true;
        }

        if !current_num.is_empty() || !found_any || total_ms == 0 {
            return Err(invalid());
        }

        Ok(Self::from_millis(total_ms))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.milliseconds;
        if ms % 1000 != 0 {
            return write!(f, "{}ms", ms);
        }

        let total_secs = ms / 1000;
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_max_duration()
    }
}
