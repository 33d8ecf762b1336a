//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::SessionObserver;
use crate::domain::capture::MediaRef;
use crate::domain::session::{RecordingState, Session};

/// Presenter for CLI output formatting.
///
/// Status lines go to stderr, command results to stdout.
pub struct Presenter {
    budget_bar: Option<ProgressBar>,
}

impl Presenter {
    /// Create a presenter without a budget indicator
    pub fn new() -> Self {
        Self { budget_bar: None }
    }

    /// Create a presenter showing a budget bar of `max_ms` length
    pub fn with_budget_bar(max_ms: u64) -> Self {
        let bar = ProgressBar::new(max_ms);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{bar:24.cyan/blue} {msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        Self {
            budget_bar: Some(bar),
        }
    }

    /// Move the budget bar to `progress_ms`
    pub fn update_budget(&self, progress_ms: u64, max_ms: u64) {
        if let Some(ref bar) = self.budget_bar {
            bar.set_position(progress_ms);
            bar.set_message(self.format_progress(progress_ms, max_ms));
        }
    }

    /// Remove the budget bar from the terminal
    pub fn finish_budget(&self) {
        if let Some(ref bar) = self.budget_bar {
            bar.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print_err(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print_err(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.print_err(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print_err(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list and status)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Format budget usage as `used / total (percent)`
    pub fn format_progress(&self, elapsed_ms: u64, total_ms: u64) -> String {
        let percent = if total_ms > 0 {
            (elapsed_ms as f64 / total_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        format!(
            "{} / {} ({:.0}%)",
            format_ms(elapsed_ms),
            format_ms(total_ms),
            percent
        )
    }

    /// Print the full session state to stdout
    pub fn session_status(&self, session: &Session) {
        self.key_value("state", session.state.as_str());
        self.key_value("device", session.device.as_str());
        self.key_value("flash", session.config.flash_mode.as_str());
        self.key_value(
            "budget",
            &self.format_progress(session.elapsed_ms, session.max_duration_ms),
        );
        self.key_value("segments", &session.segment_count().to_string());
        for (index, segment) in session.segments.iter().enumerate() {
            self.output(&format!("  [{}] {}", index, segment));
        }
    }

    // Keeps status lines from tearing through the bar
    fn print_err(&self, line: String) {
        match self.budget_bar {
            Some(ref bar) if !bar.is_hidden() => bar.suspend(|| eprintln!("{}", line)),
            _ => eprintln!("{}", line),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for Presenter {
    fn on_state_changed(&self, session: &Session) {
        let label = match session.state {
            RecordingState::Recording => session.state.as_str().red().to_string(),
            RecordingState::LimitReached => session.state.to_string().yellow().to_string(),
            _ => session.state.as_str().to_string(),
        };
        self.info(&format!(
            "{} ({} segments, {} camera)",
            label,
            session.segment_count(),
            session.device
        ));
        self.update_budget(session.elapsed_ms, session.max_duration_ms);
    }

    fn on_segment_count_changed(&self, count: usize) {
        self.info(&format!("Segments: {}", count));
    }

    fn on_budget_exhausted(&self) {
        self.warn("Recording limit reached");
    }

    fn on_preview_ready(&self, media: &MediaRef) {
        self.success(&format!("Preview ready: {}", media));
    }
}

// Milliseconds below one second, tenths of a second above
fn format_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}
