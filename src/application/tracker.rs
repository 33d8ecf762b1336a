//! Recording budget tracker

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::domain::recording::Duration;

/// Budget timer completion, posted when a started timer runs to the end.
///
/// Carries the generation of the `start` that armed it so completions that
/// arrive after a `stop` can be told apart from live ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetElapsed {
    generation: u64,
}

impl BudgetElapsed {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Receiver side of the budget timer
pub type BudgetReceiver = mpsc::UnboundedReceiver<BudgetElapsed>;

/// Tracks recorded time against the maximum for one take.
///
/// While running, progress advances from the committed `elapsed_ms`
/// towards `max_ms`; `stop` freezes it and `start` resumes from the same
/// point with the remaining budget as the new timer length.
#[derive(Debug)]
pub struct DurationTracker {
    elapsed_ms: u64,
    max_ms: u64,
    running: bool,
    exhausted: bool,
    generation: u64,
    started_at: Option<Instant>,
    timer: Option<JoinHandle<()>>,
    signal_tx: mpsc::UnboundedSender<BudgetElapsed>,
}

impl DurationTracker {
    /// Create a tracker and the receiver its timer posts completions to
    pub fn new(max: Duration) -> (Self, BudgetReceiver) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let tracker = Self {
            elapsed_ms: 0,
            max_ms: max.as_millis(),
            running: false,
            exhausted: false,
            generation: 0,
            started_at: None,
            timer: None,
            signal_tx,
        };
        (tracker, signal_rx)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn max_ms(&self) -> u64 {
        self.max_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the exhaustion event has fired since the last reset
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Committed time left in the budget
    pub fn remaining_ms(&self) -> u64 {
        self.max_ms.saturating_sub(self.elapsed_ms)
    }

    /// Current progress value in `[0, max_ms]`, including the running span
    pub fn progress_ms(&self) -> u64 {
        match (self.running, self.started_at) {
            (true, Some(started_at)) => {
                let running_ms = started_at.elapsed().as_millis() as u64;
                self.elapsed_ms.saturating_add(running_ms).min(self.max_ms)
            }
            _ => self.elapsed_ms,
        }
    }

    /// Start advancing toward the budget.
    ///
    /// # Returns
    /// `false` without doing anything if already running or the budget is
    /// used up
    pub fn start(&mut self) -> bool {
        if self.running || self.elapsed_ms >= self.max_ms {
            return false;
        }

        self.generation += 1;
        let signal = BudgetElapsed {
            generation: self.generation,
        };
        let remaining = Duration::from_millis(self.remaining_ms()).as_std();
        let tx = self.signal_tx.clone();

        self.timer = Some(tokio::spawn(async move {
            sleep(remaining).await;
            let _ = tx.send(signal);
        }));
        self.started_at = Some(Instant::now());
        self.running = true;

        debug!(
            generation = self.generation,
            remaining_ms = self.remaining_ms(),
            "budget timer started"
        );
        true
    }

    /// Halt the timer and commit the recorded span.
    ///
    /// No-op when not running.
    ///
    /// # Returns
    /// `true` if this commit used up the budget; the exhaustion event fires
    /// at most once between resets
    pub fn stop(&mut self, actual_elapsed_delta_ms: u64) -> bool {
        if !self.running {
            return false;
        }

        self.cancel_timer();
        self.running = false;
        self.elapsed_ms = self
            .elapsed_ms
            .saturating_add(actual_elapsed_delta_ms)
            .min(self.max_ms);

        debug!(
            elapsed_ms = self.elapsed_ms,
            delta_ms = actual_elapsed_delta_ms,
            "budget timer stopped"
        );

        if self.elapsed_ms >= self.max_ms {
            return self.mark_exhausted();
        }
        false
    }

    /// Handle a timer completion.
    ///
    /// # Returns
    /// `true` if the completion is live and exhausted the budget; stale
    /// completions (tracker stopped, reset or restarted since) return `false`
    pub fn on_elapsed(&mut self, signal: BudgetElapsed) -> bool {
        if !self.running || signal.generation != self.generation {
            debug!(
                generation = signal.generation,
                current = self.generation,
                "ignoring stale budget timer"
            );
            return false;
        }

        self.timer = None;
        self.started_at = None;
        self.running = false;
        self.elapsed_ms = self.max_ms;
        self.mark_exhausted()
    }

    /// Give budget back after segments were discarded. Ignored while running.
    pub fn rewind(&mut self, delta_ms: u64) {
        if self.running {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_sub(delta_ms);
    }

    /// Snap back to zero and forget any exhaustion
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.running = false;
        self.elapsed_ms = 0;
        self.exhausted = false;
    }

    fn mark_exhausted(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        self.exhausted = true;
        true
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.started_at = None;
        // Invalidate any completion already queued by the old timer
        self.generation += 1;
    }
}

impl Drop for DurationTracker {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, sleep, Duration as TokioDuration};

    fn tracker(max_ms: u64) -> (DurationTracker, BudgetReceiver) {
        DurationTracker::new(Duration::from_millis(max_ms))
    }

    #[tokio::test(start_paused = true)]
    async fn start_then_natural_completion_fires_once() {
        let (mut tracker, mut rx) = tracker(3000);
        assert!(tracker.start());

        let signal = rx.recv().await.unwrap();
        assert!(tracker.on_elapsed(signal));
        assert!(!tracker.is_running());
        assert_eq!(tracker.elapsed_ms(), 3000);
        assert!(tracker.is_exhausted());

        // Replaying the same completion does nothing
        assert!(!tracker.on_elapsed(signal));
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_does_not_double_advance() {
        let (mut tracker, _rx) = tracker(3000);
        assert!(tracker.start());
        assert!(!tracker.start());

        advance(TokioDuration::from_millis(1000)).await;
        assert_eq!(tracker.progress_ms(), 1000);

        tracker.stop(1000);
        assert_eq!(tracker.elapsed_ms(), 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_progress_and_resume_uses_remaining_budget() {
        let (mut tracker, mut rx) = tracker(3000);
        tracker.start();
        sleep(TokioDuration::from_millis(1200)).await;
        assert!(!tracker.stop(1200));
        assert_eq!(tracker.progress_ms(), 1200);

        sleep(TokioDuration::from_millis(500)).await;
        assert_eq!(tracker.progress_ms(), 1200);

        let resumed_at = Instant::now();
        tracker.start();
        let signal = rx.recv().await.unwrap();
        let waited = resumed_at.elapsed().as_millis();
        assert!((1800..=1801).contains(&waited), "waited {}ms", waited);
        assert!(tracker.on_elapsed(signal));
    }

    #[tokio::test(start_paused = true)]
    async fn completion_after_stop_is_stale() {
        let (mut tracker, _rx) = tracker(1000);
        tracker.start();
        let live = BudgetElapsed {
            generation: tracker.generation,
        };
        tracker.stop(400);

        assert!(!tracker.on_elapsed(live));
        assert_eq!(tracker.elapsed_ms(), 400);
        assert!(!tracker.is_exhausted());
    }

    #[tokio::test(start_paused = true)]
    async fn completion_from_previous_run_is_stale_after_restart() {
        let (mut tracker, _rx) = tracker(1000);
        tracker.start();
        let old = BudgetElapsed {
            generation: tracker.generation,
        };
        tracker.stop(100);
        tracker.start();

        assert!(!tracker.on_elapsed(old));
        assert!(tracker.is_running());
    }

    #[tokio::test]
    async fn stop_when_not_running_is_noop() {
        let (mut tracker, _rx) = tracker(1000);
        assert!(!tracker.stop(500));
        assert_eq!(tracker.elapsed_ms(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_that_reaches_budget_exhausts() {
        let (mut tracker, _rx) = tracker(1000);
        tracker.start();
        assert!(tracker.stop(1500));
        assert_eq!(tracker.elapsed_ms(), 1000);
        assert!(!tracker.start());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_everything() {
        let (mut tracker, mut rx) = tracker(1000);
        tracker.start();
        let signal = rx.recv().await.unwrap();
        tracker.on_elapsed(signal);

        tracker.reset();
        assert_eq!(tracker.elapsed_ms(), 0);
        assert_eq!(tracker.progress_ms(), 0);
        assert!(!tracker.is_running());
        assert!(!tracker.is_exhausted());
        assert!(tracker.start());
    }

    #[tokio::test]
    async fn rewind_gives_budget_back() {
        let (mut tracker, _rx) = tracker(1000);
        tracker.start();
        tracker.stop(800);
        tracker.rewind(300);
        assert_eq!(tracker.elapsed_ms(), 500);
        tracker.rewind(5000);
        assert_eq!(tracker.elapsed_ms(), 0);
    }
}
