//! Interactive recording session runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::debug;

use crate::application::{
    BudgetElapsed, BudgetReceiver, SessionCoordinator, SessionError, SessionOptions,
};
use crate::domain::session::{Outcome, RecordingState};
use crate::infrastructure::SimulatedBackend;

use super::app::{EXIT_ERROR, EXIT_SUCCESS};
use super::args::RecordOptions;
use super::commands::{SessionCommand, HELP};
use super::presenter::Presenter;

type Coordinator = SessionCoordinator<SimulatedBackend, Arc<Presenter>>;

/// Budget bar refresh interval while recording
const REFRESH_INTERVAL: StdDuration = StdDuration::from_millis(100);

/// Run the interactive session until `quit`, end of input or Ctrl+C
pub async fn run_session(options: RecordOptions) -> ExitCode {
    let presenter = Arc::new(Presenter::with_budget_bar(options.max_duration.as_millis()));

    let backend = SimulatedBackend::new(options.output_dir.clone());
    let (mut coordinator, mut budget_rx) = SessionCoordinator::new(
        backend,
        Arc::clone(&presenter),
        SessionOptions {
            max_duration: options.max_duration,
            device: options.device,
            capture: options.capture,
        },
    );

    presenter.info(&format!(
        "Session ready: {} budget, {} camera, writing to {}",
        options.max_duration,
        coordinator.device(),
        options.output_dir.display()
    ));
    presenter.info("Type 'help' for commands");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut refresh = interval(REFRESH_INTERVAL);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let exit = loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break EXIT_SUCCESS,
                    Err(e) => {
                        presenter.error(&format!("Failed to read input: {}", e));
                        break EXIT_ERROR;
                    }
                };

                let command = match SessionCommand::parse_line(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        presenter.warn(&e.to_string());
                        continue;
                    }
                };

                match command {
                    SessionCommand::Quit => break EXIT_SUCCESS,
                    SessionCommand::Help => presenter.output(HELP),
                    SessionCommand::Wait(duration) => {
                        wait(&mut coordinator, &mut budget_rx, &presenter, duration.as_std()).await;
                    }
                    command => {
                        if let Err(e) = execute(&mut coordinator, &presenter, command).await {
                            presenter.error(&e.to_string());
                        }
                    }
                }
            }
            Some(signal) = budget_rx.recv() => {
                on_budget_signal(&mut coordinator, &presenter, signal).await;
            }
            _ = refresh.tick() => {
                if coordinator.is_tracking() {
                    presenter.update_budget(coordinator.progress_ms(), coordinator.max_duration_ms());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                presenter.info("Interrupted");
                break EXIT_SUCCESS;
            }
        }
    };

    // Stop the camera before leaving; the segment is kept
    if coordinator.state() == RecordingState::Recording {
        if let Err(e) = coordinator.pause().await {
            presenter.error(&e.to_string());
        }
    }
    presenter.finish_budget();
    debug!(segments = coordinator.segment_count(), "session closed");

    ExitCode::from(exit)
}

async fn on_budget_signal(
    coordinator: &mut Coordinator,
    presenter: &Presenter,
    signal: BudgetElapsed,
) {
    if let Err(e) = coordinator.handle_budget_elapsed(signal).await {
        presenter.error(&e.to_string());
    }
}

/// Let time pass while still honouring the budget timer
async fn wait(
    coordinator: &mut Coordinator,
    budget_rx: &mut BudgetReceiver,
    presenter: &Presenter,
    duration: StdDuration,
) {
    let deadline = Instant::now() + duration;
    loop {
        tokio::select! {
            _ = sleep_until(deadline) => break,
            Some(signal) = budget_rx.recv() => {
                on_budget_signal(coordinator, presenter, signal).await;
            }
        }
    }
}

async fn execute(
    coordinator: &mut Coordinator,
    presenter: &Presenter,
    command: SessionCommand,
) -> Result<(), SessionError> {
    match command {
        SessionCommand::Record => {
            report("record", presenter, coordinator.record().await?);
        }
        SessionCommand::Pause => {
            report("pause", presenter, coordinator.pause().await?);
        }
        SessionCommand::Finish => {
            report("finish", presenter, coordinator.finish().await?);
        }
        SessionCommand::Reset => {
            report("reset", presenter, coordinator.reset().await?);
        }
        SessionCommand::Preview => {
            if let Some(media) = report("preview", presenter, coordinator.preview().await?) {
                presenter.output(media.as_str());
            }
        }
        SessionCommand::Flash => {
            let mode = coordinator.toggle_flash().await?;
            presenter.key_value("flash", mode.as_str());
        }
        SessionCommand::Switch => {
            let device = coordinator.set_device().await?;
            presenter.key_value("device", device.as_str());
        }
        SessionCommand::Capture => {
            let image = coordinator.capture().await?;
            presenter.output(image.as_str());
        }
        SessionCommand::Undo => {
            if let Some(segment) = report("undo", presenter, coordinator.remove_last_segment().await?)
            {
                presenter.success(&format!("Removed segment {}", segment));
            }
        }
        SessionCommand::Remove(index) => {
            let outcome = coordinator.remove_segment_at(index).await?;
            if let Some(segment) = report("remove", presenter, outcome) {
                presenter.success(&format!("Removed segment {}: {}", index, segment));
            }
        }
        SessionCommand::Clear => {
            if let Some(count) = report("clear", presenter, coordinator.remove_all_segments().await?) {
                presenter.success(&format!("Removed {} segments", count));
            }
        }
        SessionCommand::Status => presenter.session_status(&coordinator.snapshot()),
        SessionCommand::Wait(_) | SessionCommand::Help | SessionCommand::Quit => {}
    }
    Ok(())
}

/// Warn about ignored commands, hand back applied values
fn report<T>(name: &str, presenter: &Presenter, outcome: Outcome<T>) -> Option<T> {
    if let Some(reason) = outcome.ignored_reason() {
        presenter.warn(&format!("{} ignored: {}", name, reason));
    }
    outcome.applied()
}
