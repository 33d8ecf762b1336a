//! Presentation port: render callbacks for session changes

use crate::domain::capture::MediaRef;
use crate::domain::session::Session;

/// Port for the layer that displays the session.
///
/// Callbacks run inside the coordinator's transition and must not block.
pub trait SessionObserver: Send + Sync {
    /// Any applied transition, with the resulting snapshot
    fn on_state_changed(&self, session: &Session);

    /// The visible segment counter changed
    fn on_segment_count_changed(&self, count: usize);

    /// The recording budget ran out
    fn on_budget_exhausted(&self);

    /// The take was assembled and can be played back
    fn on_preview_ready(&self, media: &MediaRef);
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl SessionObserver for NoOpObserver {
    fn on_state_changed(&self, _session: &Session) {}

    fn on_segment_count_changed(&self, _count: usize) {}

    fn on_budget_exhausted(&self) {}

    fn on_preview_ready(&self, _media: &MediaRef) {}
}

impl<T: SessionObserver + ?Sized> SessionObserver for std::sync::Arc<T> {
    fn on_state_changed(&self, session: &Session) {
        self.as_ref().on_state_changed(session)
    }

    fn on_segment_count_changed(&self, count: usize) {
        self.as_ref().on_segment_count_changed(count)
    }

    fn on_budget_exhausted(&self) {
        self.as_ref().on_budget_exhausted()
    }

    fn on_preview_ready(&self, media: &MediaRef) {
        self.as_ref().on_preview_ready(media)
    }
}
