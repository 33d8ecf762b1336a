mod state;

pub use state::{IgnoreReason, Outcome, RecordingState, Session};
