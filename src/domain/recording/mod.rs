//! Recording value objects: budget durations, segments and the take ledger

mod duration;
mod ledger;
mod segment;

pub use duration::{Duration, DEFAULT_MAX_DURATION_MS};
pub use ledger::SegmentLedger;
pub use segment::Segment;
