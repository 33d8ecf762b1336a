//! Application layer - Session coordination and port interfaces
//!
//! Contains the recording session coordinator, the budget tracker and
//! trait definitions for external system interactions.

pub mod coordinator;
pub mod ports;
pub mod tracker;

// Re-export the coordinator API
pub use coordinator::{SessionCoordinator, SessionError, SessionOptions};
pub use tracker::{BudgetElapsed, BudgetReceiver, DurationTracker};
