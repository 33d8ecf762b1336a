//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod observer;

// Re-export common types
pub use capture::{CaptureBackend, CaptureError};
pub use config::ConfigStore;
pub use observer::{NoOpObserver, SessionObserver};
