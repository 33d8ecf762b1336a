//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the
//! software capture backend and the XDG config store.

pub mod capture;
pub mod config;

// Re-export adapters
pub use capture::SimulatedBackend;
pub use config::XdgConfigStore;
