//! Capture backend adapters

mod simulated;

pub use simulated::SimulatedBackend;
