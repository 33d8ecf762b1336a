//! Segment Recorder - segmented video recording session coordinator
//!
//! This crate records a take as a series of segments under a total time
//! budget. Users can pause and resume, switch cameras, toggle the flash,
//! take stills, drop segments and preview the assembled take.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the segment ledger, session state and errors
//! - **Application**: The session coordinator, the budget tracker and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (simulated capture engine, XDG config store)
//! - **CLI**: Command-line interface, argument parsing and the interactive session

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
