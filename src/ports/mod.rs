//! Ports (trait boundaries) for external dependencies.
//!
//! The simulation core only talks to the outside world through these traits;
//! progress bars, JSONL export and metrics are adapters in [`crate::pipeline`].

pub mod observer;

pub use observer::Observer;
