//! Q-learning intruder on a toroidal grid of citizens
//!
//! This crate provides:
//! - A wrapping grid world with stationary citizens and one intruder
//! - Ternary encoding of the intruder's 3x3 neighborhood
//! - A tabular Q-learner with batch replay and an exploration policy
//! - A tick-driven trainer, observer pipeline and CLI

pub mod app;
pub mod cli;
pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod trainer;
pub mod types;
pub mod world;

pub use app::SimulationConfig;
pub use encoding::StateKey;
pub use error::{Error, Result};
pub use q_learning::{Policy, QTable};
pub use trainer::{Scoreboard, TickRecord, Trainer};
pub use types::{Action, Dimensions, Position};
pub use world::{GridWorld, Outcome};
