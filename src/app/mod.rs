//! Application layer: run configuration.
//!
//! A [`SimulationConfig`] is assembled once (defaults, a TOML file, CLI
//! overrides) and then passed by reference into the world and trainer
//! constructors. There is no process-wide mutable configuration.
//!
//! ```
//! use intruder::{app::SimulationConfig, trainer::Trainer};
//!
//! let config = SimulationConfig::default().with_grid(6, 6).with_seed(42);
//! let mut trainer = Trainer::new(&config)?;
//! trainer.step()?;
//! # Ok::<(), intruder::Error>(())
//! ```

pub mod config;

pub use config::{GridConfig, LearningConfig, MotionMode, RewardTable, SimulationConfig};
