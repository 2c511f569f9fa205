//! Run pipelines
//!
//! This module provides:
//! - Headless training runs with composable observers
//! - Wall-clock pacing for interactive runs
//! - Learned vs baseline comparison

pub mod comparison;
pub mod observers;
pub mod scheduler;
pub mod training;

pub use comparison::{MotionComparison, compare_motion};
// Re-export observer implementations (adapters)
pub use observers::{JsonlObserver, MetricsObserver, ProgressObserver, RewardPoint, RunMetrics};
pub use scheduler::{Cadence, TickScheduler};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
