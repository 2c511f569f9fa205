//! Learned policy vs baseline trajectory
//!
//! Both disciplines run on the same seeded world so their score lines are
//! directly comparable.

use serde::{Deserialize, Serialize};

use super::training::{TrainingConfig, TrainingPipeline, TrainingResult};
use crate::{
    Result,
    app::{MotionMode, SimulationConfig},
    trainer::Trainer,
};

/// Side-by-side results of one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionComparison {
    /// Seed shared by both runs
    pub seed: u64,
    pub ticks: u64,
    pub learned: TrainingResult,
    pub baseline: TrainingResult,
}

impl MotionComparison {
    /// Difference in mean reward, learned minus baseline.
    pub fn reward_advantage(&self) -> f64 {
        self.learned.mean_reward - self.baseline.mean_reward
    }
}

/// Run `ticks` ticks under each motion discipline on the same world.
///
/// An unseeded config gets a fresh random seed so both runs still start from
/// identical boards.
pub fn compare_motion(config: &SimulationConfig, ticks: u64) -> Result<MotionComparison> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let base = config.clone().with_seed(seed);

    let run = |motion: MotionMode| -> Result<TrainingResult> {
        let mut trainer = Trainer::new(&base.clone().with_motion(motion))?;
        TrainingPipeline::new(TrainingConfig { ticks }).run(&mut trainer)
    };
    let learned = run(MotionMode::Learned)?;
    let baseline = run(MotionMode::Baseline)?;

    Ok(MotionComparison {
        seed,
        ticks,
        learned,
        baseline,
    })
}
