//! Subcommand implementations

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;

use crate::{
    app::{MotionMode, SimulationConfig},
    types::Position,
};

pub mod compare;
pub mod train;
pub mod watch;

/// Simulation settings shared by every subcommand.
///
/// Values come from the defaults, then `--config`, then individual flags.
#[derive(Args, Debug, Clone, Default)]
pub struct SimulationArgs {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    pub width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    pub height: Option<usize>,

    /// Probability that a cell starts with a citizen
    #[arg(long)]
    pub density: Option<f64>,

    /// Exploration rate for untried actions
    #[arg(long, short = 'e')]
    pub exploration: Option<f64>,

    /// Learning rate α
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub discount: Option<f64>,

    /// Replay rounds per tick
    #[arg(long)]
    pub learn_iterations: Option<usize>,

    /// Most recent transitions replayed per round
    #[arg(long)]
    pub replay_window: Option<usize>,

    /// Reward for staying on a cell shared with a citizen
    #[arg(long)]
    pub reward_collide: Option<f64>,

    /// Reward for stepping onto a citizen
    #[arg(long)]
    pub reward_citizen: Option<f64>,

    /// Reward for stepping onto an empty cell
    #[arg(long)]
    pub reward_empty: Option<f64>,

    /// Reward for not moving
    #[arg(long)]
    pub reward_stay: Option<f64>,

    /// Intruder motion (`learned` or `baseline`)
    #[arg(long)]
    pub motion: Option<MotionMode>,

    /// Intruder start cell as `x,y`
    #[arg(long, value_parser = parse_position)]
    pub start: Option<Position>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SimulationArgs {
    /// Merge file and flag values into a validated config.
    pub fn resolve(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(density) = self.density {
            config.density = density;
        }
        if let Some(rate) = self.exploration {
            config.learning.exploration_rate = rate;
        }
        if let Some(rate) = self.learning_rate {
            config.learning.learning_rate = rate;
        }
        if let Some(discount) = self.discount {
            config.learning.discount_factor = discount;
        }
        if let Some(iterations) = self.learn_iterations {
            config.learning.learn_iterations = iterations;
        }
        if let Some(window) = self.replay_window {
            config.learning.replay_window = window;
        }
        if let Some(reward) = self.reward_collide {
            config.rewards.collide = reward;
        }
        if let Some(reward) = self.reward_citizen {
            config.rewards.move_to_citizen = reward;
        }
        if let Some(reward) = self.reward_empty {
            config.rewards.move_to_empty = reward;
        }
        if let Some(reward) = self.reward_stay {
            config.rewards.stay = reward;
        }
        if let Some(motion) = self.motion {
            config.motion = motion;
        }
        if let Some(start) = self.start {
            config.intruder_start = Some(start);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_position(value: &str) -> Result<Position> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected `x,y`, got '{value}'"))?;
    Ok(Position::new(
        x.trim().parse().context("invalid x coordinate")?,
        y.trim().parse().context("invalid y coordinate")?,
    ))
}
