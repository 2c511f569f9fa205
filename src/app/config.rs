//! Simulation configuration.

use std::{fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Dimensions, Position},
    world::Outcome,
};

/// Grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
        }
    }
}

/// Reward granted for each move outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    /// Staying on a cell shared with a citizen
    pub collide: f64,
    /// Stepping onto a citizen
    pub move_to_citizen: f64,
    /// Stepping onto an empty cell
    pub move_to_empty: f64,
    /// Not moving, nothing happens
    pub stay: f64,
}

impl RewardTable {
    pub fn reward_for(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Collide => self.collide,
            Outcome::MoveToCitizen => self.move_to_citizen,
            Outcome::MoveToEmpty => self.move_to_empty,
            Outcome::Stay => self.stay,
        }
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            collide: -100.0,
            move_to_citizen: -5.0,
            move_to_empty: -1.0,
            stay: 0.0,
        }
    }
}

/// Learner hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Probability of trying an untried action when a best action is known
    pub exploration_rate: f64,
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Replay rounds run by each tick's `learn` call
    pub learn_iterations: usize,
    /// Number of most recent transitions replayed per round
    pub replay_window: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            exploration_rate: 0.2,
            learning_rate: 0.5,
            discount_factor: 0.9,
            learn_iterations: 10,
            replay_window: 1,
        }
    }
}

/// How the intruder moves during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// Horizontal shifts chosen by the learned policy
    #[default]
    Learned,
    /// Fixed parametric trajectory, no learning
    Baseline,
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MotionMode::Learned => "learned",
            MotionMode::Baseline => "baseline",
        };
        f.write_str(label)
    }
}

impl FromStr for MotionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learned" | "policy" | "q-learning" => Ok(MotionMode::Learned),
            "baseline" | "trajectory" => Ok(MotionMode::Baseline),
            _ => Err(Error::ParseMotionMode {
                input: s.to_string(),
                expected: "learned, baseline".to_string(),
            }),
        }
    }
}

/// Configuration for a simulation run.
///
/// Built once and handed by reference to the world and trainer constructors;
/// nothing mutates it afterwards.
///
/// # Examples
///
/// ```
/// use intruder::app::{MotionMode, SimulationConfig};
///
/// let config = SimulationConfig::default()
///     .with_grid(20, 10)
///     .with_density(0.25)
///     .with_exploration_rate(0.1)
///     .with_motion(MotionMode::Learned)
///     .with_seed(42);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub rewards: RewardTable,
    /// Probability that a cell starts with a citizen
    pub density: f64,
    pub learning: LearningConfig,
    pub motion: MotionMode,
    /// Intruder start cell; defaults to the trajectory position at tick 0
    pub intruder_start: Option<Position>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            rewards: RewardTable::default(),
            density: 0.3,
            learning: LearningConfig::default(),
            motion: MotionMode::default(),
            intruder_start: None,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check every field is in its legal range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        let dimensions = self.dimensions()?;
        if !(0.0..=1.0).contains(&self.density) {
            return invalid(format!("density must be in [0, 1], got {}", self.density));
        }
        let learning = &self.learning;
        if !(0.0..=1.0).contains(&learning.exploration_rate) {
            return invalid(format!(
                "exploration_rate must be in [0, 1], got {}",
                learning.exploration_rate
            ));
        }
        if !(learning.learning_rate > 0.0 && learning.learning_rate <= 1.0) {
            return invalid(format!(
                "learning_rate must be in (0, 1], got {}",
                learning.learning_rate
            ));
        }
        if !(0.0..1.0).contains(&learning.discount_factor) {
            return invalid(format!(
                "discount_factor must be in [0, 1), got {}",
                learning.discount_factor
            ));
        }
        if learning.replay_window == 0 {
            return invalid("replay_window must be at least 1".to_string());
        }
        let rewards = self.rewards;
        if Outcome::ALL
            .iter()
            .any(|&outcome| !rewards.reward_for(outcome).is_finite())
        {
            return invalid("rewards must be finite".to_string());
        }
        if let Some(start) = self.intruder_start
            && !dimensions.contains(start)
        {
            return invalid(format!(
                "intruder_start {start} lies outside the {dimensions} grid"
            ));
        }
        Ok(())
    }

    pub fn dimensions(&self) -> Result<Dimensions> {
        Dimensions::new(self.grid.width, self.grid.height)
    }

    pub fn with_grid(mut self, width: usize, height: usize) -> Self {
        self.grid = GridConfig { width, height };
        self
    }

    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_learning(mut self, learning: LearningConfig) -> Self {
        self.learning = learning;
        self
    }

    pub fn with_exploration_rate(mut self, rate: f64) -> Self {
        self.learning.exploration_rate = rate;
        self
    }

    pub fn with_motion(mut self, motion: MotionMode) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_intruder_start(mut self, start: Position) -> Self {
        self.intruder_start = Some(start);
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.grid.width, 15);
        assert_eq!(config.rewards.collide, -100.0);
        assert_eq!(config.learning.learn_iterations, 10);
        assert_eq!(config.learning.replay_window, 1);
    }

    #[test]
    fn test_reward_lookup() {
        let rewards = RewardTable::default();
        assert_eq!(rewards.reward_for(Outcome::MoveToCitizen), -5.0);
        assert_eq!(rewards.reward_for(Outcome::MoveToEmpty), -1.0);
        assert_eq!(rewards.reward_for(Outcome::Stay), 0.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad = [
            SimulationConfig::default().with_grid(0, 5),
            SimulationConfig::default().with_density(1.5),
            SimulationConfig::default().with_exploration_rate(-0.1),
            SimulationConfig::default().with_intruder_start(Position::new(20, 0)),
            SimulationConfig::default().with_learning(LearningConfig {
                discount_factor: 1.0,
                ..LearningConfig::default()
            }),
            SimulationConfig::default().with_learning(LearningConfig {
                learning_rate: 0.0,
                ..LearningConfig::default()
            }),
            SimulationConfig::default().with_learning(LearningConfig {
                replay_window: 0,
                ..LearningConfig::default()
            }),
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            density = 0.1
            motion = "baseline"

            [grid]
            width = 8

            [rewards]
            move_to_citizen = -20.0

            [learning]
            learn_iterations = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.width, 8);
        assert_eq!(config.grid.height, 15);
        assert_eq!(config.rewards.move_to_citizen, -20.0);
        assert_eq!(config.rewards.collide, -100.0);
        assert_eq!(config.learning.learn_iterations, 3);
        assert_eq!(config.learning.discount_factor, 0.9);
        assert_eq!(config.motion, MotionMode::Baseline);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        assert!(SimulationConfig::from_toml_str("density = 2.0").is_err());
        assert!(SimulationConfig::from_toml_str("density = \"high\"").is_err());
    }

    #[test]
    fn test_motion_mode_parse() {
        assert_eq!("Learned".parse::<MotionMode>().unwrap(), MotionMode::Learned);
        assert_eq!(
            "trajectory".parse::<MotionMode>().unwrap(),
            MotionMode::Baseline
        );
        assert!("teleport".parse::<MotionMode>().is_err());
    }
}
