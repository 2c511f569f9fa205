//! Training pipeline for the intruder

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Error, Result,
    app::MotionMode,
    ports::Observer,
    trainer::{Scoreboard, Trainer},
    world::Outcome,
};

/// Training configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of ticks to run
    pub ticks: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { ticks: 10_000 }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub motion: MotionMode,

    /// Ticks completed in this run
    pub total_ticks: u64,

    pub collisions: u64,
    pub citizen_moves: u64,
    pub empty_moves: u64,
    pub stays: u64,

    pub collision_rate: f64,
    pub citizen_move_rate: f64,
    pub empty_move_rate: f64,
    pub stay_rate: f64,

    /// Citizen moves per empty move; `None` when no empty move happened
    pub citizen_to_empty_ratio: Option<f64>,

    pub total_reward: f64,
    pub mean_reward: f64,

    /// Recorded (state, action) entries at the end of the run
    pub table_entries: usize,
    /// Distinct states with at least one entry
    pub states_visited: usize,
}

impl TrainingResult {
    /// Build a result from a scoreboard and the trainer that produced it
    pub fn new(motion: MotionMode, scoreboard: &Scoreboard, trainer: &Trainer) -> Self {
        Self {
            motion,
            total_ticks: scoreboard.total(),
            collisions: scoreboard.count(Outcome::Collide),
            citizen_moves: scoreboard.count(Outcome::MoveToCitizen),
            empty_moves: scoreboard.count(Outcome::MoveToEmpty),
            stays: scoreboard.count(Outcome::Stay),
            collision_rate: scoreboard.rate(Outcome::Collide),
            citizen_move_rate: scoreboard.rate(Outcome::MoveToCitizen),
            empty_move_rate: scoreboard.rate(Outcome::MoveToEmpty),
            stay_rate: scoreboard.rate(Outcome::Stay),
            citizen_to_empty_ratio: scoreboard.ratio(Outcome::MoveToCitizen, Outcome::MoveToEmpty),
            total_reward: scoreboard.total_reward(),
            mean_reward: scoreboard.mean_reward(),
            table_entries: trainer.table().size(),
            states_visited: trainer.table().state_count(),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs a trainer for a fixed number of ticks and notifies observers
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run `config.ticks` ticks on `trainer`.
    ///
    /// Only this run's ticks are counted in the result, so a trainer can be
    /// driven through several pipelines in sequence.
    pub fn run(&mut self, trainer: &mut Trainer) -> Result<TrainingResult> {
        let motion = trainer.config().motion;
        info!(ticks = self.config.ticks, %motion, "run started");

        for observer in &mut self.observers {
            observer.on_run_start(self.config.ticks)?;
        }

        let mut scoreboard = Scoreboard::default();
        for _ in 0..self.config.ticks {
            let record = trainer.step()?;
            scoreboard.record(record.outcome, record.reward);
            for observer in &mut self.observers {
                observer.on_tick(&record)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_run_end(&scoreboard)?;
        }

        let result = TrainingResult::new(motion, &scoreboard, trainer);
        info!(
            ticks = result.total_ticks,
            mean_reward = result.mean_reward,
            citizen_moves = result.citizen_moves,
            empty_moves = result.empty_moves,
            table_entries = result.table_entries,
            "run finished"
        );
        Ok(result)
    }
}
