//! One-tick simulation loop
//!
//! The [`Trainer`] owns the world and the Q-table. Each [`Trainer::step`] is
//! self-contained: it reads the current world and table, moves the intruder
//! once, and leaves both in a consistent state before returning.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error, Result,
    app::{MotionMode, SimulationConfig},
    encoding::StateKey,
    q_learning::{Decision, Policy, QTable},
    types::Position,
    world::{GridWorld, Outcome, Trajectory},
};

/// Everything that happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u64,
    pub state: StateKey,
    /// Policy decision; `None` when the baseline trajectory moved the intruder
    pub decision: Option<Decision>,
    pub from: Position,
    pub to: Position,
    pub outcome: Outcome,
    pub reward: f64,
    pub next_state: StateKey,
}

/// Per-outcome counters for score displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    counts: [u64; 4],
    total_reward: f64,
}

impl Scoreboard {
    pub fn record(&mut self, outcome: Outcome, reward: f64) {
        self.counts[outcome.index()] += 1;
        self.total_reward += reward;
    }

    pub fn count(&self, outcome: Outcome) -> u64 {
        self.counts[outcome.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn mean_reward(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.total_reward / total as f64
        }
    }

    /// Fraction of ticks that ended in `outcome`.
    pub fn rate(&self, outcome: Outcome) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(outcome) as f64 / total as f64
        }
    }

    /// `count(numerator) / count(denominator)`, `None` while the denominator is zero.
    pub fn ratio(&self, numerator: Outcome, denominator: Outcome) -> Option<f64> {
        match self.count(denominator) {
            0 => None,
            d => Some(self.count(numerator) as f64 / d as f64),
        }
    }

    /// One-line summary for terminal displays.
    pub fn summary_line(&self) -> String {
        let ratio = self
            .ratio(Outcome::MoveToCitizen, Outcome::MoveToEmpty)
            .map(|r| format!("{:.0}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "collide: {}  citizen: {}  empty: {}  stay: {}  citizen/empty: {}",
            self.count(Outcome::Collide),
            self.count(Outcome::MoveToCitizen),
            self.count(Outcome::MoveToEmpty),
            self.count(Outcome::Stay),
            ratio
        )
    }
}

pub struct Trainer {
    config: SimulationConfig,
    world: GridWorld,
    table: QTable,
    policy: Policy,
    trajectory: Trajectory,
    scoreboard: Scoreboard,
    time: u64,
}

impl Trainer {
    /// Build a trainer with a freshly populated world.
    ///
    /// With a seed, the world is generated from `seed` and the policy draws
    /// from `seed + 1`, so runs are reproducible.
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let (mut world_rng, policy) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                Policy::new().with_seed(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_rng(&mut rand::rng()), Policy::new()),
        };
        let world = GridWorld::populate(config, &mut world_rng)?;
        Self::from_parts(config, world, policy)
    }

    /// Build a trainer around an existing world and policy.
    pub fn from_parts(config: &SimulationConfig, world: GridWorld, policy: Policy) -> Result<Self> {
        config.validate()?;
        let expected = config.dimensions()?;
        if world.dimensions() != expected {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "world is {} but the config asks for {}",
                    world.dimensions(),
                    expected
                ),
            });
        }
        world.intruder_position()?;
        let learning = &config.learning;
        let table = QTable::new(learning.learning_rate, learning.discount_factor)
            .with_replay_window(learning.replay_window);
        Ok(Self {
            config: config.clone(),
            world,
            table,
            policy,
            trajectory: Trajectory::default(),
            scoreboard: Scoreboard::default(),
            time: 0,
        })
    }

    /// Encode the intruder's current neighborhood.
    pub fn observe(&self) -> Result<StateKey> {
        let position = self.world.intruder_position()?;
        Ok(StateKey::from(&self.world.neighborhood(position)))
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) -> Result<TickRecord> {
        let record = match self.config.motion {
            MotionMode::Learned => self.step_learned()?,
            MotionMode::Baseline => self.step_baseline()?,
        };
        self.scoreboard.record(record.outcome, record.reward);
        self.time += 1;
        debug!(
            tick = record.tick,
            state = %record.state,
            to = %record.to,
            outcome = %record.outcome,
            reward = record.reward,
            "tick"
        );
        Ok(record)
    }

    fn step_learned(&mut self) -> Result<TickRecord> {
        let state = self.observe()?;
        let decision = self.policy.select_action(
            &self.table,
            &state,
            self.config.learning.exploration_rate,
        );

        let from = self.world.intruder_position()?;
        let dimensions = self.world.dimensions();
        let target = dimensions.offset(from, decision.action.delta(), 0);
        let to = self.world.move_intruder_to(target.x, target.y)?;

        let outcome = self.resolve(from, to);
        let reward = self.config.rewards.reward_for(outcome);
        let next_state = self.observe()?;

        self.table
            .record_transition(state, next_state, reward, decision.action);
        self.table.learn(self.config.learning.learn_iterations);

        Ok(TickRecord {
            tick: self.time,
            state,
            decision: Some(decision),
            from,
            to,
            outcome,
            reward,
            next_state,
        })
    }

    fn step_baseline(&mut self) -> Result<TickRecord> {
        let state = self.observe()?;
        let from = self.world.intruder_position()?;
        let target = self
            .trajectory
            .position_at(self.world.dimensions(), self.time + 1);
        let to = self.world.move_intruder_to(target.x, target.y)?;

        let outcome = self.resolve(from, to);
        let reward = self.config.rewards.reward_for(outcome);
        let next_state = self.observe()?;

        Ok(TickRecord {
            tick: self.time,
            state,
            decision: None,
            from,
            to,
            outcome,
            reward,
            next_state,
        })
    }

    /// Outcome from the occupant found at `to` after the move.
    fn resolve(&self, from: Position, to: Position) -> Outcome {
        Outcome::classify(from != to, self.world.resolve_collision(to))
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Ticks completed so far.
    pub fn time(&self) -> u64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::{Action, Dimensions},
        world::Occupant,
    };

    fn strip(width: usize, citizens: &[usize], intruder: usize) -> GridWorld {
        let mut world = GridWorld::new(Dimensions::new(width, 1).unwrap());
        for &x in citizens {
            world.place_citizen(Position::new(x, 0)).unwrap();
        }
        world.place_intruder(Position::new(intruder, 0)).unwrap();
        world
    }

    #[test]
    fn test_scoreboard_ratio_and_rates() {
        let mut board = Scoreboard::default();
        assert_eq!(board.ratio(Outcome::MoveToCitizen, Outcome::MoveToEmpty), None);
        board.record(Outcome::MoveToEmpty, -1.0);
        board.record(Outcome::MoveToEmpty, -1.0);
        board.record(Outcome::MoveToCitizen, -5.0);
        assert_eq!(board.total(), 3);
        assert_eq!(
            board.ratio(Outcome::MoveToCitizen, Outcome::MoveToEmpty),
            Some(0.5)
        );
        assert!((board.mean_reward() - (-7.0 / 3.0)).abs() < 1e-12);
        assert!((board.rate(Outcome::MoveToEmpty) - 2.0 / 3.0).abs() < 1e-12);
        assert!(board.summary_line().contains("citizen/empty: 50%"));
    }

    #[test]
    fn test_step_moves_only_horizontally() {
        let config = SimulationConfig::default().with_grid(9, 7).with_seed(5);
        let mut trainer = Trainer::new(&config).unwrap();
        for _ in 0..100 {
            let record = trainer.step().unwrap();
            assert_eq!(record.from.y, record.to.y);
            let action = record.decision.unwrap().action;
            let expected = Dimensions::new(9, 7)
                .unwrap()
                .offset(record.from, action.delta(), 0);
            assert_eq!(record.to, expected);
        }
        assert_eq!(trainer.time(), 100);
        assert_eq!(trainer.scoreboard().total(), 100);
    }

    #[test]
    fn test_reward_follows_resolved_occupant() {
        let config = SimulationConfig::default().with_grid(3, 1).with_seed(11);
        let world = strip(3, &[1], 0);
        let mut trainer = Trainer::from_parts(&config, world, Policy::new().with_seed(11)).unwrap();
        for _ in 0..60 {
            let record = trainer.step().unwrap();
            let occupant = trainer.world().resolve_collision(record.to);
            let expected = match (record.from != record.to, occupant) {
                (true, Occupant::Citizen) => config.rewards.move_to_citizen,
                (true, _) => config.rewards.move_to_empty,
                (false, Occupant::Citizen) => config.rewards.collide,
                (false, _) => config.rewards.stay,
            };
            assert_eq!(record.reward, expected);
        }
    }

    #[test]
    fn test_wraps_at_edge() {
        let config = SimulationConfig::default()
            .with_grid(3, 1)
            .with_exploration_rate(0.0)
            .with_seed(1);
        let world = strip(3, &[], 0);
        let mut trainer = Trainer::from_parts(&config, world, Policy::new().with_seed(1)).unwrap();
        for _ in 0..30 {
            let record = trainer.step().unwrap();
            if record.decision.map(|d| d.action) == Some(Action::Left) && record.from.x == 0 {
                assert_eq!(record.to.x, 2);
            }
        }
    }

    #[test]
    fn test_baseline_follows_trajectory_without_learning() {
        let config = SimulationConfig::default()
            .with_grid(10, 10)
            .with_motion(MotionMode::Baseline)
            .with_seed(3);
        let mut trainer = Trainer::new(&config).unwrap();
        let dims = trainer.world().dimensions();
        for t in 0..40 {
            let record = trainer.step().unwrap();
            assert!(record.decision.is_none());
            assert_eq!(record.to, Trajectory::default().position_at(dims, t + 1));
        }
        assert_eq!(trainer.table().size(), 0);
    }

    #[test]
    fn test_missing_intruder_rejected() {
        let world = GridWorld::new(Dimensions::new(3, 3).unwrap());
        let config = SimulationConfig::default().with_grid(3, 3);
        let result = Trainer::from_parts(&config, world, Policy::new());
        assert!(matches!(result, Err(crate::Error::MissingIntruder)));
    }

    #[test]
    fn test_world_size_must_match_config() {
        let config = SimulationConfig::default().with_grid(4, 1);
        let result = Trainer::from_parts(&config, strip(3, &[1], 0), Policy::new());
        assert!(matches!(
            result,
            Err(crate::Error::InvalidConfiguration { .. })
        ));

        let config = config.with_grid(3, 1);
        assert!(Trainer::from_parts(&config, strip(3, &[1], 0), Policy::new()).is_ok());
    }
}
