//! Action selection for the intruder
//!
//! Epsilon-greedy over the Q-table, with one twist: exploration only fires
//! when the randomly drawn candidate has never been tried in this state, so
//! exploration time is spent on unrecorded (state, action) pairs.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{encoding::StateKey, q_learning::q_table::QTable, types::Action};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Where a chosen action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// Random candidate (no best action known, or exploring an untried action)
    Explore,
    /// Best recorded action for the state
    Exploit,
}

/// An action together with how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub source: ActionSource,
}

#[derive(Debug, Clone)]
pub struct Policy {
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl Policy {
    pub fn new() -> Self {
        Self {
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Uniform draw from the action space.
    pub fn random_action(&mut self) -> Action {
        Action::ALL[self.rng.random_range(0..Action::ALL.len())]
    }

    /// Choose the action for `state`.
    ///
    /// A random candidate is drawn first. It is returned when the table knows
    /// no best action for `state`, or when the table has not recorded the
    /// candidate and a uniform draw falls below `exploration_rate`. Otherwise
    /// the best recorded action wins.
    pub fn select_action(
        &mut self,
        table: &QTable,
        state: &StateKey,
        exploration_rate: f64,
    ) -> Decision {
        let candidate = self.random_action();
        match table.best_action(state) {
            Some(best)
                if table.knows_action(state, candidate)
                    || self.rng.random::<f64>() >= exploration_rate =>
            {
                Decision {
                    action: best,
                    source: ActionSource::Exploit,
                }
            }
            _ => Decision {
                action: candidate,
                source: ActionSource::Explore,
            },
        }
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Restart the random stream from the configured seed.
    pub fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}
