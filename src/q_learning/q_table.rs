//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use tracing::trace;

use super::replay::{Transition, TransitionBuffer};
use crate::{encoding::StateKey, types::Action};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Entries are created lazily by updates. A missing entry means "never
/// learned", which is kept distinct from a learned value of zero.
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values: (state_key, action) -> Q-value
    q_values: HashMap<(StateKey, Action), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Transitions staged for the next `learn` call
    transitions: TransitionBuffer,
}

impl QTable {
    /// Create a new Q-table that replays only the latest transition
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            transitions: TransitionBuffer::default(),
        }
    }

    /// Replay the last `window` transitions on every `learn` round
    pub fn with_replay_window(mut self, window: usize) -> Self {
        self.transitions = TransitionBuffer::new(window);
        self
    }

    /// Get Q-value for a state-action pair, `None` if never learned
    pub fn get(&self, state: &StateKey, action: Action) -> Option<f64> {
        self.q_values.get(&(*state, action)).copied()
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.q_values.insert((state, action), value);
    }

    pub fn knows_action(&self, state: &StateKey, action: Action) -> bool {
        self.q_values.contains_key(&(*state, action))
    }

    /// Recorded actions and their values for a state, in `Action::ALL` order
    pub fn action_values(&self, state: &StateKey) -> Vec<(Action, f64)> {
        Action::ALL
            .iter()
            .filter_map(|&action| self.get(state, action).map(|q| (action, q)))
            .collect()
    }

    /// Best recorded action for a state
    ///
    /// Returns `None` when nothing has been recorded for `state`; callers
    /// should explore instead of assuming a default. Ties go to the action
    /// that comes first in `Action::ALL`.
    pub fn best_action(&self, state: &StateKey) -> Option<Action> {
        self.action_values(state)
            .into_iter()
            .fold(None, |best: Option<(Action, f64)>, (action, q)| match best {
                Some((_, best_q)) if best_q >= q => best,
                _ => Some((action, q)),
            })
            .map(|(action, _)| action)
    }

    /// Maximum recorded Q-value in a state
    pub fn max_q(&self, state: &StateKey) -> Option<f64> {
        self.action_values(state)
            .into_iter()
            .map(|(_, q)| q)
            .reduce(f64::max)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Unknown values on either side read as zero.
    pub fn q_learning_update(&mut self, transition: &Transition) -> f64 {
        let current_q = self
            .get(&transition.state, transition.action)
            .unwrap_or(0.0);
        let max_next_q = self.max_q(&transition.next_state).unwrap_or(0.0);
        let td_target = transition.reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(transition.state, transition.action, new_q);
        trace!(
            state = %transition.state,
            action = %transition.action,
            td_error,
            new_q,
            "q-learning update"
        );
        new_q
    }

    /// Stage a transition for the next [`QTable::learn`] call.
    ///
    /// Values are not touched until `learn` runs.
    pub fn record_transition(
        &mut self,
        state: StateKey,
        next_state: StateKey,
        reward: f64,
        action: Action,
    ) {
        self.transitions.push(Transition {
            state,
            action,
            reward,
            next_state,
        });
    }

    /// Run `iterations` rounds of updates over the staged transitions.
    ///
    /// Each round updates every staged transition, oldest first. Returns the
    /// number of updates applied; with nothing staged this is a no-op.
    pub fn learn(&mut self, iterations: usize) -> usize {
        if self.transitions.is_empty() {
            return 0;
        }
        let staged: Vec<Transition> = self.transitions.iter().copied().collect();
        for _ in 0..iterations {
            for transition in &staged {
                self.q_learning_update(transition);
            }
        }
        iterations * staged.len()
    }

    pub fn pending_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn replay_window(&self) -> usize {
        self.transitions.window()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Reset all Q-values and staged transitions
    pub fn reset(&mut self) {
        self.q_values.clear();
        self.transitions.clear();
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    /// Number of distinct states with at least one recorded action
    pub fn state_count(&self) -> usize {
        let mut states: Vec<StateKey> = self.q_values.keys().map(|(state, _)| *state).collect();
        states.sort_unstable();
        states.dedup();
        states.len()
    }
}
