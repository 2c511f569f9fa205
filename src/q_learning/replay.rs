//! Staging buffer for observed transitions

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{encoding::StateKey, types::Action};

/// One observed `(s, a, r, s')` step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateKey,
    pub action: Action,
    pub reward: f64,
    pub next_state: StateKey,
}

/// Sliding window over the most recent transitions.
///
/// Replaying does not consume entries; a transition stays until newer ones
/// push it out of the window.
#[derive(Debug, Clone)]
pub struct TransitionBuffer {
    window: usize,
    transitions: VecDeque<Transition>,
}

impl TransitionBuffer {
    /// Create a buffer keeping the last `window` transitions (at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            transitions: VecDeque::with_capacity(window),
        }
    }

    pub fn push(&mut self, transition: Transition) {
        if self.transitions.len() == self.window {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Staged transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn latest(&self) -> Option<&Transition> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

impl Default for TransitionBuffer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(reward: f64) -> Transition {
        let key = StateKey::parse("....I....").unwrap();
        Transition {
            state: key,
            action: Action::Stay,
            reward,
            next_state: key,
        }
    }

    #[test]
    fn test_default_keeps_only_latest() {
        let mut buffer = TransitionBuffer::default();
        buffer.push(transition(1.0));
        buffer.push(transition(2.0));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.latest().map(|t| t.reward), Some(2.0));
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut buffer = TransitionBuffer::new(3);
        for reward in 0..5 {
            buffer.push(transition(reward as f64));
        }
        let rewards: Vec<f64> = buffer.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_window_is_raised_to_one() {
        assert_eq!(TransitionBuffer::new(0).window(), 1);
    }
}
