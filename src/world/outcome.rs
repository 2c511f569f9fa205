//! Consequence of one intruder move

use std::fmt;

use serde::{Deserialize, Serialize};

use super::agent::Occupant;

/// How a tick ended for the intruder. Selects the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Stayed put on a cell shared with a citizen.
    Collide,
    MoveToCitizen,
    MoveToEmpty,
    Stay,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::Collide,
        Outcome::MoveToCitizen,
        Outcome::MoveToEmpty,
        Outcome::Stay,
    ];

    /// Classify from whether the intruder changed cell and what it shares
    /// the destination with after the move.
    pub fn classify(moved: bool, resolved: Occupant) -> Self {
        match (moved, resolved) {
            (true, Occupant::Citizen) => Outcome::MoveToCitizen,
            (true, _) => Outcome::MoveToEmpty,
            (false, Occupant::Citizen) => Outcome::Collide,
            (false, _) => Outcome::Stay,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Collide => "collide",
            Outcome::MoveToCitizen => "move_to_citizen",
            Outcome::MoveToEmpty => "move_to_empty",
            Outcome::Stay => "stay",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Outcome::Collide => 0,
            Outcome::MoveToCitizen => 1,
            Outcome::MoveToEmpty => 2,
            Outcome::Stay => 3,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
