//! Agents and the occupant tags used for observation

use serde::{Deserialize, Serialize};

use crate::types::{AgentId, Position};

/// What an agent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Citizen,
    Intruder,
}

/// The kind of thing found in a cell.
///
/// Observations only ever see this tag, never the identity of the agent, so
/// two different citizens in the same layout look the same to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupant {
    Empty,
    Citizen,
    Intruder,
}

impl Occupant {
    pub fn to_char(self) -> char {
        match self {
            Occupant::Empty => '.',
            Occupant::Citizen => 'C',
            Occupant::Intruder => 'I',
        }
    }

    pub fn from_char(c: char) -> Option<Occupant> {
        match c {
            '.' | ' ' => Some(Occupant::Empty),
            'C' | 'c' => Some(Occupant::Citizen),
            'I' | 'i' => Some(Occupant::Intruder),
            _ => None,
        }
    }

    /// Base-3 digit used by the state encoding.
    pub(crate) fn digit(self) -> u16 {
        match self {
            Occupant::Empty => 0,
            Occupant::Citizen => 1,
            Occupant::Intruder => 2,
        }
    }

    pub(crate) fn from_digit(digit: u16) -> Option<Occupant> {
        match digit {
            0 => Some(Occupant::Empty),
            1 => Some(Occupant::Citizen),
            2 => Some(Occupant::Intruder),
            _ => None,
        }
    }
}

impl From<AgentKind> for Occupant {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Citizen => Occupant::Citizen,
            AgentKind::Intruder => Occupant::Intruder,
        }
    }
}

/// A citizen or the intruder, with its current and previous cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    pub position: Position,
    pub previous_position: Option<Position>,
}

impl Agent {
    pub(crate) fn new(id: AgentId, kind: AgentKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            previous_position: None,
        }
    }

    /// Move to `position`, remembering where the agent came from.
    pub(crate) fn set_position(&mut self, position: Position) {
        self.previous_position = Some(self.position);
        self.position = position;
    }

    pub fn is_citizen(&self) -> bool {
        self.kind == AgentKind::Citizen
    }

    pub fn is_intruder(&self) -> bool {
        self.kind == AgentKind::Intruder
    }
}
