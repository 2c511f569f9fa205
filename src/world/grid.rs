//! Board ownership, agent placement and intruder movement

use std::fmt;

use rand::Rng;
use tracing::{debug, info};

use super::{
    agent::{Agent, AgentKind, Occupant},
    neighborhood::{NEIGHBORHOOD_OFFSETS, Neighborhood},
    trajectory::Trajectory,
};
use crate::{
    Error, Result,
    app::SimulationConfig,
    types::{AgentId, Dimensions, Position},
};

/// The toroidal world: a `width x height` board of agent slots.
///
/// Each slot holds at most one agent. When the intruder steps onto a citizen
/// the citizen is remembered as *displaced* and put back in its slot once the
/// intruder leaves, so citizens never move and are never lost.
#[derive(Debug, Clone)]
pub struct GridWorld {
    dimensions: Dimensions,
    board: Vec<Option<AgentId>>,
    agents: Vec<Agent>,
    intruder: Option<AgentId>,
    displaced: Option<AgentId>,
}

impl GridWorld {
    /// Create an empty world.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            board: vec![None; dimensions.area()],
            agents: Vec::new(),
            intruder: None,
            displaced: None,
        }
    }

    /// Build the starting world for a run: random citizens at the configured
    /// density, then the intruder at its start cell.
    pub fn populate<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self> {
        let dimensions = config.dimensions()?;
        let mut world = Self::new(dimensions);
        let citizens = world.fill_board(config.density, rng)?;

        let start = config
            .intruder_start
            .unwrap_or_else(|| Trajectory::default().position_at(dimensions, 0));
        world.place_intruder(start)?;

        info!(
            %dimensions,
            citizens,
            intruder = %start,
            "populated grid world"
        );
        Ok(world)
    }

    /// Place a citizen on every free cell with probability `density`.
    ///
    /// Returns the number of citizens created.
    pub fn fill_board<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) -> Result<usize> {
        let mut placed = 0;
        for x in 0..self.dimensions.width() {
            for y in 0..self.dimensions.height() {
                let position = Position::new(x, y);
                if self.slot(position).is_some() {
                    continue;
                }
                if rng.random::<f64>() < density {
                    self.place_citizen(position)?;
                    placed += 1;
                }
            }
        }
        Ok(placed)
    }

    /// Create a citizen at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::PositionOutOfBounds`] or [`Error::CellOccupied`].
    pub fn place_citizen(&mut self, position: Position) -> Result<AgentId> {
        self.dimensions.check(position)?;
        if self.slot(position).is_some() {
            return Err(Error::CellOccupied {
                x: position.x,
                y: position.y,
            });
        }
        let id = self.push_agent(AgentKind::Citizen, position);
        self.update_agent(id)?;
        Ok(id)
    }

    /// Create the intruder at `position`, displacing a citizen found there.
    pub fn place_intruder(&mut self, position: Position) -> Result<AgentId> {
        self.dimensions.check(position)?;
        if let Some(existing) = self.intruder {
            let at = self.agents[existing.index()].position;
            return Err(Error::IntruderAlreadyPlaced { x: at.x, y: at.y });
        }
        let id = self.push_agent(AgentKind::Intruder, position);
        self.intruder = Some(id);
        self.update_agent(id)?;
        Ok(id)
    }

    fn push_agent(&mut self, kind: AgentKind, position: Position) -> AgentId {
        let id = AgentId::new(self.agents.len());
        self.agents.push(Agent::new(id, kind, position));
        id
    }

    /// Sync the board with an agent's position.
    ///
    /// Clears the agent's previous slot (restoring a displaced citizen there)
    /// and writes its id into the slot for its current position.
    pub fn update_agent(&mut self, id: AgentId) -> Result<()> {
        let agent = *self.agent(id)?;
        self.dimensions.check(agent.position)?;

        let target = self.dimensions.index(agent.position);
        let mut displaces = None;
        if let Some(other) = self.board[target].filter(|&other| other != id) {
            if agent.is_intruder() && self.agents[other.index()].is_citizen() {
                displaces = Some(other);
            } else {
                return Err(Error::CellOccupied {
                    x: agent.position.x,
                    y: agent.position.y,
                });
            }
        }

        if let Some(previous) = agent.previous_position {
            self.dimensions.check(previous)?;
            let slot = self.dimensions.index(previous);
            if self.board[slot] == Some(id) {
                self.board[slot] = self.take_displaced_at(previous);
            }
        }

        // Re-read: restoring a citizen may have refilled the target (a Stay move).
        if let Some(other) = self.board[target].filter(|&other| other != id) {
            displaces = Some(other);
        }
        if displaces.is_some() {
            self.displaced = displaces;
        }
        self.board[target] = Some(id);
        Ok(())
    }

    fn take_displaced_at(&mut self, position: Position) -> Option<AgentId> {
        match self.displaced {
            Some(citizen) if self.agents[citizen.index()].position == position => {
                self.displaced = None;
                Some(citizen)
            }
            _ => None,
        }
    }

    /// Move the intruder to `(x, y)`. Positions are never clamped.
    ///
    /// # Errors
    ///
    /// [`Error::PositionOutOfBounds`] for an off-grid target and
    /// [`Error::MissingIntruder`] if no intruder was placed.
    pub fn move_intruder_to(&mut self, x: usize, y: usize) -> Result<Position> {
        let position = self.dimensions.check(Position::new(x, y))?;
        let id = self.intruder.ok_or(Error::MissingIntruder)?;
        let from = self.agents[id.index()].position;
        self.agents[id.index()].set_position(position);
        self.update_agent(id)?;
        debug!(%from, to = %position, "intruder moved");
        Ok(position)
    }

    /// Occupant kind at `(x mod width, y mod height)`.
    pub fn object_at(&self, x: i64, y: i64) -> Occupant {
        self.agent_at(x, y)
            .map(|agent| Occupant::from(agent.kind))
            .unwrap_or(Occupant::Empty)
    }

    /// Agent holding the slot at `(x mod width, y mod height)`, if any.
    pub fn agent_at(&self, x: i64, y: i64) -> Option<&Agent> {
        let position = self.dimensions.wrap(x, y);
        self.slot(position).map(|id| &self.agents[id.index()])
    }

    /// The 3x3 block of occupants centered on `position`, wrapping at the edges.
    pub fn neighborhood(&self, position: Position) -> Neighborhood {
        let mut cells = [Occupant::Empty; 9];
        for (cell, &(dx, dy)) in cells.iter_mut().zip(NEIGHBORHOOD_OFFSETS.iter()) {
            let at = self.dimensions.offset(position, dx, dy);
            *cell = self.object_at(at.x as i64, at.y as i64);
        }
        Neighborhood(cells)
    }

    /// What the intruder shares `position` with.
    ///
    /// Reports a citizen displaced by the intruder, otherwise whatever citizen
    /// holds the slot, otherwise [`Occupant::Empty`].
    pub fn resolve_collision(&self, position: Position) -> Occupant {
        let position = self.dimensions.wrap(position.x as i64, position.y as i64);
        if let Some(citizen) = self.displaced
            && self.agents[citizen.index()].position == position
        {
            return Occupant::Citizen;
        }
        match self.slot(position) {
            Some(id) if self.agents[id.index()].is_citizen() => Occupant::Citizen,
            _ => Occupant::Empty,
        }
    }

    fn slot(&self, position: Position) -> Option<AgentId> {
        self.board[self.dimensions.index(position)]
    }

    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.agents
            .get(id.index())
            .ok_or(Error::UnknownAgent { id: id.index() })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn citizens(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|agent| agent.is_citizen())
    }

    pub fn citizen_count(&self) -> usize {
        self.citizens().count()
    }

    pub fn intruder(&self) -> Option<&Agent> {
        self.intruder.map(|id| &self.agents[id.index()])
    }

    pub fn intruder_position(&self) -> Result<Position> {
        self.intruder()
            .map(|agent| agent.position)
            .ok_or(Error::MissingIntruder)
    }

    /// The citizen currently hidden beneath the intruder.
    pub fn displaced_citizen(&self) -> Option<&Agent> {
        self.displaced.map(|id| &self.agents[id.index()])
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.dimensions.height() {
            for x in 0..self.dimensions.width() {
                write!(f, "{}", self.object_at(x as i64, y as i64).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
