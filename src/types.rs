//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid.
///
/// Coordinates are always stored in range; wrapping of off-grid offsets is
/// done by [`Dimensions::wrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a toroidal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    width: usize,
    height: usize,
}

impl Dimensions {
    /// Create new dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDimensions`] if either side is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, crate::Error> {
        if width == 0 || height == 0 {
            return Err(crate::Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Fail fast on positions outside the declared bounds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PositionOutOfBounds`]; never clamps.
    pub fn check(&self, position: Position) -> Result<Position, crate::Error> {
        if self.contains(position) {
            Ok(position)
        } else {
            Err(crate::Error::PositionOutOfBounds {
                x: position.x,
                y: position.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Map an arbitrary (possibly negative) coordinate pair onto the torus.
    pub fn wrap(&self, x: i64, y: i64) -> Position {
        Position {
            x: x.rem_euclid(self.width as i64) as usize,
            y: y.rem_euclid(self.height as i64) as usize,
        }
    }

    /// Translate `position` by `(dx, dy)` with wraparound on both axes.
    pub fn offset(&self, position: Position, dx: i64, dy: i64) -> Position {
        self.wrap(position.x as i64 + dx, position.y as i64 + dy)
    }

    /// Row-major slot index of an in-bounds position.
    pub(crate) fn index(&self, position: Position) -> usize {
        position.y * self.width + position.x
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Horizontal shift applied to the intruder each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Action {
    Left,
    Stay,
    Right,
}

impl Action {
    /// The complete action space, in tie-breaking order.
    pub const ALL: [Action; 3] = [Action::Left, Action::Stay, Action::Right];

    /// Signed displacement along the x axis.
    pub fn delta(self) -> i64 {
        match self {
            Action::Left => -1,
            Action::Stay => 0,
            Action::Right => 1,
        }
    }

    pub fn from_delta(value: i64) -> Result<Self, crate::Error> {
        match value {
            -1 => Ok(Action::Left),
            0 => Ok(Action::Stay),
            1 => Ok(Action::Right),
            other => Err(crate::Error::InvalidAction { value: other }),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Stay => 1,
            Action::Right => 2,
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = crate::Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Action::from_delta(value)
    }
}

impl From<Action> for i64 {
    fn from(action: Action) -> Self {
        action.delta()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.delta())
    }
}

/// Index of an agent owned by a [`crate::world::GridWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(usize);

impl AgentId {
    pub(crate) fn new(index: usize) -> Self {
        AgentId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
