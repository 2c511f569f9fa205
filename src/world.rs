//! Toroidal grid world with stationary citizens and a single intruder

pub mod agent;
pub mod grid;
pub mod neighborhood;
pub mod outcome;
pub mod trajectory;

pub use agent::{Agent, AgentKind, Occupant};
pub use grid::GridWorld;
pub use neighborhood::{NEIGHBORHOOD_OFFSETS, Neighborhood};
pub use outcome::Outcome;
pub use trajectory::Trajectory;
