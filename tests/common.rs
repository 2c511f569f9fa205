//! Common test utilities for the intruder test suite.
//!
//! Builders for small hand-laid worlds and quiet, seeded configs.

#![allow(dead_code)]

use intruder::{
    app::SimulationConfig,
    types::{Dimensions, Position},
    world::GridWorld,
};

/// World of the given size with citizens at `citizens` and the intruder at `intruder`.
pub fn world_with(
    width: usize,
    height: usize,
    citizens: &[(usize, usize)],
    intruder: (usize, usize),
) -> GridWorld {
    let mut world = GridWorld::new(Dimensions::new(width, height).unwrap());
    for &(x, y) in citizens {
        world.place_citizen(Position::new(x, y)).unwrap();
    }
    world
        .place_intruder(Position::new(intruder.0, intruder.1))
        .unwrap();
    world
}

/// Seeded config on a small grid.
pub fn small_config(width: usize, height: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::default()
        .with_grid(width, height)
        .with_seed(seed)
}
