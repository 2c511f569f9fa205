//! Grid world behavior: wraparound, neighborhoods and collision bookkeeping

use intruder::{
    app::{RewardTable, SimulationConfig},
    encoding::StateKey,
    types::{Dimensions, Position},
    world::{GridWorld, Occupant, Outcome},
};
use rand::{SeedableRng, rngs::StdRng};

mod common;

#[test]
fn test_object_at_wraps_both_axes() {
    let world = common::world_with(4, 3, &[(3, 2)], (1, 1));
    assert_eq!(world.object_at(-1, -1), Occupant::Citizen);
    assert_eq!(world.object_at(3, 2), Occupant::Citizen);
    assert_eq!(world.object_at(7, 5), Occupant::Citizen);
    assert_eq!(world.object_at(-3, -2), Occupant::Intruder);
    assert_eq!(world.object_at(0, 0), Occupant::Empty);
}

#[test]
fn test_corner_neighborhoods_see_opposite_corner() {
    let from_origin = common::world_with(4, 3, &[(3, 2)], (0, 0));
    let key = StateKey::from(&from_origin.neighborhood(Position::new(0, 0)));
    assert_eq!(key.to_string(), "C...I....");

    let from_far = common::world_with(4, 3, &[(0, 0)], (3, 2));
    let key = StateKey::from(&from_far.neighborhood(Position::new(3, 2)));
    assert_eq!(key.to_string(), "....I...C");
}

#[test]
fn test_key_ignores_citizen_identity() {
    let cells = [(1, 0), (2, 1), (0, 2)];
    let forward = common::world_with(3, 3, &cells, (1, 1));
    let mut reversed_cells = cells;
    reversed_cells.reverse();
    let reversed = common::world_with(3, 3, &reversed_cells, (1, 1));

    let center = Position::new(1, 1);
    assert_eq!(
        StateKey::from(&forward.neighborhood(center)),
        StateKey::from(&reversed.neighborhood(center))
    );
}

#[test]
fn test_move_onto_citizen_then_stay_collides() {
    let rewards = RewardTable::default();
    let mut world = common::world_with(3, 1, &[(1, 0)], (0, 0));

    let to = world.move_intruder_to(1, 0).unwrap();
    let outcome = Outcome::classify(true, world.resolve_collision(to));
    assert_eq!(outcome, Outcome::MoveToCitizen);
    assert_eq!(rewards.reward_for(outcome), -5.0);

    let to = world.move_intruder_to(1, 0).unwrap();
    let outcome = Outcome::classify(false, world.resolve_collision(to));
    assert_eq!(outcome, Outcome::Collide);
    assert_eq!(rewards.reward_for(outcome), -100.0);

    let to = world.move_intruder_to(2, 0).unwrap();
    let outcome = Outcome::classify(true, world.resolve_collision(to));
    assert_eq!(outcome, Outcome::MoveToEmpty);
    assert_eq!(world.object_at(1, 0), Occupant::Citizen);
    assert_eq!(world.citizen_count(), 1);
}

#[test]
fn test_out_of_bounds_moves_fail_fast() {
    let mut world = common::world_with(3, 3, &[], (0, 0));
    assert!(world.move_intruder_to(3, 0).is_err());
    assert!(world.move_intruder_to(0, 7).is_err());
    assert_eq!(world.intruder_position().unwrap(), Position::new(0, 0));
}

#[test]
fn test_populate_respects_start_and_seed() {
    let config = SimulationConfig::default()
        .with_grid(12, 9)
        .with_intruder_start(Position::new(4, 4));

    let a = GridWorld::populate(&config, &mut StdRng::seed_from_u64(77)).unwrap();
    let b = GridWorld::populate(&config, &mut StdRng::seed_from_u64(77)).unwrap();

    assert_eq!(a.intruder_position().unwrap(), Position::new(4, 4));
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(a.dimensions(), Dimensions::new(12, 9).unwrap());
}

#[test]
fn test_walking_over_citizens_never_loses_them() {
    let mut world = common::world_with(5, 1, &[(1, 0), (2, 0), (4, 0)], (0, 0));
    for step in 1..=20 {
        world.move_intruder_to(step % 5, 0).unwrap();
        let visible = world.to_string().matches('C').count();
        let hidden = usize::from(world.displaced_citizen().is_some());
        assert_eq!(visible + hidden, 3, "after step {step}");
    }
    world.move_intruder_to(0, 0).unwrap();
    assert_eq!(world.to_string(), "ICC.C\n");
}
