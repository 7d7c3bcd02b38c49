use hamlet_core::{Direction, Position, WorldConfig};
use hamlet_world::{Agent, MoveEvent, Name, Registration, World, WorldGrid};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn agent_at(x: i32, y: i32, size: u32) -> Agent {
    Agent::new(Name::new("Gareth", "Thornfield"), size, Position::new(x, y)).unwrap()
}

fn world(width: i32, height: i32) -> World {
    World::new(&WorldConfig {
        width,
        height,
        cell_capacity: 20,
    })
    .unwrap()
}

#[test]
fn eleventh_agent_does_not_fit() {
    let mut world = world(10, 10);
    for _ in 0..10 {
        let registration = world.register(agent_at(5, 5, 2)).unwrap();
        assert!(registration.is_placed());
    }

    let extra = agent_at(5, 5, 2);
    let extra_id = extra.id();
    let registration = world.register(extra).unwrap();

    assert!(matches!(registration, Registration::Rejected(_)));
    assert!(world.agent(extra_id).is_none());
    assert!(world.agents().all(|a| a.id() != extra_id));
    assert_eq!(world.grid().cell(Position::new(5, 5)).unwrap().used(), 20);
}

#[test]
fn agent_at_origin_cannot_step_west() {
    let mut grid = WorldGrid::new(10, 10, 20).unwrap();
    let mut agent = agent_at(0, 0, 2);
    assert!(grid.place(&agent).unwrap());

    assert!(!grid.move_agent(&mut agent, Position::new(-1, 0)));
    assert_eq!(agent.position(), Position::new(0, 0));
    assert!(grid.cell(Position::new(0, 0)).unwrap().contains(agent.id()));
}

#[test]
fn capacity_rejection_keeps_occupant_order() {
    let mut grid = WorldGrid::new(10, 10, 20).unwrap();
    let residents = [agent_at(5, 5, 7), agent_at(5, 5, 7), agent_at(5, 5, 5)];
    for resident in &residents {
        assert!(grid.place(resident).unwrap());
    }
    let mut newcomer = agent_at(5, 4, 2);
    assert!(grid.place(&newcomer).unwrap());
    let before = grid.cell(Position::new(5, 5)).unwrap().clone();

    assert!(!grid.move_agent(&mut newcomer, Position::new(5, 5)));

    let after = grid.cell(Position::new(5, 5)).unwrap();
    assert_eq!(after, &before);
    let ids: Vec<_> = after.occupants().iter().map(|o| o.id).collect();
    assert_eq!(ids, residents.iter().map(|a| a.id()).collect::<Vec<_>>());
    assert_eq!(newcomer.position(), Position::new(5, 4));
}

#[test]
fn three_days_one_agent_three_events() {
    let mut world = world(10, 10);
    let agent = agent_at(4, 4, 2);
    let id = agent.id();
    world.register(agent).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut events: Vec<MoveEvent> = Vec::new();
    world.run(3, &mut rng, &mut events);

    assert_eq!(events.len(), 3);
    for (day, event) in (1..=3).zip(&events) {
        assert_eq!(event.day(), day);
        assert_eq!(event.agent(), id);
        assert!(matches!(event, MoveEvent::Moved { .. } | MoveEvent::Blocked { .. }));
    }
    assert_eq!(world.agent(id).unwrap().position(), events[2].position());
}

#[test]
fn single_cell_world_blocks_every_move() {
    let mut world = world(1, 1);
    world.register(agent_at(0, 0, 4)).unwrap();
    world.register(agent_at(0, 0, 4)).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut events: Vec<MoveEvent> = Vec::new();
    world.run(5, &mut rng, &mut events);

    assert_eq!(events.len(), 10);
    assert!(events.iter().all(|e| !e.is_moved() && e.position() == Position::new(0, 0)));
}

#[derive(Debug, Clone)]
enum Op {
    Register { x: i32, y: i32, size: u32 },
    Move { slot: usize, direction: Direction },
    Deregister { slot: usize },
    Step { seed: u64 },
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::South),
        Just(Direction::East),
        Just(Direction::West),
    ]
}

fn op(width: i32, height: i32) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..width, 0..height, 1u32..=8).prop_map(|(x, y, size)| Op::Register { x, y, size }),
        5 => (any::<usize>(), direction()).prop_map(|(slot, direction)| Op::Move { slot, direction }),
        1 => any::<usize>().prop_map(|slot| Op::Deregister { slot }),
        1 => any::<u64>().prop_map(|seed| Op::Step { seed }),
    ]
}

proptest! {
    #[test]
    fn grid_and_roster_stay_consistent(ops in prop::collection::vec(op(4, 3), 1..80)) {
        let mut world = World::new(&WorldConfig { width: 4, height: 3, cell_capacity: 10 }).unwrap();

        for op in ops {
            let ids: Vec<_> = world.agents().map(|a| a.id()).collect();
            match op {
                Op::Register { x, y, size } => {
                    world.register(agent_at(x, y, size)).unwrap();
                }
                Op::Move { slot, direction } if !ids.is_empty() => {
                    let id = ids[slot % ids.len()];
                    let before = world.agent(id).unwrap().position();
                    let event = world.try_move(id, direction).unwrap();
                    let after = world.agent(id).unwrap().position();
                    if event.is_moved() {
                        prop_assert_eq!(after, before.step(direction));
                    } else {
                        prop_assert_eq!(after, before);
                    }
                }
                Op::Deregister { slot } if !ids.is_empty() => {
                    let id = ids[slot % ids.len()];
                    prop_assert!(world.deregister(id).is_some());
                }
                Op::Step { seed } => {
                    let mut events: Vec<MoveEvent> = Vec::new();
                    world.step(&mut ChaCha8Rng::seed_from_u64(seed), &mut events);
                    prop_assert_eq!(events.len(), ids.len());
                }
                _ => {}
            }

            prop_assert!(world.check_invariants().is_ok());
            for (_, cell) in world.grid().iter() {
                prop_assert!(cell.used() <= cell.capacity());
            }
            let total: u64 = world.agents().map(|a| a.size() as u64).sum();
            prop_assert_eq!(world.grid().total_occupancy(), total);
        }
    }

    #[test]
    fn same_cell_move_always_succeeds(sizes in prop::collection::vec(1u32..=5, 1..10)) {
        let mut grid = WorldGrid::new(3, 3, 20).unwrap();
        let mut placed = Vec::new();
        for size in sizes {
            let agent = agent_at(1, 1, size);
            if grid.place(&agent).unwrap() {
                placed.push(agent);
            }
        }

        let before = grid.cell(Position::new(1, 1)).unwrap().clone();
        for agent in placed.iter_mut() {
            prop_assert!(grid.move_agent(agent, Position::new(1, 1)));
        }
        prop_assert_eq!(grid.cell(Position::new(1, 1)).unwrap(), &before);
    }

    #[test]
    fn out_of_bounds_moves_rejected(width in 1i32..12, height in 1i32..12) {
        let mut grid = WorldGrid::new(width, height, 20).unwrap();
        let mut agent = agent_at(0, 0, 1);
        prop_assert!(grid.place(&agent).unwrap());

        prop_assert!(!grid.move_agent(&mut agent, Position::new(-1, 0)));
        prop_assert!(!grid.move_agent(&mut agent, Position::new(width, 0)));
        prop_assert_eq!(agent.position(), Position::new(0, 0));
        prop_assert_eq!(grid.locate(agent.id()), vec![Position::new(0, 0)]);
    }
}
