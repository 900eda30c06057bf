use life_core::{CellCoord, CellState, Event, GridSize};
use life_system_simulation::{logistic_delay, SimulationEngine, MAX_DELAY_MS};
use life_world::{patterns, query, GridState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn engine_with(size: GridSize, cells: &[(u32, u32)]) -> SimulationEngine {
    let mut grid = GridState::new(size);
    for &(x, y) in cells {
        assert!(grid.set(CellCoord::new(x, y), CellState::Alive));
    }
    SimulationEngine::from_grid(grid)
}

fn live_cells(grid: &GridState) -> Vec<(u32, u32)> {
    query::interior(grid.size())
        .filter(|cell| grid.get(*cell).is_alive())
        .map(|cell| (cell.x(), cell.y()))
        .collect()
}

fn assert_age_invariants(grid: &GridState) {
    let size = grid.size();
    for x in 0..=size.width() {
        for y in 0..=size.height() {
            let cell = CellCoord::new(x, y);
            if grid.age(cell) > 0 {
                assert!(grid.get(cell).is_alive(), "aged cell {cell:?} must be alive");
            }
            if !grid.get(cell).is_alive() {
                assert_eq!(grid.age(cell), 0, "dead cell {cell:?} must have no age");
            }
        }
    }
}

#[test]
fn block_still_life_is_unchanged() {
    let mut engine = engine_with(GridSize::new(8, 8), &[(3, 3), (4, 3), (3, 4), (4, 4)]);
    let before = live_cells(engine.grid());
    let mut events = Vec::new();

    let after = live_cells(engine.step(&mut events));

    assert_eq!(before, after);
}

#[test]
fn blinker_alternates_orientation() {
    let mut engine = engine_with(GridSize::new(9, 9), &[(3, 4), (4, 4), (5, 4)]);
    let horizontal = live_cells(engine.grid());
    let mut events = Vec::new();

    let vertical = live_cells(engine.step(&mut events));
    assert_eq!(vertical, vec![(4, 3), (4, 4), (4, 5)]);

    let restored = live_cells(engine.step(&mut events));
    assert_eq!(restored, horizontal);
}

#[test]
fn ages_grow_while_alive_and_reset_on_death() {
    let mut engine = engine_with(GridSize::new(9, 9), &[(3, 4), (4, 4), (5, 4)]);
    let mut events = Vec::new();

    let _ = engine.step(&mut events);
    assert_eq!(engine.grid().age(CellCoord::new(4, 4)), 1);
    assert_eq!(engine.grid().age(CellCoord::new(4, 3)), 1);
    assert_eq!(engine.grid().age(CellCoord::new(3, 4)), 0);

    let _ = engine.step(&mut events);
    assert_eq!(engine.grid().age(CellCoord::new(4, 4)), 2);
    assert_eq!(engine.grid().age(CellCoord::new(4, 3)), 0);
    assert_eq!(engine.grid().age(CellCoord::new(3, 4)), 1);
}

#[test]
fn block_against_dead_border_survives() {
    let mut engine = engine_with(GridSize::new(5, 5), &[(1, 1), (2, 1), (1, 2), (2, 2)]);
    let mut events = Vec::new();

    for _ in 0..3 {
        let _ = engine.step(&mut events);
    }

    assert_eq!(
        live_cells(engine.grid()),
        vec![(1, 1), (1, 2), (2, 1), (2, 2)]
    );
    assert_eq!(engine.grid().age(CellCoord::new(1, 1)), 3);
}

#[test]
fn lone_cells_die_of_loneliness() {
    let mut engine = engine_with(GridSize::new(6, 6), &[(2, 2), (4, 4)]);
    let mut events = Vec::new();

    let grid = engine.step(&mut events);

    assert!(live_cells(grid).is_empty());
    assert_eq!(grid.age(CellCoord::new(2, 2)), 0);
}

#[test]
fn overcrowded_centre_dies() {
    let mut engine = engine_with(
        GridSize::new(7, 7),
        &[(2, 2), (3, 2), (4, 2), (2, 3), (3, 3)],
    );
    let mut events = Vec::new();

    let grid = engine.step(&mut events);

    assert_eq!(grid.get(CellCoord::new(3, 3)), CellState::Dead);
}

#[test]
fn dead_universe_stays_dead_but_counts_generations() {
    let mut engine = SimulationEngine::new(GridSize::new(3, 3));
    let mut events = Vec::new();

    for expected in 1..=5 {
        let grid = engine.step(&mut events);
        assert_eq!(query::alive_count(grid), 0);
        assert_eq!(engine.generation(), expected);
    }

    let generations: Vec<u64> = events
        .iter()
        .filter_map(|event| match event {
            Event::GenerationAdvanced { generation, .. } => Some(*generation),
            _ => None,
        })
        .collect();
    assert_eq!(generations, vec![1, 2, 3, 4, 5]);
}

#[test]
fn step_reports_delay_from_alive_fraction() {
    let mut engine = engine_with(GridSize::new(8, 8), &[(3, 3), (4, 3), (3, 4), (4, 4)]);
    let mut events = Vec::new();

    let _ = engine.step(&mut events);

    let expected = logistic_delay(4.0 / 64.0);
    assert_eq!(engine.current_delay(), expected);
    assert_eq!(
        events,
        vec![Event::GenerationAdvanced {
            generation: 1,
            alive: 4,
            delay: expected,
        }]
    );
    assert!(engine.current_delay().as_millis() < MAX_DELAY_MS / 2.0);
}

#[test]
fn random_universe_preserves_age_invariants_and_border() {
    let size = GridSize::new(40, 25);
    let mut engine = SimulationEngine::new(size);
    let mut rng = ChaCha8Rng::seed_from_u64(0x00c0_ffee);
    let mut events = Vec::new();
    engine.create_initial_generation(&mut rng, &mut events);

    for _ in 0..30 {
        let grid = engine.step(&mut events);
        assert_age_invariants(grid);
        for x in 0..=size.width() {
            assert!(!grid.get(CellCoord::new(x, 0)).is_alive());
            assert!(!grid.get(CellCoord::new(x, size.height())).is_alive());
        }
        for y in 0..=size.height() {
            assert!(!grid.get(CellCoord::new(0, y)).is_alive());
            assert!(!grid.get(CellCoord::new(size.width(), y)).is_alive());
        }
    }
    assert_eq!(engine.generation(), 30);
}

#[test]
fn glider_keeps_five_cells_while_travelling() {
    let size = GridSize::new(20, 20);
    let mut grid = GridState::new(size);
    let _ = patterns::place(&mut grid, &patterns::GLIDER, CellCoord::new(2, 2));
    let mut engine = SimulationEngine::from_grid(grid);
    let mut events = Vec::new();

    for _ in 0..4 {
        let _ = engine.step(&mut events);
    }

    let shifted: Vec<(u32, u32)> = patterns::GLIDER
        .cells()
        .iter()
        .map(|(x, y)| (x + 3, y + 3))
        .collect();
    let mut expected = shifted;
    expected.sort_unstable();
    assert_eq!(live_cells(engine.grid()), expected);
}

#[test]
fn initial_generation_emits_reset_then_randomized() {
    let mut engine = SimulationEngine::new(GridSize::new(10, 10));
    let mut events = Vec::new();

    engine.create_initial_generation(&mut ChaCha8Rng::seed_from_u64(4), &mut events);

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        Event::UniverseReset {
            size: GridSize::new(10, 10)
        }
    );
    match events[1] {
        Event::UniverseRandomized { alive } => {
            assert_eq!(alive, query::alive_count(engine.grid()));
        }
        ref other => panic!("unexpected event: {other:?}"),
    }
}
