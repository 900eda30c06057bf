#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation engine that advances the universe one generation at a time.
//!
//! Every step reads the current generation through the bounds-safe accessors
//! of [`GridState`], writes the successor into a separate scratch buffer, and
//! derives the pause before the next step from the fraction of living cells.

use life_core::{CellState, Delay, Event, GridSize, StatusReport, INITIAL_DELAY};
use life_world::{query, GridState};
use rand::Rng;

/// Upper asymptote of the logistic delay curve in milliseconds.
pub const MAX_DELAY_MS: f64 = 10_000.0;

/// Steepness of the logistic delay curve.
pub const DELAY_STEEPNESS: f64 = 10.0;

/// Alive fraction at which the delay reaches half of [`MAX_DELAY_MS`].
pub const DELAY_MIDPOINT: f64 = 0.7;

/// Applies the transition rule to a single cell.
///
/// Two neighbours keep the current state, three neighbours produce a living
/// cell, and any other count produces a dead one.
#[must_use]
pub const fn next_state(current: CellState, live_neighbours: u8) -> CellState {
    match live_neighbours {
        2 => current,
        3 => CellState::Alive,
        _ => CellState::Dead,
    }
}

/// Maps the alive fraction of a generation to the pause before the next one.
#[must_use]
pub fn logistic_delay(alive_fraction: f64) -> Delay {
    let exponent = -DELAY_STEEPNESS * (alive_fraction - DELAY_MIDPOINT);
    Delay::from_millis(MAX_DELAY_MS / (1.0 + exponent.exp()))
}

/// Fraction of the configured cells that are alive.
///
/// The denominator is `width * height`, not the interior cell count.
#[must_use]
pub fn alive_fraction(alive: u64, size: GridSize) -> f64 {
    let total = size.total_cells();
    if total == 0 {
        return 0.0;
    }
    alive as f64 / total as f64
}

/// Owns the universe and advances it generation by generation.
#[derive(Clone, Debug)]
pub struct SimulationEngine {
    grid: GridState,
    generation: u64,
    current_delay: Delay,
}

impl SimulationEngine {
    /// Creates an engine holding a dead universe of the provided dimensions.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self::from_grid(GridState::new(size))
    }

    /// Creates an engine that continues from an existing universe at generation zero.
    #[must_use]
    pub fn from_grid(grid: GridState) -> Self {
        Self {
            grid,
            generation: 0,
            current_delay: INITIAL_DELAY,
        }
    }

    /// Read-only access to the current generation.
    #[must_use]
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Mutable access to the current generation, used to seed known patterns.
    pub fn grid_mut(&mut self) -> &mut GridState {
        &mut self.grid
    }

    /// Number of completed steps.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Pause requested before the next step.
    #[must_use]
    pub const fn current_delay(&self) -> Delay {
        self.current_delay
    }

    /// Report describing the most recent step.
    #[must_use]
    pub fn status(&self) -> StatusReport {
        StatusReport::from_generation(self.generation, self.current_delay)
    }

    /// Replaces the universe with a dead one of the same dimensions.
    pub fn reset_universe(&mut self, out: &mut Vec<Event>) {
        let size = self.grid.size();
        self.grid.reset(size);
        out.push(Event::UniverseReset { size });
    }

    /// Resets the universe and fills its interior with a random generation.
    pub fn create_initial_generation<R>(&mut self, rng: &mut R, out: &mut Vec<Event>)
    where
        R: Rng + ?Sized,
    {
        self.reset_universe(out);
        let alive = self.grid.randomize(rng);
        log::debug!("initial generation seeded with {alive} live cells");
        out.push(Event::UniverseRandomized { alive });
    }

    /// Computes the next generation, updates ages and the pacing delay.
    ///
    /// Emits [`Event::GenerationAdvanced`] and returns the new generation for
    /// rendering.
    pub fn step(&mut self, out: &mut Vec<Event>) -> &GridState {
        let mut next = self.grid.next_generation();
        let mut alive = 0_u64;

        for cell in query::interior(self.grid.size()) {
            let neighbours = query::live_neighbours(&self.grid, cell);
            let state = next_state(self.grid.get(cell), neighbours);
            let age = if state.is_alive() {
                alive += 1;
                self.grid.age(cell).saturating_add(1)
            } else {
                0
            };
            next.set(cell, state, age);
        }

        let committed = self.grid.commit(next);
        debug_assert!(committed, "scratch buffer shares the grid dimensions");

        let fraction = alive_fraction(alive, self.grid.size());
        self.current_delay = logistic_delay(fraction);
        self.generation = self.generation.saturating_add(1);

        log::trace!(
            "generation {} has {alive} live cells ({:.4}), next step in {}ms",
            self.generation,
            fraction,
            self.current_delay
        );
        out.push(Event::GenerationAdvanced {
            generation: self.generation,
            alive,
            delay: self.current_delay,
        });

        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stasis_keeps_current_state_with_two_neighbours() {
        assert_eq!(next_state(CellState::Alive, 2), CellState::Alive);
        assert_eq!(next_state(CellState::Dead, 2), CellState::Dead);
    }

    #[test]
    fn three_neighbours_always_produce_life() {
        assert_eq!(next_state(CellState::Alive, 3), CellState::Alive);
        assert_eq!(next_state(CellState::Dead, 3), CellState::Alive);
    }

    #[test]
    fn loneliness_and_overcrowding_kill() {
        for count in [0, 1, 4, 5, 6, 7, 8] {
            assert_eq!(next_state(CellState::Alive, count), CellState::Dead);
            assert_eq!(next_state(CellState::Dead, count), CellState::Dead);
        }
    }

    #[test]
    fn delay_hits_half_maximum_at_midpoint() {
        let delay = logistic_delay(DELAY_MIDPOINT).as_millis();
        assert!((delay - MAX_DELAY_MS / 2.0).abs() < 1e-9);
    }

    #[test]
    fn delay_approaches_bounds_at_extremes() {
        let empty = logistic_delay(0.0).as_millis();
        let full = logistic_delay(1.0).as_millis();

        assert!(empty < 10.0, "sparse boards should barely pause: {empty}");
        assert!(full > 9_500.0, "crowded boards should pause heavily: {full}");
    }

    #[test]
    fn delay_is_monotonic_in_alive_fraction() {
        let mut previous = logistic_delay(0.0).as_millis();
        for step in 1..=100 {
            let current = logistic_delay(f64::from(step) / 100.0).as_millis();
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    fn alive_fraction_uses_configured_dimensions() {
        let size = GridSize::new(10, 5);

        assert!((alive_fraction(25, size) - 0.5).abs() < f64::EPSILON);
        assert_eq!(alive_fraction(3, GridSize::new(0, 5)), 0.0);
    }

    #[test]
    fn new_engine_starts_at_generation_zero_with_initial_delay() {
        let engine = SimulationEngine::new(GridSize::new(8, 8));

        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.current_delay(), INITIAL_DELAY);
    }
}
