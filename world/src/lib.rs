#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative universe state for the Game of Life.
//!
//! [`GridState`] owns the live/dead matrix together with the per-cell age
//! matrix. It performs no simulation itself; the engine reads it through the
//! bounds-safe accessors, fills a [`NextGeneration`] scratch buffer and hands
//! it back through [`GridState::commit`].

pub mod patterns;

use life_core::{CellCoord, CellState, GridSize};
use rand::Rng;

/// Live/dead matrix and consecutive-alive counters for every allocated cell.
///
/// Both matrices always share the allocated dimensions
/// `(width + 1) x (height + 1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridState {
    size: GridSize,
    cells: Vec<CellState>,
    ages: Vec<u32>,
}

impl GridState {
    /// Creates a dead universe with the provided dimensions.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        let len = allocated_len(size);
        Self {
            size,
            cells: vec![CellState::Dead; len],
            ages: vec![0; len],
        }
    }

    /// Reallocates both matrices for the provided dimensions, zeroing every entry.
    pub fn reset(&mut self, size: GridSize) {
        *self = Self::new(size);
    }

    /// Fills every interior cell with a uniformly sampled state.
    ///
    /// The border keeps whatever the last reset left there. Returns the number
    /// of interior cells that came out alive.
    pub fn randomize<R>(&mut self, rng: &mut R) -> u64
    where
        R: Rng + ?Sized,
    {
        let mut alive = 0;
        for cell in query::interior(self.size) {
            let state = if rng.gen_bool(0.5) {
                alive += 1;
                CellState::Alive
            } else {
                CellState::Dead
            };
            if let Some(index) = self.index(cell) {
                self.cells[index] = state;
            }
        }
        alive
    }

    /// Configured dimensions of the universe.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Reads the state of a cell, treating anything outside the allocation as dead.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> CellState {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellState::Dead)
    }

    /// Number of consecutive generations the cell has been alive.
    #[must_use]
    pub fn age(&self, cell: CellCoord) -> u32 {
        self.index(cell)
            .and_then(|index| self.ages.get(index).copied())
            .unwrap_or(0)
    }

    /// Overwrites the state of an interior cell.
    ///
    /// Killing a cell clears its age immediately. Returns `false` when the
    /// coordinate is not part of the interior and nothing was written.
    pub fn set(&mut self, cell: CellCoord, state: CellState) -> bool {
        if !self.size.is_interior(cell) {
            return false;
        }
        let Some(index) = self.index(cell) else {
            return false;
        };
        self.cells[index] = state;
        if !state.is_alive() {
            self.ages[index] = 0;
        }
        true
    }

    /// Allocates a zeroed scratch buffer shaped like this universe.
    #[must_use]
    pub fn next_generation(&self) -> NextGeneration {
        let len = allocated_len(self.size);
        NextGeneration {
            size: self.size,
            cells: vec![CellState::Dead; len],
            ages: vec![0; len],
        }
    }

    /// Replaces both matrices with the contents of a completed scratch buffer.
    ///
    /// Buffers allocated for different dimensions are discarded and `false`
    /// is returned.
    pub fn commit(&mut self, next: NextGeneration) -> bool {
        if next.size != self.size {
            return false;
        }
        self.cells = next.cells;
        self.ages = next.ages;
        true
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        index_in(self.size, cell)
    }
}

/// Scratch buffer that receives a generation while the current one is read.
#[derive(Clone, Debug)]
pub struct NextGeneration {
    size: GridSize,
    cells: Vec<CellState>,
    ages: Vec<u32>,
}

impl NextGeneration {
    /// Records the computed state and age of a cell.
    ///
    /// Dead cells always store an age of zero. Coordinates outside the
    /// allocation are ignored.
    pub fn set(&mut self, cell: CellCoord, state: CellState, age: u32) {
        let Some(index) = index_in(self.size, cell) else {
            return;
        };
        self.cells[index] = state;
        self.ages[index] = if state.is_alive() { age } else { 0 };
    }

    /// Reads a previously recorded state.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> CellState {
        index_in(self.size, cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellState::Dead)
    }
}

fn allocated_len(size: GridSize) -> usize {
    let len = u64::from(size.allocated_columns()) * u64::from(size.allocated_rows());
    usize::try_from(len).unwrap_or(0)
}

fn index_in(size: GridSize, cell: CellCoord) -> Option<usize> {
    if cell.x() < size.allocated_columns() && cell.y() < size.allocated_rows() {
        let column = usize::try_from(cell.x()).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        let rows = usize::try_from(size.allocated_rows()).ok()?;
        Some(column * rows + row)
    } else {
        None
    }
}

/// Query functions that provide read-only access to the universe.
pub mod query {
    use life_core::{CellCoord, GridSize};

    use super::GridState;

    /// Iterates the interior coordinates column by column.
    pub fn interior(size: GridSize) -> impl Iterator<Item = CellCoord> {
        let width = size.width();
        let height = size.height();
        (1..width).flat_map(move |x| (1..height).map(move |y| CellCoord::new(x, y)))
    }

    /// Counts the living interior cells.
    #[must_use]
    pub fn alive_count(grid: &GridState) -> u64 {
        interior(grid.size())
            .filter(|cell| grid.get(*cell).is_alive())
            .count() as u64
    }

    /// Counts the living cells in the 3x3 block around `cell`, excluding the cell itself.
    ///
    /// Coordinates outside the allocation count as dead.
    #[must_use]
    pub fn live_neighbours(grid: &GridState, cell: CellCoord) -> u8 {
        let mut count = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(neighbour) = cell.offset(dx, dy) {
                    count += grid.get(neighbour).bit();
                }
            }
        }
        count
    }
}
