//! Well-known seed shapes used to prime the universe deterministically.

use life_core::{CellCoord, CellState, GridSize};

use crate::GridState;

/// Named set of live cells expressed as offsets from the pattern's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    name: &'static str,
    cells: &'static [(u32, u32)],
}

impl Pattern {
    /// Name used to select the pattern from configuration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Offsets of the living cells.
    #[must_use]
    pub const fn cells(&self) -> &'static [(u32, u32)] {
        self.cells
    }

    /// Bounding box of the pattern as `(columns, rows)`.
    #[must_use]
    pub fn extent(&self) -> (u32, u32) {
        self.cells
            .iter()
            .fold((0, 0), |(width, height), (x, y)| {
                (width.max(x + 1), height.max(y + 1))
            })
    }
}

/// 2x2 still life; every cell has three living neighbours.
pub const BLOCK: Pattern = Pattern {
    name: "block",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

/// Period-two oscillator laid out as a horizontal row of three cells.
pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(0, 0), (1, 0), (2, 0)],
};

/// Smallest spaceship; travels one cell diagonally every four generations.
pub const GLIDER: Pattern = Pattern {
    name: "glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

/// Every pattern that can be selected by name.
pub const PATTERNS: [Pattern; 3] = [BLOCK, BLINKER, GLIDER];

/// Looks up a pattern by its case-insensitive name.
#[must_use]
pub fn find(name: &str) -> Option<Pattern> {
    PATTERNS
        .iter()
        .copied()
        .find(|pattern| pattern.name.eq_ignore_ascii_case(name))
}

/// Origin that centres the pattern within the interior.
#[must_use]
pub fn centered_origin(size: GridSize, pattern: &Pattern) -> CellCoord {
    let (columns, rows) = pattern.extent();
    let x = (size.width().saturating_sub(columns) / 2).max(1);
    let y = (size.height().saturating_sub(rows) / 2).max(1);
    CellCoord::new(x, y)
}

/// Brings the pattern's cells to life relative to `origin`.
///
/// Cells that would land outside the interior are skipped. Returns the number
/// of cells that were placed.
pub fn place(grid: &mut GridState, pattern: &Pattern, origin: CellCoord) -> usize {
    pattern
        .cells
        .iter()
        .filter_map(|(dx, dy)| {
            let x = origin.x().checked_add(*dx)?;
            let y = origin.y().checked_add(*dy)?;
            Some(CellCoord::new(x, y))
        })
        .filter(|cell| grid.set(*cell, CellState::Alive))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query;

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find("Glider"), Some(GLIDER));
        assert_eq!(find("BLINKER"), Some(BLINKER));
        assert!(find("pulsar").is_none());
    }

    #[test]
    fn centered_pattern_fits_interior() {
        let size = GridSize::new(10, 10);
        let mut grid = GridState::new(size);
        let origin = centered_origin(size, &GLIDER);

        assert_eq!(origin, CellCoord::new(3, 3));
        assert_eq!(place(&mut grid, &GLIDER, origin), 5);
        assert_eq!(query::alive_count(&grid), 5);
    }

    #[test]
    fn place_skips_cells_outside_interior() {
        let mut grid = GridState::new(GridSize::new(4, 4));

        let placed = place(&mut grid, &BLINKER, CellCoord::new(2, 2));

        assert_eq!(placed, 2);
    }
}
