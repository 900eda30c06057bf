#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Game of Life workspace.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative universe, and pure systems. Adapters submit [`Command`]
//! values to the driver, the driver advances the simulation engine, and the
//! engine broadcasts [`Event`] values that reporters and renderers consume.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Number of columns simulated when no configuration overrides it.
pub const DEFAULT_GRID_WIDTH: u32 = 600;

/// Number of rows simulated when no configuration overrides it.
pub const DEFAULT_GRID_HEIGHT: u32 = 300;

/// Side length in pixels of a single painted cell.
pub const DEFAULT_CELL_SIZE: u32 = 1;

/// Consecutive living generations after which a cell is painted as aged.
pub const AGE_THRESHOLD: u32 = 100;

/// Delay observed before the first generation computes its own pacing.
pub const INITIAL_DELAY: Delay = Delay::from_millis(100.0);

/// Commands that express every request an adapter may submit to the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Creates a fresh random universe and transitions to the running state.
    StartGame,
    /// Transitions to the stopped state and blanks the universe.
    StopGame,
    /// Advances the scheduler clock by the provided wall time.
    Tick {
        /// Duration that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast after the driver or engine changes state.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that both matrices were reallocated and zeroed.
    UniverseReset {
        /// Dimensions of the freshly allocated universe.
        size: GridSize,
    },
    /// Announces that the interior was filled with a random generation.
    UniverseRandomized {
        /// Number of interior cells that started alive.
        alive: u64,
    },
    /// Confirms that the driver entered the running state.
    GameStarted {
        /// Seed that produced the initial generation.
        seed: u64,
    },
    /// Reports the outcome of a completed simulation step.
    GenerationAdvanced {
        /// Generation counter after the step.
        generation: u64,
        /// Number of living cells in the new generation.
        alive: u64,
        /// Pause requested before the next step.
        delay: Delay,
    },
    /// Confirms that the driver entered the stopped state.
    GameStopped,
}

/// State of a single cell in the universe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    /// The cell is empty.
    #[default]
    Dead,
    /// The cell is populated.
    Alive,
}

impl CellState {
    /// Converts a binary value into a cell state; any non-zero value is alive.
    #[must_use]
    pub const fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Self::Dead
        } else {
            Self::Alive
        }
    }

    /// Binary representation used by neighbour counting: 1 for alive, 0 for dead.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Dead => 0,
            Self::Alive => 1,
        }
    }

    /// Reports whether the cell is populated.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Configured dimensions of the simulated universe.
///
/// Matrices are allocated one column and one row larger than these
/// dimensions. Coordinates `1..width` by `1..height` form the interior; the
/// remaining cells are a dead border that is read but never written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of configured columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of configured rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Product of the configured dimensions, used as the alive-fraction denominator.
    #[must_use]
    pub const fn total_cells(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Number of allocated columns including the border.
    #[must_use]
    pub const fn allocated_columns(&self) -> u32 {
        self.width.saturating_add(1)
    }

    /// Number of allocated rows including the border.
    #[must_use]
    pub const fn allocated_rows(&self) -> u32 {
        self.height.saturating_add(1)
    }

    /// Reports whether the coordinate lies inside the simulated interior.
    #[must_use]
    pub const fn is_interior(&self, cell: CellCoord) -> bool {
        cell.x >= 1 && cell.x < self.width && cell.y >= 1 && cell.y < self.height
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

/// Location of a single cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the coordinate shifted by the provided offsets.
    ///
    /// Returns `None` when the shift leaves the unsigned coordinate space.
    #[must_use]
    pub fn offset(&self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self { x, y })
    }
}

/// Pause between two generations measured in fractional milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Delay(f64);

impl Delay {
    /// Delay of zero milliseconds.
    pub const ZERO: Self = Self(0.0);

    /// Creates a delay from fractional milliseconds.
    #[must_use]
    pub const fn from_millis(millis: f64) -> Self {
        Self(millis)
    }

    /// Delay expressed in fractional milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> f64 {
        self.0
    }

    /// Converts the delay into a wall-clock duration.
    ///
    /// Negative or non-finite delays collapse to [`Duration::ZERO`].
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        if self.0.is_finite() && self.0 > 0.0 {
            Duration::from_secs_f64(self.0 / 1_000.0)
        } else {
            Duration::ZERO
        }
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Text pair surfaced to the UI reporter after every step and on stop.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatusReport {
    /// Generation counter rendered as text.
    pub generation: String,
    /// Delay in milliseconds rendered as text.
    pub delay_ms: String,
}

impl StatusReport {
    /// Builds the report emitted after a completed step; the delay is rounded to two decimals.
    #[must_use]
    pub fn from_generation(generation: u64, delay: Delay) -> Self {
        Self {
            generation: generation.to_string(),
            delay_ms: delay.to_string(),
        }
    }

    /// Builds the literal pair reported when the game stops.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            generation: "0".to_owned(),
            delay_ms: "0".to_owned(),
        }
    }

    /// Derives the report implied by an event, if the event carries one.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::GenerationAdvanced {
                generation, delay, ..
            } => Some(Self::from_generation(*generation, *delay)),
            Event::GameStopped => Some(Self::reset()),
            _ => None,
        }
    }
}
