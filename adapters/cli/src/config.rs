//! Command-line flags, the optional TOML file and the settings resolved from both.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use life_core::{GridSize, DEFAULT_CELL_SIZE, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
use life_system_driver::Config;
use life_world::patterns::{self, Pattern};
use serde::Deserialize;

/// Conway's Game of Life with age-shaded cells.
#[derive(Debug, Parser)]
#[command(name = "life", version)]
pub(crate) struct Args {
    /// TOML file providing `[grid]` and `[simulation]` settings.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Number of interior columns.
    #[arg(long)]
    pub(crate) width: Option<u32>,
    /// Number of interior rows.
    #[arg(long)]
    pub(crate) height: Option<u32>,
    /// Side length of a painted cell in pixels.
    #[arg(long)]
    pub(crate) cell_size: Option<u32>,
    /// Seed for the random initial generations.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Runs without a window, logging every generation.
    #[arg(long)]
    pub(crate) headless: bool,
    /// Stops a headless run after this many generations.
    #[arg(long)]
    pub(crate) generations: Option<u64>,
    /// Seeds each game with a named pattern (block, blinker, glider).
    #[arg(long, value_name = "NAME")]
    pub(crate) pattern: Option<String>,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) vsync: bool,
    /// Logs the frame rate once per second.
    #[arg(long)]
    pub(crate) show_fps: bool,
}

/// Contents of the optional configuration file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    grid: GridSection,
    simulation: SimulationSection,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct GridSection {
    width: Option<u32>,
    height: Option<u32>,
    cell_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct SimulationSection {
    seed: Option<u64>,
    generations: Option<u64>,
    pattern: Option<String>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Validated settings for a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) size: GridSize,
    pub(crate) cell_size: u32,
    pub(crate) seed: u64,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) generations: Option<u64>,
    pub(crate) headless: bool,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Layers defaults, the file and the flags, in that order of precedence.
    ///
    /// `fallback_seed` is consulted only when neither source names a seed.
    pub(crate) fn resolve<S>(args: &Args, file: FileConfig, fallback_seed: S) -> Result<Self>
    where
        S: FnOnce() -> u64,
    {
        let FileConfig { grid, simulation } = file;

        let width = args.width.or(grid.width).unwrap_or(DEFAULT_GRID_WIDTH);
        let height = args.height.or(grid.height).unwrap_or(DEFAULT_GRID_HEIGHT);
        let cell_size = args.cell_size.or(grid.cell_size).unwrap_or(DEFAULT_CELL_SIZE);
        if width == 0 || height == 0 {
            bail!("grid dimensions must be positive (received {width}x{height})");
        }
        if cell_size == 0 {
            bail!("cell size must be positive");
        }

        let generations = args.generations.or(simulation.generations);
        if generations == Some(0) {
            bail!("generation budget must be positive");
        }

        let pattern = match args.pattern.as_deref().or(simulation.pattern.as_deref()) {
            Some(name) => Some(lookup_pattern(name)?),
            None => None,
        };

        let seed = match args.seed.or(simulation.seed) {
            Some(seed) => seed,
            None => {
                let seed = fallback_seed();
                log::info!("no seed configured, using {seed:#x}");
                seed
            }
        };

        Ok(Self {
            size: GridSize::new(width, height),
            cell_size,
            seed,
            pattern,
            generations,
            headless: args.headless,
            vsync: args.vsync,
            show_fps: args.show_fps,
        })
    }

    /// Driver configuration derived from these settings.
    pub(crate) fn driver_config(&self) -> Config {
        Config::new(self.size, self.seed).with_pattern(self.pattern)
    }
}

fn lookup_pattern(name: &str) -> Result<Pattern> {
    match patterns::find(name) {
        Some(pattern) => Ok(pattern),
        None => {
            let known: Vec<&str> = patterns::PATTERNS.iter().map(Pattern::name).collect();
            bail!("unknown pattern `{name}` (expected one of {})", known.join(", "))
        }
    }
}
