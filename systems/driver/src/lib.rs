#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Driver that owns the start/stop state machine and paces the engine.
//!
//! The running state lives in a [`RunFlag`] that is injected into the driver
//! and may be shared with whoever issues stop requests. The flag is checked
//! before every scheduled step, so a stop lands after at most one step that
//! is already in flight. Adapters either feed wall time through
//! [`Command::Tick`] from a frame loop, or hand the driver to [`run_blocking`]
//! which sleeps between steps.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use life_core::{Command, Event, GridSize};
use life_system_simulation::SimulationEngine;
use life_world::{patterns, GridState};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Shared switch between the scheduling loop and external stop requests.
#[derive(Clone, Debug, Default)]
pub struct RunFlag {
    running: Arc<AtomicBool>,
}

impl RunFlag {
    /// Creates a flag in the stopped position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the loop should keep scheduling steps.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Asks the loop to stop before its next scheduled step.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    fn set_running(&self) {
        self.running.store(true, Ordering::Release);
    }
}

/// Observable position of the driver state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No steps are scheduled.
    Stopped,
    /// Steps are scheduled after every delay.
    Running,
}

/// Configuration parameters required to construct the driver.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    size: GridSize,
    seed: u64,
    pattern: Option<patterns::Pattern>,
}

impl Config {
    /// Creates a configuration for the provided universe size and seed.
    #[must_use]
    pub const fn new(size: GridSize, seed: u64) -> Self {
        Self {
            size,
            seed,
            pattern: None,
        }
    }

    /// Seeds every new game with a centred pattern instead of random cells.
    #[must_use]
    pub fn with_pattern(mut self, pattern: Option<patterns::Pattern>) -> Self {
        self.pattern = pattern;
        self
    }

    /// Dimensions of every universe created by the driver.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }
}

/// Owns the engine and translates commands into engine operations.
#[derive(Debug)]
pub struct Driver {
    config: Config,
    engine: SimulationEngine,
    flag: RunFlag,
    seeds: ChaCha8Rng,
    until_next_step: Duration,
}

impl Driver {
    /// Creates a stopped driver holding a dead universe.
    #[must_use]
    pub fn new(config: Config, flag: RunFlag) -> Self {
        flag.request_stop();
        Self {
            engine: SimulationEngine::new(config.size),
            seeds: ChaCha8Rng::seed_from_u64(config.seed),
            until_next_step: Duration::ZERO,
            config,
            flag,
        }
    }

    /// Returns a handle to the injected run flag.
    #[must_use]
    pub fn run_flag(&self) -> RunFlag {
        self.flag.clone()
    }

    /// Current position of the state machine.
    #[must_use]
    pub fn state(&self) -> RunState {
        if self.flag.is_running() {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    /// Engine driving the current game.
    #[must_use]
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Generation that renderers should present.
    #[must_use]
    pub fn grid(&self) -> &GridState {
        self.engine.grid()
    }

    /// Applies an adapter command.
    ///
    /// Returns `true` when the universe changed and needs repainting.
    pub fn apply(&mut self, command: Command, out: &mut Vec<Event>) -> bool {
        match command {
            Command::StartGame => {
                self.start_game(out);
                true
            }
            Command::StopGame => {
                self.stop_game(out);
                true
            }
            Command::Tick { dt } => self.tick(dt, out),
        }
    }

    /// Creates a fresh universe, seeds it and enters the running state.
    ///
    /// Starting while already running abandons the current game. The first
    /// step is due immediately.
    pub fn start_game(&mut self, out: &mut Vec<Event>) {
        let seed = self.seeds.next_u64();
        let mut engine = SimulationEngine::new(self.config.size);

        match self.config.pattern {
            Some(pattern) => {
                engine.reset_universe(out);
                let origin = patterns::centered_origin(self.config.size, &pattern);
                let placed = patterns::place(engine.grid_mut(), &pattern, origin);
                log::debug!("placed {placed} cells of {}", pattern.name());
            }
            None => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                engine.create_initial_generation(&mut rng, out);
            }
        }

        self.engine = engine;
        self.until_next_step = Duration::ZERO;
        self.flag.set_running();
        log::info!("game started with seed {seed:#x}");
        out.push(Event::GameStarted { seed });
    }

    /// Leaves the running state and replaces the engine with a dead universe.
    ///
    /// The generation counter and delay of the abandoned game are discarded
    /// together with its engine.
    pub fn stop_game(&mut self, out: &mut Vec<Event>) {
        self.flag.request_stop();
        let finished_at = self.engine.generation();

        let mut engine = SimulationEngine::new(self.config.size);
        engine.reset_universe(out);
        self.engine = engine;
        self.until_next_step = Duration::ZERO;

        log::info!("game stopped after {finished_at} generations");
        out.push(Event::GameStopped);
    }

    /// Advances the scheduler clock, stepping once when the delay has elapsed.
    ///
    /// Returns `true` when a step ran.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) -> bool {
        if !self.flag.is_running() {
            return false;
        }

        if self.until_next_step > dt {
            self.until_next_step -= dt;
            return false;
        }

        self.step(out);
        true
    }

    fn step(&mut self, out: &mut Vec<Event>) {
        let _ = self.engine.step(out);
        self.until_next_step = self.engine.current_delay().as_duration();
        log::debug!(
            "generation {} done, next step in {:?}",
            self.engine.generation(),
            self.until_next_step
        );
    }
}

/// Suspends the blocking loop between generations.
pub trait Pacer {
    /// Blocks for the provided duration.
    fn wait(&mut self, delay: Duration);
}

/// Pacer that sleeps the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Steps the running driver until its run flag is cleared.
///
/// The flag is checked before each step; after each step `on_generation`
/// receives the new generation with the events it produced and the pacer
/// waits for the engine's current delay. The driver is left in whatever
/// state the flag describes; callers decide whether to follow with
/// [`Driver::stop_game`]. Returns the number of steps taken.
pub fn run_blocking<P, F>(driver: &mut Driver, pacer: &mut P, mut on_generation: F) -> u64
where
    P: Pacer + ?Sized,
    F: FnMut(&GridState, &[Event]),
{
    let mut steps = 0;
    let mut events = Vec::new();

    while driver.flag.is_running() {
        events.clear();
        driver.step(&mut events);
        steps += 1;
        on_generation(driver.grid(), &events);
        pacer.wait(driver.until_next_step);
    }

    steps
}
