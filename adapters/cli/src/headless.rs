//! Windowless mode: runs the blocking loop and logs every generation.

use std::time::Duration;

use anyhow::{Context, Result};
use life_rendering::{Palette, Scene};
use life_system_driver::{run_blocking, Driver, Pacer, RunFlag, ThreadPacer};

use crate::config::Settings;

/// Pacer that stops the loop once a fixed number of generations has run.
#[derive(Debug)]
struct GenerationBudget<P> {
    inner: P,
    flag: RunFlag,
    remaining: Option<u64>,
}

impl<P> GenerationBudget<P> {
    fn new(inner: P, flag: RunFlag, limit: Option<u64>) -> Self {
        Self {
            inner,
            flag,
            remaining: limit,
        }
    }
}

impl<P: Pacer> Pacer for GenerationBudget<P> {
    fn wait(&mut self, delay: Duration) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.flag.request_stop();
                return;
            }
        }
        self.inner.wait(delay);
    }
}

/// Runs a headless game until the generation budget is spent or Ctrl+C is pressed.
pub(crate) fn run(settings: &Settings) -> Result<()> {
    let flag = RunFlag::new();
    let mut driver = Driver::new(settings.driver_config(), flag.clone());
    let mut scene = Scene::new(settings.size, settings.cell_size, Palette::default())
        .context("failed to allocate frame buffer")?;

    let interrupt = flag.clone();
    ctrlc::set_handler(move || {
        log::info!("interrupt received, stopping after the current generation");
        interrupt.request_stop();
    })
    .context("failed to install Ctrl+C handler")?;

    let mut pacer = GenerationBudget::new(ThreadPacer, flag, settings.generations);
    let steps = run_session(&mut driver, &mut scene, &mut pacer);
    log::info!("headless run finished after {steps} generations");
    Ok(())
}

/// Starts a game, steps it until the run flag clears, then stops it.
///
/// Returns the number of generations computed.
fn run_session<P>(driver: &mut Driver, scene: &mut Scene, pacer: &mut P) -> u64
where
    P: Pacer + ?Sized,
{
    let mut events = Vec::new();
    driver.start_game(&mut events);
    scene.record(&events);
    scene.repaint(driver.grid());
    scene.running = true;

    let steps = run_blocking(driver, pacer, |grid, generated| {
        scene.record(generated);
        scene.repaint(grid);
        log::info!(
            "{} | {}",
            scene.status.generation_text(),
            scene.status.delay_text()
        );
    });

    events.clear();
    driver.stop_game(&mut events);
    scene.record(&events);
    scene.repaint(driver.grid());
    scene.running = false;
    log::debug!(
        "{} | {}",
        scene.status.generation_text(),
        scene.status.delay_text()
    );

    steps
}
