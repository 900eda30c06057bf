//! Windowed mode: feeds frame input and wall time from the backend into the driver.

use std::time::Duration;

use anyhow::{Context, Result};
use life_core::{Command, Event};
use life_rendering::{FrameInput, Palette, Presentation, RenderingBackend, Scene};
use life_rendering_macroquad::MacroquadBackend;
use life_system_driver::{Driver, RunFlag, RunState};

use crate::config::Settings;

const WINDOW_TITLE: &str = "Game of Life";

/// Opens the window and runs until it is closed.
pub(crate) fn run(settings: &Settings) -> Result<()> {
    let mut driver = Driver::new(settings.driver_config(), RunFlag::new());
    let palette = Palette::default();
    let mut scene = Scene::new(settings.size, settings.cell_size, palette)
        .context("failed to allocate frame buffer")?;
    scene.repaint(driver.grid());

    let presentation = Presentation::new(WINDOW_TITLE, palette.background, scene);
    let mut events = Vec::new();

    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .run(presentation, move |dt, input, scene| {
            update_scene(&mut driver, scene, dt, input, &mut events);
        })
}

/// Commands issued for a single frame.
///
/// A stop requested on the same frame as a start wins.
fn frame_commands(dt: Duration, input: FrameInput) -> Vec<Command> {
    let mut commands = Vec::with_capacity(3);
    if input.start_requested {
        commands.push(Command::StartGame);
    }
    if input.stop_requested {
        commands.push(Command::StopGame);
    }
    commands.push(Command::Tick { dt });
    commands
}

fn update_scene(
    driver: &mut Driver,
    scene: &mut Scene,
    dt: Duration,
    input: FrameInput,
    events: &mut Vec<Event>,
) {
    events.clear();
    let mut changed = false;
    for command in frame_commands(dt, input) {
        changed |= driver.apply(command, events);
    }

    scene.record(events);
    if changed {
        scene.repaint(driver.grid());
    }
    scene.running = driver.state() == RunState::Running;
}
