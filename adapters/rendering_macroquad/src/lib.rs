#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the Game of Life.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The painted generation is uploaded as a nearest-filtered texture every
//! frame and scaled to fit the window next to a control panel. All
//! UI-specific calls live inside the local `ui` module to avoid leaking
//! Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::{Context, Result};
use glam::Vec2;
use life_rendering::{FrameInput, PixelBuffer, Presentation, RenderingBackend, Scene};
use macroquad::{
    color::WHITE,
    input::{is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
    texture::{DrawTextureParams, FilterMode, Image, Texture2D},
};
use std::time::Duration;

/// Width of the control panel docked to the right edge of the window.
const CONTROL_PANEL_WIDTH: f32 = 260.0;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    start_latched: bool,
    stop_latched: bool,
}

impl ControlPanelInputState {
    /// Returns whether the UI requested a start and clears the latch so the
    /// action fires only once.
    pub fn take_start(&mut self) -> bool {
        let latched = self.start_latched;
        self.start_latched = false;
        latched
    }

    /// Records that the Start button was pressed this frame.
    pub fn register_start(&mut self) {
        self.start_latched = true;
    }

    /// Returns whether the UI requested a stop and clears the latch so the
    /// action fires only once.
    pub fn take_stop(&mut self) -> bool {
        let latched = self.stop_latched;
        self.stop_latched = false;
        latched
    }

    /// Records that the Stop button was pressed this frame.
    pub fn register_stop(&mut self) {
        self.stop_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
    /// `S` or `Enter` starts a new game.
    start_requested: bool,
    /// `X` or `Space` stops the running game.
    stop_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            start_requested: is_key_pressed(KeyCode::S) || is_key_pressed(KeyCode::Enter),
            stop_requested: is_key_pressed(KeyCode::X) || is_key_pressed(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = if enabled { Some(1) } else { Some(0) };
        self
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average frames per second once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut image = frame_image(&scene.frame)?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 540,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let texture = Texture2D::from_image(&image);
            texture.set_filter(FilterMode::Nearest);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    start_requested: control_panel_input.take_start() || keyboard.start_requested,
                    stop_requested: control_panel_input.take_stop() || keyboard.stop_requested,
                };

                update_scene(frame_dt, frame_input, &mut scene);

                let frame = scene.frame.as_rgba_bytes();
                if frame.len() == image.bytes.len() {
                    image.bytes.copy_from_slice(frame);
                    texture.update(&image);
                }

                let layout = FrameLayout::fit(
                    Vec2::new(scene.frame.width() as f32, scene.frame.height() as f32),
                    Vec2::new(screen_width, screen_height),
                    CONTROL_PANEL_WIDTH,
                );
                macroquad::texture::draw_texture_ex(
                    texture,
                    layout.origin.x,
                    layout.origin.y,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(MacroquadVec2::new(layout.size.x, layout.size.y)),
                        ..DrawTextureParams::default()
                    },
                );

                let panel_left = (screen_width - CONTROL_PANEL_WIDTH).max(0.0);
                let mut control_panel_ui = macroquad::ui::root_ui();
                let ControlPanelUiResult {
                    start_pressed,
                    stop_pressed,
                } = draw_control_panel_ui(
                    &mut control_panel_ui,
                    ControlPanelUiContext {
                        origin: MacroquadVec2::new(panel_left, 0.0),
                        size: MacroquadVec2::new(CONTROL_PANEL_WIDTH, screen_height),
                        background: macroquad::color::Color::from_rgba(24, 24, 24, 255),
                        generation_text: scene.status.generation_text(),
                        delay_text: scene.status.delay_text(),
                        running: scene.running,
                    },
                );
                drop(control_panel_ui);
                if start_pressed {
                    control_panel_input.register_start();
                }
                if stop_pressed {
                    control_panel_input.register_stop();
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space placement of the painted frame.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameLayout {
    origin: Vec2,
    size: Vec2,
}

impl FrameLayout {
    /// Scales the frame uniformly to fit the screen area left of the control panel,
    /// centring it within that area.
    fn fit(frame: Vec2, screen: Vec2, panel_width: f32) -> Self {
        let available = Vec2::new((screen.x - panel_width).max(0.0), screen.y.max(0.0));
        if frame.x <= f32::EPSILON || frame.y <= f32::EPSILON {
            return Self {
                origin: Vec2::ZERO,
                size: Vec2::ZERO,
            };
        }

        let scale = (available.x / frame.x).min(available.y / frame.y);
        let size = frame * scale;
        let origin = ((available - size) * 0.5).max(Vec2::ZERO);
        Self { origin, size }
    }
}

fn frame_image(frame: &PixelBuffer) -> Result<Image> {
    let width = u16::try_from(frame.width())
        .with_context(|| format!("frame width {} exceeds texture limits", frame.width()))?;
    let height = u16::try_from(frame.height())
        .with_context(|| format!("frame height {} exceeds texture limits", frame.height()))?;
    Ok(Image {
        bytes: frame.as_rgba_bytes().to_vec(),
        width,
        height,
    })
}

fn to_macroquad_color(color: life_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
