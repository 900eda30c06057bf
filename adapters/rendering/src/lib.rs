#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Game of Life adapters.
//!
//! Generations are painted onto a [`Surface`], one square per interior cell,
//! using a three-colour [`Palette`]. Backends receive a [`Scene`] whose pixel
//! buffer has already been painted and whose [`StatusPanel`] carries the text
//! shown to the player.

use anyhow::Result as AnyResult;
use glam::UVec2;
use life_core::{CellCoord, CellState, Event, GridSize, StatusReport, AGE_THRESHOLD};
use life_world::{query, GridState};
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Quantises the color into RGBA bytes.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
            channel_to_u8(self.alpha),
        ]
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// The three fixed colors used to paint a generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Color of dead cells.
    pub background: Color,
    /// Color of living cells whose age does not exceed [`AGE_THRESHOLD`].
    pub live: Color,
    /// Color of living cells older than [`AGE_THRESHOLD`].
    pub aged: Color,
}

impl Palette {
    /// Picks the color for a cell of the given state and age.
    #[must_use]
    pub fn shade(&self, state: CellState, age: u32) -> Color {
        match state {
            CellState::Dead => self.background,
            CellState::Alive if age > AGE_THRESHOLD => self.aged,
            CellState::Alive => self.live,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x00, 0x00, 0x00),
            live: Color::from_rgb_u8(0x00, 0xff, 0x00),
            aged: Color::from_rgb_u8(0xff, 0x00, 0xff),
        }
    }
}

/// Retained drawing target that accepts filled rectangles.
pub trait Surface {
    /// Fills an axis-aligned rectangle; pixels outside the surface are clipped.
    fn fill_rect(&mut self, origin: UVec2, size: UVec2, color: Color);
}

/// Pixel position of the top-left corner of a cell.
#[must_use]
pub fn cell_origin(cell: CellCoord, cell_size: u32) -> UVec2 {
    UVec2::new(
        cell.x().saturating_mul(cell_size),
        cell.y().saturating_mul(cell_size),
    )
}

/// Paints every interior cell of the generation onto the surface.
pub fn paint_generation<S>(surface: &mut S, grid: &GridState, palette: &Palette, cell_size: u32)
where
    S: Surface + ?Sized,
{
    let extent = UVec2::splat(cell_size);
    for cell in query::interior(grid.size()) {
        let color = palette.shade(grid.get(cell), grid.age(cell));
        surface.fill_rect(cell_origin(cell, cell_size), extent, color);
    }
}

/// In-memory RGBA8 surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a transparent black buffer of the provided size.
    ///
    /// Returns an error when either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptySurface { width, height });
        }
        let len = u64::from(width) * u64::from(height) * 4;
        let len = usize::try_from(len).map_err(|_| RenderingError::EmptySurface { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Creates a buffer large enough to hold every allocated cell of the grid.
    ///
    /// Returns an error when `cell_size` is zero.
    pub fn for_grid(size: GridSize, cell_size: u32) -> Result<Self, RenderingError> {
        if cell_size == 0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        Self::new(
            size.allocated_columns().saturating_mul(cell_size),
            size.allocated_rows().saturating_mul(cell_size),
        )
    }

    /// Width of the buffer in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the buffer in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw row-major RGBA8 bytes.
    #[must_use]
    pub fn as_rgba_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Reads a single pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let bytes = self.pixels.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Overwrites every pixel with the provided color.
    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = usize::try_from(y).ok()?;
        let column = usize::try_from(x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some((row * width + column) * 4)
    }
}

impl Surface for PixelBuffer {
    fn fill_rect(&mut self, origin: UVec2, size: UVec2, color: Color) {
        let rgba = color.to_rgba8();
        let end_x = origin.x.saturating_add(size.x).min(self.width);
        let end_y = origin.y.saturating_add(size.y).min(self.height);
        for y in origin.y..end_y {
            for x in origin.x..end_x {
                if let Some(offset) = self.offset(x, y) {
                    self.pixels[offset..offset + 4].copy_from_slice(&rgba);
                }
            }
        }
    }
}

/// Text shown by the UI reporter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusPanel {
    report: StatusReport,
    delay_unit: &'static str,
}

impl StatusPanel {
    /// Updates the panel from an engine or driver event.
    ///
    /// Events that carry no status leave the panel untouched.
    pub fn apply(&mut self, event: &Event) {
        let Some(report) = StatusReport::from_event(event) else {
            return;
        };
        self.delay_unit = match event {
            Event::GenerationAdvanced { .. } => "ms",
            _ => "",
        };
        self.report = report;
    }

    /// Report currently on display.
    #[must_use]
    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    /// Label describing the generation counter.
    #[must_use]
    pub fn generation_text(&self) -> String {
        format!("Generation: {}", self.report.generation)
    }

    /// Label describing the delay between generations.
    #[must_use]
    pub fn delay_text(&self) -> String {
        format!(
            "Time Between Generations: {}{}",
            self.report.delay_ms, self.delay_unit
        )
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self {
            report: StatusReport::reset(),
            delay_unit: "",
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Whether the player asked to start a new game on this frame.
    pub start_requested: bool,
    /// Whether the player asked to stop the game on this frame.
    pub stop_requested: bool,
}

/// Scene description combining the painted generation and the status text.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Dimensions of the simulated universe.
    pub grid_size: GridSize,
    /// Side length of a painted cell in pixels.
    pub cell_size: u32,
    /// Colors used when painting cells.
    pub palette: Palette,
    /// Most recently painted generation.
    pub frame: PixelBuffer,
    /// Generation and delay labels.
    pub status: StatusPanel,
    /// Whether the driver is currently running.
    pub running: bool,
}

impl Scene {
    /// Creates a scene holding a blank frame for the provided grid.
    ///
    /// Returns an error when `cell_size` is zero.
    pub fn new(
        grid_size: GridSize,
        cell_size: u32,
        palette: Palette,
    ) -> Result<Self, RenderingError> {
        let mut frame = PixelBuffer::for_grid(grid_size, cell_size)?;
        frame.clear(palette.background);
        Ok(Self {
            grid_size,
            cell_size,
            palette,
            frame,
            status: StatusPanel::default(),
            running: false,
        })
    }

    /// Paints the provided generation into the frame.
    pub fn repaint(&mut self, grid: &GridState) {
        paint_generation(&mut self.frame, grid, &self.palette, self.cell_size);
    }

    /// Feeds events into the status panel.
    pub fn record(&mut self, events: &[Event]) {
        for event in events {
            self.status.apply(event);
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Game of Life scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the wall time elapsed
    /// since the previous frame and the input captured by the adapter, and
    /// may repaint the scene before it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Cells must cover at least one pixel.
    #[error("cell_size must be positive (received {cell_size})")]
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: u32,
    },
    /// Surfaces must contain at least one pixel.
    #[error("surface must have a positive area (received {width}x{height})")]
    EmptySurface {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}
