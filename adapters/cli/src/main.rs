#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Game of Life.

mod config;
mod headless;
mod windowed;

use anyhow::Result;
use clap::Parser;
use rand::RngCore;

use crate::config::{Args, FileConfig, Settings};

/// Entry point for the Game of Life command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let file = match args.config.as_deref() {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(&args, file, || rand::thread_rng().next_u64())?;
    log::info!(
        "universe {}x{} at {}px per cell",
        settings.size.width(),
        settings.size.height(),
        settings.cell_size
    );

    if settings.headless {
        headless::run(&settings)
    } else {
        windowed::run(&settings)
    }
}
