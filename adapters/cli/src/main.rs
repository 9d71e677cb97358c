#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Grid Chase headlessly in the terminal.
//!
//! Frames are drawn as text after every tick. Direction keys come from a
//! scripted list of key codes, one per tick, so runs are fully reproducible
//! for a given seed.

mod config;
mod layout_transfer;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use grid_chase_core::{Layout, WELCOME_BANNER};
use grid_chase_rendering::{RenderingBackend, TextBackend};
use grid_chase_session::{Session, SessionConfig};
use grid_chase_system_input::direction_for_code;
use grid_chase_system_level_generation::LevelGenerator;
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{config::ConfigFile, layout_transfer::LayoutSnapshot};

/// Headless Grid Chase autoplay.
#[derive(Debug, Parser)]
#[command(name = "grid-chase", version, about)]
struct CliArgs {
    /// Edge length of the square grid.
    #[arg(long)]
    size: Option<u32>,
    /// Milliseconds between two ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,
    /// Seed for level generation and adversary movement.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many ticks.
    #[arg(long = "max-ticks")]
    max_ticks: Option<u64>,
    /// Comma separated key codes fed one per tick (37-40 arrows, WASD).
    #[arg(long, value_delimiter = ',')]
    inputs: Vec<u32>,
    /// TOML file with default settings; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Play a layout string exported earlier instead of generating one.
    #[arg(long)]
    layout: Option<String>,
    /// Print the layout string for the configured level and exit.
    #[arg(long = "export-layout")]
    export_layout: bool,
}

impl CliArgs {
    fn apply(&self, base: SessionConfig) -> SessionConfig {
        SessionConfig {
            grid_size: self.size.unwrap_or(base.grid_size),
            refresh_rate: self
                .tick_ms
                .map_or(base.refresh_rate, Duration::from_millis),
            seed: self.seed.unwrap_or(base.seed),
            level: base.level,
        }
    }
}

/// Entry point for the Grid Chase command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let mut config = args.apply(file.apply(SessionConfig::default()));
    let max_ticks = args.max_ticks.or(file.max_ticks);

    let imported = args
        .layout
        .as_deref()
        .map(LayoutSnapshot::decode)
        .transpose()
        .context("failed to import layout")?;
    if let Some(snapshot) = &imported {
        config.grid_size = snapshot.size;
    }

    if args.export_layout {
        let layout = match imported {
            Some(snapshot) => snapshot.layout,
            None => generate_layout(&config)?,
        };
        let snapshot = LayoutSnapshot {
            size: config.grid_size,
            layout,
        };
        println!("{}", snapshot.encode().context("failed to export layout")?);
        return Ok(());
    }

    let mut session = match &imported {
        Some(snapshot) => Session::from_layout(config, &snapshot.layout),
        None => Session::new(config),
    }
    .context("failed to set up session")?;

    println!("{WELCOME_BANNER}");
    let mut backend = TextBackend::new(io::stdout().lock());
    backend.present(&session.frame())?;

    for code in args.inputs.iter().filter(|code| direction_for_code(**code).is_none()) {
        warn!("key code {code} does not map to a direction and will be ignored");
    }

    let handle = session.handle();
    let mut script = args.inputs.into_iter();
    if let Some(code) = script.next() {
        handle.send_input(code)?;
    }
    let _ = session.start().context("failed to start session")?;

    let mut failure = None;
    session.run(|frame, _| {
        if failure.is_some() {
            return;
        }
        if let Err(error) = backend.present(frame) {
            failure = Some(error);
            let _ = handle.stop();
            return;
        }
        if max_ticks.is_some_and(|max| frame.tick >= max) {
            let _ = handle.stop();
            return;
        }
        if let Some(code) = script.next() {
            let _ = handle.send_input(code);
        }
    })?;
    if let Some(error) = failure {
        return Err(error);
    }

    let frame = session.frame();
    info!(
        "session ended after {} ticks with score {} ({:?})",
        frame.tick, frame.score, frame.status
    );
    Ok(())
}

fn generate_layout(config: &SessionConfig) -> Result<Layout> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    LevelGenerator::new(config.level)
        .generate(config.grid_size, &mut rng)
        .context("failed to generate level")
}
