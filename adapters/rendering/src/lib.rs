#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Chase adapters.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use grid_chase_core::{Direction, EntityKind, Frame, Outcome, SessionStatus};

/// Characters used to draw each kind of cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Empty cell.
    pub free: char,
    /// Wall cell.
    pub wall: char,
    /// Food cell.
    pub food: char,
    /// Energizer cell.
    pub energizer: char,
    /// Adversary cell.
    pub adversary: char,
}

impl Palette {
    /// Glyph for a non-player cell kind.
    ///
    /// The player is drawn by [`player_glyph`] because its glyph depends on
    /// facing; passing [`EntityKind::PlayerActor`] here yields `'@'`.
    #[must_use]
    pub const fn glyph(&self, kind: EntityKind) -> char {
        match kind {
            EntityKind::Free => self.free,
            EntityKind::Wall => self.wall,
            EntityKind::Food => self.food,
            EntityKind::Energizer => self.energizer,
            EntityKind::Adversary => self.adversary,
            EntityKind::PlayerActor => '@',
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            free: ' ',
            wall: '#',
            food: '.',
            energizer: 'o',
            adversary: 'G',
        }
    }
}

/// Glyph of the player actor, pointing the way it faces.
#[must_use]
pub const fn player_glyph(facing: Direction) -> char {
    match facing {
        Direction::Up => '^',
        Direction::Right => '>',
        Direction::Down => 'v',
        Direction::Left => '<',
    }
}

/// Draws the grid of `frame` as one text line per row.
#[must_use]
pub fn render_grid(frame: &Frame, palette: &Palette) -> String {
    let mut out = String::with_capacity(frame.cells.len() + frame.size as usize);
    for row in frame.rows() {
        for kind in row {
            let glyph = match kind {
                EntityKind::PlayerActor => player_glyph(frame.player.facing),
                other => palette.glyph(*other),
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Single summary line describing tick, score and status.
#[must_use]
pub fn status_line(frame: &Frame) -> String {
    let state = match (frame.status, frame.outcome) {
        (SessionStatus::Finished, Some(Outcome::Caught { by })) => {
            format!("caught by adversary {}", by.get())
        }
        (SessionStatus::Finished, Some(Outcome::Faulted(fault))) => format!("aborted: {fault}"),
        (status, _) => format!("{status:?}").to_lowercase(),
    };
    format!("tick {:>4}  score {:>4}  {state}", frame.tick, frame.score)
}

/// Full text projection of a frame: the grid followed by the status line.
#[must_use]
pub fn render_text(frame: &Frame) -> String {
    let mut out = render_grid(frame, &Palette::default());
    out.push_str(&status_line(frame));
    out.push('\n');
    out
}

/// Rendering backend capable of presenting Grid Chase frames.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Backend that writes text frames to any [`Write`] sink.
#[derive(Debug)]
pub struct TextBackend<W> {
    sink: W,
    palette: Palette,
    frames: u64,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend drawing with the default palette.
    pub fn new(sink: W) -> Self {
        Self::with_palette(sink, Palette::default())
    }

    /// Creates a backend drawing with a custom palette.
    pub fn with_palette(sink: W, palette: Palette) -> Self {
        Self {
            sink,
            palette,
            frames: 0,
        }
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Releases the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        let grid = render_grid(frame, &self.palette);
        write!(self.sink, "{grid}{}\n\n", status_line(frame))
            .and_then(|()| self.sink.flush())
            .with_context(|| format!("failed to present frame for tick {}", frame.tick))?;
        self.frames += 1;
        Ok(())
    }
}
