#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level generation system producing the initial placements of a session.
//!
//! Walls and the player start depend only on the grid size. Adversaries,
//! energizers and food are scattered across the remaining interior cells using
//! the supplied random source, so equal seeds always yield equal layouts.

use grid_chase_core::{
    AdversarySpawn, CellCoord, Direction, Layout, LevelConfig, PlayerSpawn, SetupError,
};
use log::debug;
use rand::{seq::SliceRandom, Rng};

/// Smallest grid that leaves an interior cell for the player.
const MIN_GRID_SIZE: u32 = 3;

/// Adversaries prefer cells farther than this many steps from the player start.
const SAFE_RADIUS: u32 = 2;

/// Pure system that turns entity counts into a [`Layout`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelGenerator {
    config: LevelConfig,
}

impl LevelGenerator {
    /// Creates a generator that places the entity counts from `config`.
    #[must_use]
    pub const fn new(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Entity counts this generator places.
    #[must_use]
    pub const fn config(&self) -> LevelConfig {
        self.config
    }

    /// Generates a level for a `size`×`size` grid.
    ///
    /// Every placement lands on a distinct in-bounds cell; the walls and the
    /// player start never receive any other entity.
    pub fn generate<R>(&self, size: u32, rng: &mut R) -> Result<Layout, SetupError>
    where
        R: Rng + ?Sized,
    {
        // Overflowing counts saturate and fail the capacity check below.
        let required = self
            .config
            .adversaries
            .checked_add(self.config.energizers)
            .and_then(|sum| sum.checked_add(self.config.food.unwrap_or(0)))
            .unwrap_or(usize::MAX);

        if size == 0 {
            return Err(SetupError::InvalidSize { size });
        }
        if size < MIN_GRID_SIZE {
            return Err(SetupError::UnsatisfiableLayout {
                size,
                required: required.saturating_add(1),
                available: 0,
            });
        }

        let walls = wall_pattern(size);
        let player = player_start(size);

        let mut open: Vec<CellCoord> = interior(size)
            .filter(|cell| !is_pattern_wall(*cell, size) && *cell != player.cell)
            .collect();
        if required > open.len() {
            return Err(SetupError::UnsatisfiableLayout {
                size,
                required,
                available: open.len(),
            });
        }

        open.shuffle(rng);
        // Stable partition keeps the shuffled order inside each group.
        let (mut far, near): (Vec<_>, Vec<_>) = open
            .into_iter()
            .partition(|cell| cell.manhattan_distance(player.cell) > SAFE_RADIUS);
        far.extend(near);
        let mut remaining = far.into_iter();

        let adversaries: Vec<AdversarySpawn> = remaining
            .by_ref()
            .take(self.config.adversaries)
            .map(|cell| AdversarySpawn {
                cell,
                facing: Direction::ALL[rng.gen_range(0..Direction::ALL.len())],
            })
            .collect();

        let mut energizers: Vec<CellCoord> =
            remaining.by_ref().take(self.config.energizers).collect();
        energizers.sort_by_key(|cell| (cell.row(), cell.column()));

        let mut food: Vec<CellCoord> = match self.config.food {
            Some(count) => remaining.take(count).collect(),
            None => remaining.collect(),
        };
        food.sort_by_key(|cell| (cell.row(), cell.column()));

        debug!(
            "generated {size}x{size} level: {} walls, {} adversaries, {} energizers, {} food",
            walls.len(),
            adversaries.len(),
            energizers.len(),
            food.len()
        );

        Ok(Layout {
            walls,
            food,
            energizers,
            adversaries,
            player,
        })
    }
}

/// Wall cells for a `size`×`size` grid in row-major order.
///
/// The pattern is the perimeter ring plus a pillar on every interior cell
/// whose column and row are both even.
#[must_use]
pub fn wall_pattern(size: u32) -> Vec<CellCoord> {
    (0..size)
        .flat_map(|row| (0..size).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| is_pattern_wall(*cell, size))
        .collect()
}

/// Fixed player start: column 1 of the middle row, facing right.
#[must_use]
pub const fn player_start(size: u32) -> PlayerSpawn {
    PlayerSpawn {
        cell: CellCoord::new(1, size / 2),
        facing: Direction::Right,
    }
}

fn is_pattern_wall(cell: CellCoord, size: u32) -> bool {
    let last = size.saturating_sub(1);
    let (column, row) = (cell.column(), cell.row());
    let perimeter = column == 0 || row == 0 || column == last || row == last;
    perimeter || (column % 2 == 0 && row % 2 == 0)
}

fn interior(size: u32) -> impl Iterator<Item = CellCoord> {
    let inner = 1..size.saturating_sub(1);
    inner
        .clone()
        .flat_map(move |row| inner.clone().map(move |column| CellCoord::new(column, row)))
}
