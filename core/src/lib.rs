#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! changed. Read-only [`Frame`] snapshots carry the state handed to rendering
//! collaborators after every tick.

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Chase.";

/// Grid edge length used when no explicit size is configured.
pub const DEFAULT_GRID_SIZE: u32 = 10;

/// Interval between two scheduled ticks when no explicit rate is configured.
pub const DEFAULT_REFRESH_RATE: Duration = Duration::from_millis(200);

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves a session that has not started yet into the running state.
    Start,
    /// Suspends tick advancement of a running session.
    Pause,
    /// Re-enables tick advancement of a paused session.
    Resume,
    /// Advances the simulation by one discrete step.
    Tick {
        /// Direction most recently requested by the input handler, if any.
        pending: Option<Direction>,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Session status moved between two states.
    StatusChanged {
        /// Status before the transition.
        from: SessionStatus,
        /// Status after the transition.
        to: SessionStatus,
    },
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// One-based index of the tick that was just processed.
        tick: u64,
    },
    /// Confirms that an adversary moved between two cells.
    AdversaryMoved {
        /// Identifier of the adversary that moved.
        adversary: AdversaryId,
        /// Cell the adversary occupied before moving.
        from: CellCoord,
        /// Cell the adversary occupies after moving.
        to: CellCoord,
    },
    /// Player facing changed in response to a pending direction.
    PlayerTurned {
        /// Facing before the change.
        from: Direction,
        /// Facing after the change.
        to: Direction,
    },
    /// Confirms that the player actor moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Reports that the cell ahead of the player was a wall or off the grid.
    PlayerBlocked {
        /// Cell the player remains on.
        cell: CellCoord,
        /// Facing that pointed at the blocked cell.
        facing: Direction,
    },
    /// Player consumed a food item.
    FoodEaten {
        /// Cell that held the food.
        cell: CellCoord,
        /// Score after the food was counted.
        score: u64,
    },
    /// Player consumed an energizer. The energizer carries no further effect.
    EnergizerConsumed {
        /// Cell that held the energizer.
        cell: CellCoord,
    },
    /// The session reached its terminal state.
    SessionFinished {
        /// Reason the session ended.
        outcome: Outcome,
        /// Final accumulated score.
        score: u64,
    },
}

/// Lifecycle of a single play-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Level is loaded but ticks have not been enabled yet.
    NotStarted,
    /// Ticks advance the simulation.
    Running,
    /// The session ended; ticks are ignored.
    Finished,
    /// Ticks are ignored until the session resumes.
    Paused,
}

/// Reason a session reached [`SessionStatus::Finished`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The player actor and an adversary met on the same cell.
    Caught {
        /// Adversary responsible for the capture.
        by: AdversaryId,
    },
    /// An internal fault aborted the tick loop.
    Faulted(TickFault),
}

/// Cardinal movement directions, listed in neighbour enumeration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// Every direction in the fixed order used for neighbour enumeration.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Derives the direction of a single orthogonal step between two cells.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| from.step(*direction) == Some(to))
    }
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell (the `x` axis).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell (the `y` axis).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell one unit away along `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant. The
    /// result is not checked against any grid size.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (column, row) = match direction {
            Direction::Up => (Some(self.column), self.row.checked_sub(1)),
            Direction::Right => (self.column.checked_add(1), Some(self.row)),
            Direction::Down => (Some(self.column), self.row.checked_add(1)),
            Direction::Left => (self.column.checked_sub(1), Some(self.row)),
        };
        Some(Self::new(column?, row?))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Content stored in a single grid cell. Exactly one kind occupies every cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// Empty, traversable cell.
    Free = 0,
    /// Immutable obstacle.
    Wall = 1,
    /// Collectible worth one point.
    Food = 2,
    /// Power item; consumed like free space.
    Energizer = 3,
    /// Roaming adversary.
    Adversary = 4,
    /// The player-controlled actor.
    PlayerActor = 5,
}

impl EntityKind {
    /// Every entity kind ordered by storage code.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Free,
        EntityKind::Wall,
        EntityKind::Food,
        EntityKind::Energizer,
        EntityKind::Adversary,
        EntityKind::PlayerActor,
    ];

    /// Storage code representing the kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a storage code, returning `None` for unknown values.
    #[must_use]
    pub fn try_from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Decodes a storage code produced by [`EntityKind::code`].
    ///
    /// # Panics
    ///
    /// Panics when `code` does not belong to any kind. Codes only originate from
    /// [`EntityKind::code`], so an unknown value is a programming error.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match Self::try_from_code(code) {
            Some(kind) => kind,
            None => panic!("unknown entity code {code}"),
        }
    }
}

/// Internal faults that abort a running tick.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TickFault {
    /// A mutation targeted a cell outside the grid.
    #[error("cell ({}, {}) lies outside the {size}x{size} grid", .cell.column(), .cell.row())]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Edge length of the grid.
        size: u32,
    },
    /// A cached entity coordinate disagreed with the grid.
    #[error("expected {expected:?} at ({}, {}) but the grid holds {found:?}", .cell.column(), .cell.row())]
    CacheMismatch {
        /// Cached coordinate that was inspected.
        cell: CellCoord,
        /// Kind the cache implied.
        expected: EntityKind,
        /// Kind stored in the grid, if the cell exists.
        found: Option<EntityKind>,
    },
}

/// Errors surfaced synchronously while setting up a session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// A configuration value was not positive.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// The grid edge length was zero.
    #[error("grid size must be positive (received {size})")]
    InvalidSize {
        /// Rejected edge length.
        size: u32,
    },
    /// The requested entities cannot be placed without collisions.
    #[error("cannot place {required} entities on {available} free cells of a {size}x{size} grid")]
    UnsatisfiableLayout {
        /// Edge length of the grid.
        size: u32,
        /// Number of cells the placement needed.
        required: usize,
        /// Number of free cells available for placement.
        available: usize,
    },
    /// A layout placement lies outside the grid.
    #[error("placement at ({}, {}) lies outside the {size}x{size} grid", .cell.column(), .cell.row())]
    PlacementOutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Edge length of the grid.
        size: u32,
    },
    /// Two layout placements share a cell.
    #[error("more than one entity placed at ({}, {})", .cell.column(), .cell.row())]
    OverlappingPlacement {
        /// Cell claimed twice.
        cell: CellCoord,
    },
}

/// Initial adversary placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarySpawn {
    /// Cell the adversary starts on.
    pub cell: CellCoord,
    /// Informational initial facing.
    pub facing: Direction,
}

/// Initial player placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    /// Cell the player starts on.
    pub cell: CellCoord,
    /// Facing the player starts with.
    pub facing: Direction,
}

/// Disjoint placement lists describing a level before play begins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Immutable wall cells.
    pub walls: Vec<CellCoord>,
    /// Food cells.
    pub food: Vec<CellCoord>,
    /// Energizer cells.
    pub energizers: Vec<CellCoord>,
    /// Adversaries with their starting facing.
    pub adversaries: Vec<AdversarySpawn>,
    /// The single player start.
    pub player: PlayerSpawn,
}

impl Layout {
    /// Creates a layout that only contains the player start.
    #[must_use]
    pub fn with_player(cell: CellCoord, facing: Direction) -> Self {
        Self {
            walls: Vec::new(),
            food: Vec::new(),
            energizers: Vec::new(),
            adversaries: Vec::new(),
            player: PlayerSpawn { cell, facing },
        }
    }

    /// Iterates every placement paired with the kind it writes into the grid.
    pub fn placements(&self) -> impl Iterator<Item = (CellCoord, EntityKind)> + '_ {
        self.walls
            .iter()
            .map(|cell| (*cell, EntityKind::Wall))
            .chain(self.food.iter().map(|cell| (*cell, EntityKind::Food)))
            .chain(
                self.energizers
                    .iter()
                    .map(|cell| (*cell, EntityKind::Energizer)),
            )
            .chain(
                self.adversaries
                    .iter()
                    .map(|spawn| (spawn.cell, EntityKind::Adversary)),
            )
            .chain(std::iter::once((self.player.cell, EntityKind::PlayerActor)))
    }

    /// Checks that every placement fits an `size`×`size` grid and that no two
    /// placements share a cell.
    pub fn validate(&self, size: u32) -> Result<(), SetupError> {
        if size == 0 {
            return Err(SetupError::InvalidSize { size });
        }

        let mut claimed = HashSet::new();
        for (cell, _) in self.placements() {
            if cell.column() >= size || cell.row() >= size {
                return Err(SetupError::PlacementOutOfBounds { cell, size });
            }
            if !claimed.insert(cell) {
                return Err(SetupError::OverlappingPlacement { cell });
            }
        }
        Ok(())
    }
}

/// Entity counts requested from the level generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Number of adversaries to place.
    pub adversaries: usize,
    /// Number of energizers to place.
    pub energizers: usize,
    /// Number of food items to place; `None` fills every remaining free cell.
    pub food: Option<usize>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            adversaries: 4,
            energizers: 4,
            food: None,
        }
    }
}

/// Immutable representation of the player actor used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Current facing.
    pub facing: Direction,
}

/// Immutable representation of a single adversary used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdversarySnapshot {
    /// Unique identifier assigned to the adversary.
    pub id: AdversaryId,
    /// Cell currently occupied by the adversary.
    pub cell: CellCoord,
    /// Direction of the most recent move, or the spawn facing.
    pub facing: Direction,
}

/// Read-only snapshot handed to rendering collaborators after each tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Edge length of the square grid.
    pub size: u32,
    /// Row-major cell contents.
    pub cells: Vec<EntityKind>,
    /// Player actor state.
    pub player: PlayerSnapshot,
    /// Adversaries ordered by identifier.
    pub adversaries: Vec<AdversarySnapshot>,
    /// Accumulated score.
    pub score: u64,
    /// Current session status.
    pub status: SessionStatus,
    /// Terminal outcome once the session finished.
    pub outcome: Option<Outcome>,
    /// Number of ticks processed so far.
    pub tick: u64,
}

impl Frame {
    /// Content of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn kind_at(&self, cell: CellCoord) -> Option<EntityKind> {
        if cell.column() >= self.size || cell.row() >= self.size {
            return None;
        }
        let width = usize::try_from(self.size).ok()?;
        let index = usize::try_from(cell.row()).ok()? * width + usize::try_from(cell.column()).ok()?;
        self.cells.get(index).copied()
    }

    /// Iterator over the grid rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[EntityKind]> {
        let width = usize::try_from(self.size).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }
}
