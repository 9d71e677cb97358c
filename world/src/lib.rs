#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Chase.
//!
//! The world owns the grid, the cached player and adversary coordinates, the
//! score and the session status. All mutations go through [`apply`], which
//! keeps every cached coordinate in agreement with the grid.

mod grid;

pub use grid::{neighbors, random_available_neighbor, random_neighbor_where, Grid};

use grid_chase_core::{
    AdversaryId, CellCoord, Command, Direction, EntityKind, Event, Layout, Outcome,
    SessionStatus, SetupError, TickFault,
};
use log::{debug, info, warn};
use rand::Rng;

/// Represents the authoritative Grid Chase world state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    player: Player,
    adversaries: Vec<Adversary>,
    score: u64,
    status: SessionStatus,
    outcome: Option<Outcome>,
    tick_index: u64,
}

impl World {
    /// Builds a world whose grid mirrors the provided layout.
    pub fn from_layout(size: u32, layout: &Layout) -> Result<Self, SetupError> {
        layout.validate(size)?;

        let mut grid = Grid::new(size)?;
        for (cell, kind) in layout.placements() {
            grid.set_cell(cell, kind)
                .map_err(|_| SetupError::PlacementOutOfBounds { cell, size })?;
        }

        let adversaries = layout
            .adversaries
            .iter()
            .zip(0u32..)
            .map(|(spawn, index)| Adversary {
                id: AdversaryId::new(index),
                cell: spawn.cell,
                facing: spawn.facing,
            })
            .collect();

        debug!(
            "loaded {size}x{size} level with {} adversaries and {} food",
            layout.adversaries.len(),
            layout.food.len()
        );

        Ok(Self {
            grid,
            player: Player {
                cell: layout.player.cell,
                facing: layout.player.facing,
            },
            adversaries,
            score: 0,
            status: SessionStatus::NotStarted,
            outcome: None,
            tick_index: 0,
        })
    }

    fn set_status(&mut self, status: SessionStatus, out_events: &mut Vec<Event>) {
        let from = self.status;
        if from == status {
            return;
        }
        self.status = status;
        debug!("session status {from:?} -> {status:?}");
        out_events.push(Event::StatusChanged { from, to: status });
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        self.set_status(SessionStatus::Finished, out_events);
        info!(
            "session finished after {} ticks with score {}: {outcome:?}",
            self.tick_index, self.score
        );
        out_events.push(Event::SessionFinished {
            outcome,
            score: self.score,
        });
    }

    fn ensure_cached(&self, cell: CellCoord, expected: EntityKind) -> Result<(), TickFault> {
        let found = self.grid.kind_at(cell);
        if found == Some(expected) {
            Ok(())
        } else {
            Err(TickFault::CacheMismatch {
                cell,
                expected,
                found,
            })
        }
    }

    fn advance<R>(
        &mut self,
        pending: Option<Direction>,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), TickFault>
    where
        R: Rng + ?Sized,
    {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.ensure_cached(self.player.cell, EntityKind::PlayerActor)?;

        if let Some(by) = self.move_adversaries(rng, out_events)? {
            self.finish(Outcome::Caught { by }, out_events);
            return Ok(());
        }

        if let Some(direction) = pending {
            let from = self.player.facing;
            if from != direction {
                self.player.facing = direction;
                out_events.push(Event::PlayerTurned {
                    from,
                    to: direction,
                });
            }
        }

        self.move_player(out_events)
    }

    /// Moves every adversary one step, sequentially in identifier order.
    ///
    /// Each choice is made against the grid as already updated by the
    /// adversaries before it, and cells holding another adversary are never
    /// candidates. Returns the adversary that stepped onto the player, if any.
    fn move_adversaries<R>(
        &mut self,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<Option<AdversaryId>, TickFault>
    where
        R: Rng + ?Sized,
    {
        let player_cell = self.player.cell;
        let mut catcher = None;

        for index in 0..self.adversaries.len() {
            let Adversary { id, cell: from, .. } = self.adversaries[index];
            self.ensure_cached(from, EntityKind::Adversary)?;

            let to = random_neighbor_where(&self.grid, from, rng, |kind| {
                !matches!(kind, EntityKind::Wall | EntityKind::Adversary)
            });
            if to == from {
                continue;
            }

            self.grid.set_cell(from, EntityKind::Free)?;
            self.grid.set_cell(to, EntityKind::Adversary)?;
            let adversary = &mut self.adversaries[index];
            if let Some(facing) = Direction::between(from, to) {
                adversary.facing = facing;
            }
            adversary.cell = to;
            out_events.push(Event::AdversaryMoved {
                adversary: id,
                from,
                to,
            });

            if to == player_cell && catcher.is_none() {
                catcher = Some(id);
            }
        }

        Ok(catcher)
    }

    fn move_player(&mut self, out_events: &mut Vec<Event>) -> Result<(), TickFault> {
        let from = self.player.cell;
        let facing = self.player.facing;

        let Some(to) = from.step(facing).filter(|cell| !self.grid.is_wall(*cell)) else {
            out_events.push(Event::PlayerBlocked { cell: from, facing });
            return Ok(());
        };

        match self.grid.kind_at(to) {
            Some(EntityKind::Adversary) => {
                let by = self
                    .adversaries
                    .iter()
                    .find(|adversary| adversary.cell == to)
                    .map(|adversary| adversary.id)
                    .ok_or(TickFault::CacheMismatch {
                        cell: to,
                        expected: EntityKind::Adversary,
                        found: None,
                    })?;
                self.finish(Outcome::Caught { by }, out_events);
                return Ok(());
            }
            Some(EntityKind::Food) => {
                self.score = self.score.saturating_add(1);
                out_events.push(Event::FoodEaten {
                    cell: to,
                    score: self.score,
                });
            }
            Some(EntityKind::Energizer) => {
                out_events.push(Event::EnergizerConsumed { cell: to });
            }
            Some(EntityKind::Free) => {}
            found @ (Some(EntityKind::PlayerActor | EntityKind::Wall) | None) => {
                return Err(TickFault::CacheMismatch {
                    cell: to,
                    expected: EntityKind::Free,
                    found,
                });
            }
        }

        self.grid.set_cell(from, EntityKind::Free)?;
        self.grid.set_cell(to, EntityKind::PlayerActor)?;
        self.player.cell = to;
        out_events.push(Event::PlayerMoved { from, to });
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Ticks draw adversary moves from `rng`; two worlds built from the same layout
/// and fed the same commands with equally seeded generators stay identical.
/// Ticks are ignored unless the session is running. A fault raised while
/// processing a tick finishes the session with [`Outcome::Faulted`].
pub fn apply<R>(world: &mut World, command: Command, rng: &mut R, out_events: &mut Vec<Event>)
where
    R: Rng + ?Sized,
{
    match command {
        Command::Start => {
            if world.status == SessionStatus::NotStarted {
                world.set_status(SessionStatus::Running, out_events);
            } else {
                debug!("ignoring start while {:?}", world.status);
            }
        }
        Command::Pause => {
            if world.status == SessionStatus::Running {
                world.set_status(SessionStatus::Paused, out_events);
            }
        }
        Command::Resume => {
            if world.status == SessionStatus::Paused {
                world.set_status(SessionStatus::Running, out_events);
            }
        }
        Command::Tick { pending } => {
            if world.status != SessionStatus::Running {
                return;
            }
            if let Err(fault) = world.advance(pending, rng, out_events) {
                warn!("tick {} aborted: {fault}", world.tick_index);
                world.finish(Outcome::Faulted(fault), out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_chase_core::{AdversarySnapshot, Frame, Outcome, PlayerSnapshot, SessionStatus};

    use super::{Grid, World};

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Captures the player actor's cached state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            facing: world.player.facing,
        }
    }

    /// Captures every adversary in identifier order.
    #[must_use]
    pub fn adversaries(world: &World) -> Vec<AdversarySnapshot> {
        world
            .adversaries
            .iter()
            .map(|adversary| AdversarySnapshot {
                id: adversary.id,
                cell: adversary.cell,
                facing: adversary.facing,
            })
            .collect()
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Current session status.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        world.status
    }

    /// Reason the session finished, once it has.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Number of ticks processed while running.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the complete read-only snapshot consumed by renderers.
    #[must_use]
    pub fn frame(world: &World) -> Frame {
        Frame {
            size: world.grid.size(),
            cells: world.grid.cells().to_vec(),
            player: player(world),
            adversaries: adversaries(world),
            score: world.score,
            status: world.status,
            outcome: world.outcome,
            tick: world.tick_index,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    facing: Direction,
}

#[derive(Clone, Copy, Debug)]
struct Adversary {
    id: AdversaryId,
    cell: CellCoord,
    facing: Direction,
}
