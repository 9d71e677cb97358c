//! Dense square grid that stores exactly one [`EntityKind`] per cell.

use grid_chase_core::{CellCoord, Direction, EntityKind, SetupError, TickFault};
use rand::Rng;

/// Row-major `size`×`size` grid of entity kinds.
///
/// The grid is the single source of truth for spatial occupancy. Lookups that
/// fall outside the grid answer as walls so movement can never escape it,
/// while mutations outside the grid are reported as [`TickFault::OutOfBounds`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<EntityKind>,
}

impl Grid {
    /// Creates a grid with every cell set to [`EntityKind::Free`].
    pub fn new(size: u32) -> Result<Self, SetupError> {
        if size == 0 {
            return Err(SetupError::InvalidSize { size });
        }
        let edge = usize::try_from(size).map_err(|_| SetupError::InvalidSize { size })?;
        let capacity = edge
            .checked_mul(edge)
            .ok_or(SetupError::InvalidSize { size })?;
        Ok(Self {
            size,
            cells: vec![EntityKind::Free; capacity],
        })
    }

    /// Edge length of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Content of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn kind_at(&self, cell: CellCoord) -> Option<EntityKind> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell blocks movement. Cells outside the grid do.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.kind_at(cell).map_or(true, |kind| kind == EntityKind::Wall)
    }

    /// Overwrites the content of a cell.
    pub fn set_cell(&mut self, cell: CellCoord, kind: EntityKind) -> Result<(), TickFault> {
        let size = self.size;
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(TickFault::OutOfBounds { cell, size })?;
        *slot = kind;
        Ok(())
    }

    /// Row-major view of every cell.
    #[must_use]
    pub fn cells(&self) -> &[EntityKind] {
        &self.cells
    }

    /// Number of cells currently holding `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// Iterates every cell holding `kind` in row-major order.
    pub fn cells_of(&self, kind: EntityKind) -> impl Iterator<Item = CellCoord> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| **cell == kind)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % size, index / size))
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        Some(row * width + column)
    }
}

/// Orthogonal neighbours of `cell` in the order Up, Right, Down, Left.
///
/// Neighbours that would require a negative coordinate are skipped; the others
/// are not checked against any grid.
pub fn neighbors(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.step(direction))
}

/// Picks a uniformly random in-bounds, non-wall neighbour of `cell`.
///
/// Returns `cell` itself when every neighbour is blocked.
pub fn random_available_neighbor<R>(grid: &Grid, cell: CellCoord, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    random_neighbor_where(grid, cell, rng, |kind| kind != EntityKind::Wall)
}

/// Picks a uniformly random in-bounds neighbour whose content satisfies
/// `accept`, or returns `cell` when none does.
///
/// Candidates are collected in [`neighbors`] order and exactly one value is
/// drawn from `rng` when at least one candidate exists, so the choice is fully
/// determined by the generator state.
pub fn random_neighbor_where<R, F>(grid: &Grid, cell: CellCoord, rng: &mut R, accept: F) -> CellCoord
where
    R: Rng + ?Sized,
    F: Fn(EntityKind) -> bool,
{
    let candidates: Vec<CellCoord> = neighbors(cell)
        .filter(|neighbor| grid.kind_at(*neighbor).is_some_and(&accept))
        .collect();

    if candidates.is_empty() {
        return cell;
    }
    candidates[rng.gen_range(0..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::mock::StepRng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn new_grid_is_free_everywhere() {
        let grid = Grid::new(4).expect("positive size");
        assert_eq!(grid.cells().len(), 16);
        assert_eq!(grid.count(EntityKind::Free), 16);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert_eq!(Grid::new(0), Err(SetupError::InvalidSize { size: 0 }));
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::new(3).expect("positive size");
        assert!(!grid.is_wall(CellCoord::new(2, 2)));
        assert!(grid.is_wall(CellCoord::new(3, 0)));
        assert!(grid.is_wall(CellCoord::new(0, 3)));
        assert_eq!(grid.kind_at(CellCoord::new(3, 3)), None);
    }

    #[test]
    fn out_of_bounds_mutation_faults() {
        let mut grid = Grid::new(3).expect("positive size");
        assert_eq!(
            grid.set_cell(CellCoord::new(3, 1), EntityKind::Food),
            Err(TickFault::OutOfBounds {
                cell: CellCoord::new(3, 1),
                size: 3
            })
        );
        assert_eq!(grid.count(EntityKind::Free), 9);
    }

    #[test]
    fn set_cell_writes_row_major() {
        let mut grid = Grid::new(3).expect("positive size");
        grid.set_cell(CellCoord::new(2, 1), EntityKind::Food)
            .expect("in bounds");
        assert_eq!(grid.cells()[5], EntityKind::Food);
        assert_eq!(
            grid.cells_of(EntityKind::Food).collect::<Vec<_>>(),
            vec![CellCoord::new(2, 1)]
        );
    }

    #[test]
    fn neighbors_follow_fixed_order() {
        let ordered: Vec<_> = neighbors(CellCoord::new(1, 1)).collect();
        assert_eq!(
            ordered,
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(0, 1),
            ]
        );
        assert_eq!(neighbors(CellCoord::new(0, 0)).count(), 2);
    }

    #[test]
    fn enclosed_cell_stays_put() {
        let mut grid = Grid::new(3).expect("positive size");
        for cell in neighbors(CellCoord::new(1, 1)) {
            grid.set_cell(cell, EntityKind::Wall).expect("in bounds");
        }
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            random_available_neighbor(&grid, CellCoord::new(1, 1), &mut rng),
            CellCoord::new(1, 1)
        );
    }

    #[test]
    fn corner_never_leaves_the_grid() {
        let grid = Grid::new(2).expect("positive size");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..64 {
            let next = random_available_neighbor(&grid, CellCoord::new(1, 1), &mut rng);
            assert!(grid.contains(next));
            assert_eq!(next.manhattan_distance(CellCoord::new(1, 1)), 1);
        }
    }

    #[test]
    fn zeroed_rng_picks_first_candidate() {
        let mut grid = Grid::new(3).expect("positive size");
        grid.set_cell(CellCoord::new(1, 0), EntityKind::Wall)
            .expect("in bounds");
        let mut rng = StepRng::new(0, 0);
        assert_eq!(
            random_available_neighbor(&grid, CellCoord::new(1, 1), &mut rng),
            CellCoord::new(2, 1)
        );
    }

    #[test]
    fn choice_is_reproducible_for_equal_seeds() {
        let grid = Grid::new(5).expect("positive size");
        let mut first = ChaCha8Rng::seed_from_u64(99);
        let mut second = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..32 {
            assert_eq!(
                random_available_neighbor(&grid, CellCoord::new(2, 2), &mut first),
                random_available_neighbor(&grid, CellCoord::new(2, 2), &mut second)
            );
        }
    }
}
