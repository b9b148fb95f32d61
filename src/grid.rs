use std::fmt;

use bitvec::{bitvec, vec::BitVec};
use ndarray::Array2;

use crate::generator::tile::TileIndex;

use self::topology::{DirectionIndex, Topology};

/// Defines grid topologies and their direction tables
pub mod topology;

/// Per-position state of a generation run.
///
/// A cell holds the set of tile indexes still possible at its position. While
/// the set semantically is unordered, it is stored as a bit set so that
/// "did this cell change" during propagation is a direct equality check.
///
/// Invariants: the set only ever shrinks, and a collapsed cell holds exactly
/// one possible tile. A cell with an empty set is a contradiction and will
/// fail the run once selected for collapse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cell {
    collapsed: bool,
    possible: BitVec,
}

impl Cell {
    /// A cell with every tile of a `tile_count`-sized tile set still possible.
    pub(crate) fn full_entropy(tile_count: usize) -> Self {
        Self {
            collapsed: false,
            possible: bitvec![1; tile_count],
        }
    }

    /// Returns true if this cell has been fixed to a single tile.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Returns the number of tiles still possible on this cell (its entropy).
    #[inline]
    pub fn possibility_count(&self) -> usize {
        self.possible.count_ones()
    }

    /// Returns true if `tile` is still possible on this cell.
    pub fn is_possible(&self, tile: TileIndex) -> bool {
        self.possible.get(tile).map(|bit| *bit).unwrap_or(false)
    }

    /// Iterates over the indexes of the tiles still possible on this cell.
    pub fn possible_tiles(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.possible.iter_ones()
    }

    /// Returns the tile this cell was collapsed to, or `None` if the cell is
    /// still uncertain.
    pub fn collapsed_tile(&self) -> Option<TileIndex> {
        match self.collapsed {
            true => self.possible.first_one(),
            false => None,
        }
    }

    #[inline]
    pub(crate) fn possible(&self) -> &BitVec {
        &self.possible
    }

    pub(crate) fn set_possible(&mut self, possible: BitVec) {
        self.possible = possible;
    }

    pub(crate) fn collapse_to(&mut self, tile: TileIndex) {
        self.possible.fill(false);
        self.possible.set(tile, true);
        self.collapsed = true;
    }
}

/// A `rows` x `cols` lattice of [`Cell`], with neighbour relations given by
/// its [`Topology`].
///
/// Created at full entropy when a generation starts and replaced wholesale on
/// reset; owns no other engine state.
pub struct Grid {
    topology: Topology,
    rows: usize,
    cols: usize,
    cells: Array2<Cell>,
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "( {:?} grid, {} rows x {} cols )",
            self.topology, self.rows, self.cols
        )
    }
}

impl Grid {
    pub(crate) fn full_entropy(
        topology: Topology,
        rows: usize,
        cols: usize,
        tile_count: usize,
    ) -> Self {
        Self {
            topology,
            rows,
            cols,
            cells: Array2::from_shape_fn((rows, cols), |_| Cell::full_entropy(tile_count)),
        }
    }

    /// Returns the [`Topology`] of this grid.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Returns the number of rows of this grid.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns of this grid.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the total number of cells of this grid.
    pub fn total_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns the cell at `(row, col)`, or `None` if the position is outside
    /// the grid.
    ///
    /// Out-of-bounds lookups are a normal outcome at grid borders, not an
    /// error.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get((row, col))
    }

    /// Returns the position of the neighbour of `(row, col)` in `direction`,
    /// or `None` if that neighbour would fall outside the grid.
    pub fn neighbor(
        &self,
        row: usize,
        col: usize,
        direction: DirectionIndex,
    ) -> Option<(usize, usize)> {
        let delta = self.topology.deltas()[direction];
        let row = row as i64 + delta.drow as i64;
        let col = col as i64 + delta.dcol as i64;
        if row < 0 || row >= self.rows as i64 || col < 0 || col >= self.cols as i64 {
            return None;
        }
        Some((row as usize, col as usize))
    }

    /// Iterates over all `(row, col)` positions of this grid, row by row.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    /// Unchecked accessor for internal use, positions come from `positions()`
    /// or `neighbor()` and are always valid.
    #[inline]
    pub(crate) fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[(row, col)]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        &mut self.cells[(row, col)]
    }
}

#[cfg(test)]
mod tests {
    use super::{topology::Topology, Grid};

    #[test]
    fn out_of_bounds_lookup_is_none() {
        let grid = Grid::full_entropy(Topology::Square, 2, 3, 5);
        assert!(grid.get(0, 0).is_some());
        assert!(grid.get(1, 2).is_some());
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 3).is_none());
    }

    #[test]
    fn fresh_grid_is_full_entropy() {
        let grid = Grid::full_entropy(Topology::Square, 3, 3, 4);
        for (row, col) in grid.positions() {
            let cell = grid.get(row, col).unwrap();
            assert!(!cell.is_collapsed());
            assert_eq!(cell.possibility_count(), 4);
            assert_eq!(cell.possible_tiles().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn square_corner_has_two_neighbors() {
        let grid = Grid::full_entropy(Topology::Square, 3, 3, 1);
        let neighbors: Vec<_> = grid
            .topology()
            .directions()
            .filter_map(|dir| grid.neighbor(0, 0, dir))
            .collect();
        assert_eq!(neighbors, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn hex_center_has_six_neighbors() {
        let grid = Grid::full_entropy(Topology::Hexagonal, 3, 3, 1);
        let neighbors: Vec<_> = grid
            .topology()
            .directions()
            .filter_map(|dir| grid.neighbor(1, 1, dir))
            .collect();
        assert_eq!(
            neighbors,
            vec![(0, 1), (0, 2), (1, 2), (2, 1), (2, 0), (1, 0)]
        );
    }
}
