/// Lattice layout of a [`crate::grid::Grid`].
///
/// The layout fixes the number of sides of a cell, and therefore the socket
/// arity of every [`crate::generator::tile::Tile`] used on that grid.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Topology {
    /// 4 neighbours per cell
    Square,
    /// 6 neighbours per cell, axial coordinates with flat-top cells
    Hexagonal,
}

/// Index of a direction in a topology's delta table.
///
/// Direction `0` is "up", the rest follow clockwise.
pub type DirectionIndex = usize;

/// Offset to a neighbouring cell, in `(row, col)` steps.
#[derive(Clone, Copy, Debug)]
pub struct GridDelta {
    pub drow: i32,
    pub dcol: i32,
}

/// Square neighbours: up, right, down, left.
pub const SQUARE_DELTAS: &[GridDelta] = &[
    GridDelta { drow: -1, dcol: 0 },
    GridDelta { drow: 0, dcol: 1 },
    GridDelta { drow: 1, dcol: 0 },
    GridDelta { drow: 0, dcol: -1 },
];

/// Hexagonal neighbours in axial coordinates (`row` = r axis, `col` = q axis):
/// up, up-right, down-right, down, down-left, up-left.
pub const HEX_DELTAS: &[GridDelta] = &[
    GridDelta { drow: -1, dcol: 0 },
    GridDelta { drow: -1, dcol: 1 },
    GridDelta { drow: 0, dcol: 1 },
    GridDelta { drow: 1, dcol: 0 },
    GridDelta { drow: 1, dcol: -1 },
    GridDelta { drow: 0, dcol: -1 },
];

impl Topology {
    /// Returns the number of sides (= sockets, = directions) of a cell.
    #[inline]
    pub fn side_count(&self) -> usize {
        self.deltas().len()
    }

    /// Returns the neighbour offsets, clockwise starting from "up".
    #[inline]
    pub fn deltas(&self) -> &'static [GridDelta] {
        match self {
            Topology::Square => SQUARE_DELTAS,
            Topology::Hexagonal => HEX_DELTAS,
        }
    }

    /// Returns an iterator over all direction indexes of this topology.
    #[inline]
    pub fn directions(&self) -> std::ops::Range<DirectionIndex> {
        0..self.side_count()
    }

    /// Returns the direction pointing back at `direction`.
    #[inline]
    pub fn opposite(&self, direction: DirectionIndex) -> DirectionIndex {
        let n = self.side_count();
        (direction + n / 2) % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_are_involutive() {
        for topology in [Topology::Square, Topology::Hexagonal] {
            for dir in topology.directions() {
                let opposite = topology.opposite(dir);
                assert_ne!(dir, opposite);
                assert_eq!(dir, topology.opposite(opposite));
            }
        }
    }

    #[test]
    fn opposite_deltas_cancel_out() {
        for topology in [Topology::Square, Topology::Hexagonal] {
            let deltas = topology.deltas();
            for dir in topology.directions() {
                let back = deltas[topology.opposite(dir)];
                assert_eq!(deltas[dir].drow + back.drow, 0);
                assert_eq!(deltas[dir].dcol + back.dcol, 0);
            }
        }
    }
}
