pub mod generator;
pub mod grid;

use grid::topology::Topology;

/// Error returned when a generation run reaches a contradiction: the cell at
/// `(row, col)` was selected for collapse with no possible tiles remaining.
///
/// There is no internal backtracking. The generator stays in a failed state
/// until it is explicitly reset (or restarted via
/// [`generator::Generator::generate`] which retries from scratch).
#[derive(thiserror::Error, Debug, Clone, Copy, Eq, PartialEq)]
#[error("contradiction at cell ({row}, {col}): no possible tiles remain")]
pub struct GenerationError {
    pub row: usize,
    pub col: usize,
}

/// Error returned when building a [`generator::tileset::TileSet`] or a
/// [`generator::config::GenerationConfig`] from invalid inputs.
///
/// These are configuration-layer programming errors and are rejected at build
/// time; a built configuration is valid for the whole generation run.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("tile set has no tiles")]
    EmptyTileSet,
    #[error("tile {tile} has {found} socket(s), {topology:?} topology requires {expected}")]
    SocketArity {
        /// Index the offending tile would have been emitted at
        tile: usize,
        topology: Topology,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {}
