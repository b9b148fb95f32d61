use crate::grid::topology::Topology;

use super::tileset::TileSet;

/// Decides whether two facing sockets allow their tiles to be adjacent.
///
/// The engine always calls `are_compatible(candidate, exposed)` with the
/// candidate tile's own socket first and the token exposed by the neighbour
/// second. The relation is not assumed to be symmetric: some tile sets encode
/// direction-dependent semantics (e.g. reversed-string sockets read in
/// opposite directions from each side), so implementations are responsible
/// for their own symmetry.
pub trait SocketCompatibility: Send + Sync {
    fn are_compatible(&self, candidate: &str, exposed: &str) -> bool;
}

impl<F> SocketCompatibility for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn are_compatible(&self, candidate: &str, exposed: &str) -> bool {
        self(candidate, exposed)
    }
}

/// Sockets are compatible when their tokens are equal.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatch;

impl SocketCompatibility for ExactMatch {
    fn are_compatible(&self, candidate: &str, exposed: &str) -> bool {
        candidate == exposed
    }
}

/// Sockets are compatible when the candidate token reads as the reverse of
/// the exposed token. The usual pairing for multi-character sockets, where
/// both sides describe the shared edge left-to-right from their own
/// viewpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct MirroredMatch;

impl SocketCompatibility for MirroredMatch {
    fn are_compatible(&self, candidate: &str, exposed: &str) -> bool {
        candidate.chars().eq(exposed.chars().rev())
    }
}

/// Immutable configuration of a generation run: the tile set (which carries
/// the grid topology), the socket compatibility predicate and the tile
/// selection mode. Built once, consumed by a
/// [`super::Generator`] at reset time and never mutated afterwards.
///
/// ### Example
/// ```
/// use tilewave::generator::{
///     config::{GenerationConfig, MirroredMatch},
///     tileset::{TileSetBuilder, TileTemplate},
/// };
/// use tilewave::grid::topology::Topology;
///
/// let mut tiles = TileSetBuilder::new(Topology::Square);
/// tiles
///     .add(TileTemplate::new(["AA", "AB", "BA", "AA"]).with_rotations(4))
///     .unwrap();
/// let config = GenerationConfig::new(tiles.build().unwrap(), MirroredMatch)
///     .with_weighted_selection();
/// ```
pub struct GenerationConfig {
    tiles: TileSet,
    compatibility: Box<dyn SocketCompatibility>,
    weighted_selection: bool,
}

impl GenerationConfig {
    /// Creates a configuration from a built [`TileSet`] and a compatibility
    /// predicate. Tile selection during collapse defaults to uniform random.
    pub fn new(tiles: TileSet, compatibility: impl SocketCompatibility + 'static) -> Self {
        Self {
            tiles,
            compatibility: Box::new(compatibility),
            weighted_selection: false,
        }
    }

    /// Makes collapse pick among a cell's possible tiles with probability
    /// proportional to each tile's weight, instead of uniformly.
    pub fn with_weighted_selection(mut self) -> Self {
        self.weighted_selection = true;
        self
    }

    /// Returns the grid topology this configuration was built for.
    pub fn topology(&self) -> Topology {
        self.tiles.topology()
    }

    /// Returns the tile set of this configuration.
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Returns true if collapse uses weighted random tile selection.
    pub fn weighted_selection(&self) -> bool {
        self.weighted_selection
    }

    #[inline]
    pub(crate) fn compatible(&self, candidate: &str, exposed: &str) -> bool {
        self.compatibility.are_compatible(candidate, exposed)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExactMatch, MirroredMatch, SocketCompatibility};

    #[test]
    fn exact_match_compares_tokens() {
        assert!(ExactMatch.are_compatible("AB", "AB"));
        assert!(!ExactMatch.are_compatible("AB", "BA"));
    }

    #[test]
    fn mirrored_match_reverses_the_exposed_token() {
        assert!(MirroredMatch.are_compatible("AB", "BA"));
        assert!(MirroredMatch.are_compatible("AA", "AA"));
        assert!(!MirroredMatch.are_compatible("AB", "AB"));
    }

    #[test]
    fn closures_are_predicates() {
        let one_way = |candidate: &str, _exposed: &str| candidate == "A";
        assert!(one_way.are_compatible("A", "B"));
        assert!(!one_way.are_compatible("B", "A"));
    }
}
