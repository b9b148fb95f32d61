#[cfg(feature = "debug-traces")]
use tracing::warn;

use crate::{grid::topology::Topology, ConfigError};

use super::tile::{Tile, TileIndex, TileVisual};

/// Default selection weight of a tile
pub const DEFAULT_TILE_WEIGHT: f32 = 1.0;

/// Declares one base tile and the symmetry variants to expand it into.
///
/// ### Example
///
/// A pipe-elbow tile present in all 4 rotations and their mirrors:
/// ```
/// use tilewave::generator::tileset::TileTemplate;
///
/// let elbow = TileTemplate::new(["pipe", "pipe", "wall", "wall"])
///     .with_weight(2.0)
///     .with_rotations(4)
///     .with_flip_variants();
/// ```
#[derive(Clone, Debug)]
pub struct TileTemplate {
    sockets: Vec<String>,
    weight: f32,
    rotations: u32,
    flip_variants: bool,
    asset_index: Option<usize>,
}

impl TileTemplate {
    /// Creates a template from its socket tokens, direction 0 ("up") first,
    /// then clockwise. Defaults: weight [`DEFAULT_TILE_WEIGHT`], a single
    /// rotation, no flip variants, no visual.
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(sockets: I) -> Self {
        Self {
            sockets: sockets.into_iter().map(Into::into).collect(),
            weight: DEFAULT_TILE_WEIGHT,
            rotations: 1,
            flip_variants: false,
            asset_index: None,
        }
    }

    /// Specifies the selection weight shared by all variants of this template.
    /// The value should be strictly positive; zero or negative weights are
    /// overriden by `f32::MIN_POSITIVE`.
    pub fn with_weight(mut self, weight: f32) -> Self {
        let mut checked_weight = weight;
        if checked_weight <= 0. {
            #[cfg(feature = "debug-traces")]
            warn!(
                "Tile template had an invalid weight {} <= 0., weight overriden to {}",
                checked_weight,
                f32::MIN_POSITIVE
            );
            checked_weight = f32::MIN_POSITIVE;
        }
        self.weight = checked_weight;
        self
    }

    /// Specifies how many rotation steps to emit: the base tile plus
    /// `count - 1` successive rotations. Clamped to at least 1.
    pub fn with_rotations(mut self, count: u32) -> Self {
        self.rotations = count.max(1);
        self
    }

    /// Also emits the mirrored counterpart of each rotation, right after it.
    pub fn with_flip_variants(mut self) -> Self {
        self.flip_variants = true;
        self
    }

    /// Attaches a visual passthrough: every emitted variant will carry a
    /// [`TileVisual`] referencing `asset_index`, with its rotation counter and
    /// flip marker describing the variant.
    pub fn with_visual(mut self, asset_index: usize) -> Self {
        self.asset_index = Some(asset_index);
        self
    }
}

/// Accumulates [`Tile`]s from templates, expanding each template into its
/// symmetry orbit.
///
/// For a template with `R` rotations the emission order is
/// `[base, rot1, .., rotR-1]`, or with flip variants
/// `[base, flip(base), rot1, flip(rot1), .., rotR-1, flip(rotR-1)]`.
/// Emission order assigns the permanent [`TileIndex`]es.
pub struct TileSetBuilder {
    topology: Topology,
    tiles: Vec<Tile>,
}

impl TileSetBuilder {
    /// Creates an empty builder for tiles of the given [`Topology`].
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            tiles: Vec::new(),
        }
    }

    /// Expands `template` and appends its variants.
    ///
    /// Returns [`ConfigError::SocketArity`] if the template's socket count
    /// does not match the builder's topology.
    pub fn add(&mut self, template: TileTemplate) -> Result<&mut Self, ConfigError> {
        let expected = self.topology.side_count();
        if template.sockets.len() != expected {
            return Err(ConfigError::SocketArity {
                tile: self.tiles.len(),
                topology: self.topology,
                expected,
                found: template.sockets.len(),
            });
        }

        let visual = template.asset_index.map(|asset_index| TileVisual {
            asset_index,
            rotation_steps: 0,
            flipped: false,
        });
        let mut current = Tile::new(template.sockets, template.weight, visual);
        for step in 0..template.rotations {
            if step > 0 {
                current = current.rotated();
            }
            self.tiles.push(current.clone());
            if template.flip_variants {
                self.tiles.push(current.flipped());
            }
        }
        Ok(self)
    }

    /// Finalizes the accumulated tiles into an immutable [`TileSet`].
    ///
    /// Returns [`ConfigError::EmptyTileSet`] if no tile was added.
    pub fn build(self) -> Result<TileSet, ConfigError> {
        if self.tiles.is_empty() {
            return Err(ConfigError::EmptyTileSet);
        }
        Ok(TileSet {
            topology: self.topology,
            tiles: self.tiles,
        })
    }
}

/// An immutable, ordered sequence of [`Tile`]s. Built once before generation
/// starts; tile indexes are positions in this sequence.
#[derive(Clone, Debug)]
pub struct TileSet {
    topology: Topology,
    tiles: Vec<Tile>,
}

impl TileSet {
    /// Returns the [`Topology`] the tiles were built for.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Returns the number of tiles in the set.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if the set contains no tiles. A built set never is.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns the tile at `index`.
    ///
    /// Panics if the index is not a valid index in this set.
    #[inline]
    pub fn tile(&self, index: TileIndex) -> &Tile {
        &self.tiles[index]
    }

    /// Returns all tiles, in index order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use crate::{grid::topology::Topology, ConfigError};

    use super::{TileSetBuilder, TileTemplate};

    fn socket_sequences(tiles: &[crate::generator::tile::Tile]) -> Vec<String> {
        tiles
            .iter()
            .map(|tile| {
                tile.sockets()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .collect()
    }

    #[test]
    fn rotation_count_sets_cardinality() {
        let mut builder = TileSetBuilder::new(Topology::Square);
        builder
            .add(TileTemplate::new(["A", "B", "C", "D"]).with_rotations(3))
            .unwrap();
        let tiles = builder.build().unwrap();
        assert_eq!(tiles.len(), 3);
    }

    #[test]
    fn flip_variants_double_cardinality() {
        let mut builder = TileSetBuilder::new(Topology::Square);
        builder
            .add(
                TileTemplate::new(["A", "B", "C", "D"])
                    .with_rotations(3)
                    .with_flip_variants(),
            )
            .unwrap();
        let tiles = builder.build().unwrap();
        assert_eq!(tiles.len(), 6);
    }

    #[test]
    fn full_orbit_emission_order() {
        let mut builder = TileSetBuilder::new(Topology::Square);
        builder
            .add(
                TileTemplate::new(["A", "B", "C", "D"])
                    .with_rotations(4)
                    .with_flip_variants(),
            )
            .unwrap();
        let tiles = builder.build().unwrap();
        assert_eq!(
            socket_sequences(tiles.tiles()),
            vec![
                "A-B-C-D", "A-D-C-B", "D-A-B-C", "D-C-B-A", "C-D-A-B", "C-B-A-D", "B-C-D-A",
                "B-A-D-C",
            ]
        );
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let mut builder = TileSetBuilder::new(Topology::Hexagonal);
        let result = builder.add(TileTemplate::new(["A", "B", "C", "D"]));
        assert_eq!(
            result.err(),
            Some(ConfigError::SocketArity {
                tile: 0,
                topology: Topology::Hexagonal,
                expected: 6,
                found: 4,
            })
        );
    }

    #[test]
    fn empty_build_is_rejected() {
        let builder = TileSetBuilder::new(Topology::Square);
        assert_eq!(builder.build().err(), Some(ConfigError::EmptyTileSet));
    }

    #[test]
    fn weights_and_visuals_carry_through_variants() {
        let mut builder = TileSetBuilder::new(Topology::Square);
        builder
            .add(
                TileTemplate::new(["A", "B", "C", "D"])
                    .with_weight(2.5)
                    .with_rotations(2)
                    .with_flip_variants()
                    .with_visual(7),
            )
            .unwrap();
        let tiles = builder.build().unwrap();
        for tile in tiles.tiles() {
            assert_eq!(tile.weight(), 2.5);
            assert_eq!(tile.visual().unwrap().asset_index, 7);
        }
        assert_eq!(tiles.tile(2).visual().unwrap().rotation_steps, 1);
        assert!(tiles.tile(3).visual().unwrap().flipped);
    }
}
