/// Index of a tile in a [`super::tileset::TileSet`].
///
/// Indexes are assigned by emission order in the [`super::tileset::TileSetBuilder`]
/// and are stable identifiers for the whole generation run.
pub type TileIndex = usize;

/// Rendering hint attached to a tile variant. The engine never reads it, it is
/// carried through symmetry expansion and handed back to the renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileVisual {
    /// Identifies the source asset this tile variant was declared with.
    pub asset_index: usize,
    /// Number of rotation steps to apply when drawing the asset. One step is a
    /// quarter turn on a square grid, a sixth of a turn on a hexagonal grid.
    pub rotation_steps: u32,
    /// Whether to draw the asset mirrored.
    pub flipped: bool,
}

/// An immutable tile descriptor: one socket token per side (4 on a square
/// grid, 6 on a hexagonal grid, direction 0 is "up" then clockwise), a
/// relative selection weight and an optional visual passthrough.
///
/// Two tiles may be adjacent only if their facing sockets satisfy the
/// [`super::config::SocketCompatibility`] predicate of the run.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    sockets: Vec<String>,
    weight: f32,
    visual: Option<TileVisual>,
}

impl Tile {
    pub(crate) fn new(sockets: Vec<String>, weight: f32, visual: Option<TileVisual>) -> Self {
        Self {
            sockets,
            weight,
            visual,
        }
    }

    /// Returns the socket tokens of this tile, one per direction.
    pub fn sockets(&self) -> &[String] {
        &self.sockets
    }

    /// Returns the socket token on the side facing `direction`.
    #[inline]
    pub fn socket(&self, direction: usize) -> &str {
        &self.sockets[direction]
    }

    /// Returns the relative selection weight of this tile.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Returns the visual passthrough of this tile, if any.
    pub fn visual(&self) -> Option<&TileVisual> {
        self.visual.as_ref()
    }

    /// Returns a copy of this tile rotated clockwise by one side: the socket
    /// formerly at the last index becomes the "up" socket and all others shift
    /// up by one index. The visual rotation counter is incremented on the copy.
    pub fn rotated(&self) -> Tile {
        let last = self.sockets.len() - 1;
        let mut sockets = Vec::with_capacity(self.sockets.len());
        sockets.push(self.sockets[last].clone());
        sockets.extend_from_slice(&self.sockets[..last]);
        Self {
            sockets,
            weight: self.weight,
            visual: self.visual.map(|visual| TileVisual {
                rotation_steps: visual.rotation_steps + 1,
                ..visual
            }),
        }
    }

    /// Returns the mirror of this tile: the "up" socket is replaced by its own
    /// reversed token, and the sockets at indexes `1..N` are taken from
    /// indexes `N-1..1` in reverse order, each itself reversed.
    ///
    /// A socket token encodes a left-to-right spatial pattern, which mirrors
    /// when the tile is flipped, hence the per-token reversal. The visual flip
    /// marker is toggled on the copy.
    pub fn flipped(&self) -> Tile {
        let n = self.sockets.len();
        let mut sockets = Vec::with_capacity(n);
        sockets.push(reversed(&self.sockets[0]));
        for i in 1..n {
            sockets.push(reversed(&self.sockets[n - i]));
        }
        Self {
            sockets,
            weight: self.weight,
            visual: self.visual.map(|visual| TileVisual {
                flipped: !visual.flipped,
                ..visual
            }),
        }
    }
}

fn reversed(token: &str) -> String {
    token.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::{Tile, TileVisual};

    fn tile(sockets: &[&str]) -> Tile {
        Tile::new(
            sockets.iter().map(|s| s.to_string()).collect(),
            1.0,
            Some(TileVisual {
                asset_index: 0,
                rotation_steps: 0,
                flipped: false,
            }),
        )
    }

    fn socket_strings(tile: &Tile) -> Vec<&str> {
        tile.sockets().iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn rotation_shifts_last_socket_to_front() {
        let rotated = tile(&["A", "B", "C", "D"]).rotated();
        assert_eq!(socket_strings(&rotated), ["D", "A", "B", "C"]);
        assert_eq!(rotated.visual().unwrap().rotation_steps, 1);
    }

    #[test]
    fn rotating_n_times_is_identity() {
        for sockets in [vec!["A", "B", "C", "D"], vec!["a", "b", "c", "d", "e", "f"]] {
            let base = tile(&sockets);
            let mut current = base.clone();
            for _ in 0..sockets.len() {
                current = current.rotated();
            }
            assert_eq!(current.sockets(), base.sockets());
            assert_eq!(
                current.visual().unwrap().rotation_steps,
                sockets.len() as u32
            );
        }
    }

    #[test]
    fn flip_mirrors_sockets() {
        let flipped = tile(&["A", "B", "C", "D"]).flipped();
        assert_eq!(socket_strings(&flipped), ["A", "D", "C", "B"]);
        assert!(flipped.visual().unwrap().flipped);
    }

    #[test]
    fn flip_reverses_tokens() {
        let flipped = tile(&["AB", "CD", "EF", "GH"]).flipped();
        assert_eq!(socket_strings(&flipped), ["BA", "HG", "FE", "DC"]);
    }

    #[test]
    fn flipping_twice_is_identity() {
        let base = tile(&["AB", "CD", "EF", "GH"]);
        let twice = base.flipped().flipped();
        assert_eq!(twice.sockets(), base.sockets());
        assert!(!twice.visual().unwrap().flipped);
    }
}
